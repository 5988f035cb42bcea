//! Workbook Loader Module
//! Reads PUF worksheets into raw header + cell tables using calamine.

use calamine::{open_workbook, Data, Reader, Xlsx, XlsxError};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to open workbook {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: XlsxError,
    },
    #[error("Sheet '{sheet}' not found in {path}")]
    SheetNotFound { path: PathBuf, sheet: String },
    #[error("Failed to read sheet '{sheet}': {source}")]
    Read {
        sheet: String,
        #[source]
        source: XlsxError,
    },
    #[error("Sheet '{sheet}' has no header at row {row}")]
    MissingHeader { sheet: String, row: u32 },
}

/// A single worksheet cell, reduced to what the report consumes.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::Bool(b) => Cell::Bool(*b),
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::Error(e) => Cell::Text(e.to_string()),
        }
    }
}

/// One worksheet: header labels plus every physical row below the header.
#[derive(Debug, Clone)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawSheet {
    /// Index of the column whose trimmed header equals `label`.
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == label)
    }

    /// Cell at (data row, column), `Empty` when the row is short.
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        const EMPTY: &Cell = &Cell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(EMPTY)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

/// Handles workbook loading; keeps the file open for repeated sheet reads.
pub struct WorkbookLoader {
    path: PathBuf,
    workbook: Xlsx<BufReader<File>>,
}

impl WorkbookLoader {
    /// Open an xlsx workbook.
    pub fn open(path: &Path) -> Result<Self, LoaderError> {
        let workbook: Xlsx<_> = open_workbook(path).map_err(|source| LoaderError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        info!("opened workbook {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            workbook,
        })
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load one sheet with its header on physical row `header_row` (0-based).
    pub fn load_sheet(&mut self, sheet: &str, header_row: u32) -> Result<RawSheet, LoaderError> {
        if !self.sheet_names().iter().any(|s| s == sheet) {
            return Err(LoaderError::SheetNotFound {
                path: self.path.clone(),
                sheet: sheet.to_string(),
            });
        }

        let range = self
            .workbook
            .worksheet_range(sheet)
            .map_err(|source| LoaderError::Read {
                sheet: sheet.to_string(),
                source,
            })?;

        let Some((end_row, end_col)) = range.end() else {
            return Err(LoaderError::MissingHeader {
                sheet: sheet.to_string(),
                row: header_row,
            });
        };
        if end_row < header_row {
            return Err(LoaderError::MissingHeader {
                sheet: sheet.to_string(),
                row: header_row,
            });
        }

        // Positions are absolute so leading blank rows still count.
        let read_row = |row: u32| -> Vec<Cell> {
            (0..=end_col)
                .map(|c| range.get_value((row, c)).map(Cell::from).unwrap_or(Cell::Empty))
                .collect()
        };

        let headers: Vec<String> = read_row(header_row)
            .into_iter()
            .map(|cell| match cell {
                Cell::Text(s) => s,
                Cell::Number(n) => format_number(n),
                Cell::Bool(b) => b.to_string(),
                Cell::Empty => String::new(),
            })
            .collect();

        let rows: Vec<Vec<Cell>> = (header_row + 1..=end_row).map(read_row).collect();

        debug!(
            sheet,
            columns = headers.len(),
            rows = rows.len(),
            "loaded sheet"
        );

        Ok(RawSheet {
            name: sheet.to_string(),
            headers,
            rows,
        })
    }

    /// Load every sheet in workbook order, optionally dropping the first.
    ///
    /// Each sheet is loaded independently; one unreadable sheet does not
    /// prevent the others from loading.
    pub fn load_all_sheets(
        &mut self,
        header_row: u32,
        skip_first: bool,
    ) -> Vec<Result<RawSheet, LoaderError>> {
        let names = self.sheet_names();
        let skip = usize::from(skip_first);
        names
            .iter()
            .skip(skip)
            .map(|name| self.load_sheet(name, header_row))
            .collect()
    }
}

/// Format a numeric cell as text without a trailing `.0` for whole numbers.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
