//! Cross-Sheet Trend Extractor
//! Pulls the race-percentage row from each yearly sheet.

use crate::data::cleaner::{parse_numeric, state_text};
use crate::data::loader::{LoaderError, RawSheet};
use crate::data::schema::{Column, RaceColumn};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Data row (0-based, below the header) read from every yearly sheet.
pub const TREND_ROW: usize = 2;

#[derive(Error, Debug)]
pub enum TrendError {
    #[error("Sheet '{sheet}' has none of the race columns")]
    NoRaceColumns { sheet: String },
    #[error("Sheet '{sheet}' has {rows} data row(s), row {wanted} required")]
    TooFewRows {
        sheet: String,
        rows: usize,
        wanted: usize,
    },
    #[error(transparent)]
    Load(#[from] LoaderError),
}

/// Race percentages for one survey year. Absent columns are absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyRaceRow {
    pub year: String,
    pub values: BTreeMap<RaceColumn, f64>,
}

impl YearlyRaceRow {
    pub fn get(&self, race: RaceColumn) -> Option<f64> {
        self.values.get(&race).copied()
    }
}

/// Year-ordered race table; rows keep workbook order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct YearlyRaceTable {
    pub rows: Vec<YearlyRaceRow>,
    pub skipped: Vec<String>,
}

impl YearlyRaceTable {
    pub fn years(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.year.as_str()).collect()
    }

    /// (row index, value) points of one race category, skipping years without it.
    pub fn series(&self, race: RaceColumn) -> Vec<(usize, f64)> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.get(race).map(|v| (i, v)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Year key: the underscore-separated segment after the first underscore
/// (`PUF_2007_rev` → `2007`), or the whole name when there is none.
pub fn year_from_sheet_name(name: &str) -> String {
    name.split('_').nth(1).unwrap_or(name).to_string()
}

/// Handles per-sheet extraction of the yearly race row.
pub struct TrendExtractor;

impl TrendExtractor {
    /// Extract the race row of a single yearly sheet.
    pub fn extract_sheet(sheet: &RawSheet) -> Result<YearlyRaceRow, TrendError> {
        let present: Vec<(RaceColumn, usize)> = RaceColumn::ALL
            .iter()
            .filter_map(|&race| sheet.column_index(race.label()).map(|idx| (race, idx)))
            .collect();

        if present.is_empty() {
            return Err(TrendError::NoRaceColumns {
                sheet: sheet.name.clone(),
            });
        }
        if sheet.height() <= TREND_ROW {
            return Err(TrendError::TooFewRows {
                sheet: sheet.name.clone(),
                rows: sheet.height(),
                wanted: TREND_ROW + 1,
            });
        }

        let missing: Vec<&str> = RaceColumn::ALL
            .iter()
            .filter(|race| !present.iter().any(|(p, _)| p == *race))
            .map(|race| race.label())
            .collect();
        if !missing.is_empty() {
            debug!(sheet = %sheet.name, ?missing, "race columns absent");
        }

        // Positional convention; log the row label so it can be checked.
        if let Some(idx) = sheet.column_index(Column::State.label()) {
            debug!(
                sheet = %sheet.name,
                state = %state_text(sheet.cell(TREND_ROW, idx)),
                "trend row label"
            );
        }

        let values = present
            .into_iter()
            .map(|(race, idx)| {
                let value = parse_numeric(sheet.cell(TREND_ROW, idx))
                    .value()
                    .unwrap_or(0.0);
                (race, value)
            })
            .collect();

        Ok(YearlyRaceRow {
            year: year_from_sheet_name(&sheet.name),
            values,
        })
    }

    /// Extract every sheet, warning about and skipping the ones that fail.
    pub fn extract_all<I>(sheets: I) -> YearlyRaceTable
    where
        I: IntoIterator<Item = Result<RawSheet, LoaderError>>,
    {
        let mut table = YearlyRaceTable::default();

        for loaded in sheets {
            let result = loaded
                .map_err(TrendError::from)
                .and_then(|sheet| Self::extract_sheet(&sheet));
            match result {
                Ok(row) => table.rows.push(row),
                Err(e) => {
                    warn!("skipping sheet: {e}");
                    table.skipped.push(e.to_string());
                }
            }
        }

        table
    }
}
