//! Minimal xlsx writer for test workbooks.
//!
//! Writes the OPC parts directly (content types, relationships, workbook and
//! one worksheet per sheet) with inline strings, so no shared-strings or
//! styles part is needed.

#![allow(dead_code)]

use mmleads_report::data::{Column, RaceColumn};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::FileOptions;
use zip::ZipWriter;

#[derive(Debug, Clone)]
pub enum Value {
    Num(f64),
    Str(String),
    Blank,
}

pub fn num(v: f64) -> Value {
    Value::Num(v)
}

pub fn text(v: &str) -> Value {
    Value::Str(v.to_string())
}

pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Value>>,
}

#[derive(Default)]
pub struct WorkbookBuilder {
    sheets: Vec<Sheet>,
}

impl WorkbookBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(mut self, name: &str, rows: Vec<Vec<Value>>) -> Self {
        self.sheets.push(Sheet {
            name: name.to_string(),
            rows,
        });
        self
    }

    pub fn write(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let file = File::create(path)?;
        let mut zip = ZipWriter::new(file);
        let options = FileOptions::default();

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(self.content_types_xml().as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(Self::rels_xml().as_bytes())?;

        zip.start_file("xl/workbook.xml", options)?;
        zip.write_all(self.workbook_xml().as_bytes())?;

        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        zip.write_all(self.workbook_rels_xml().as_bytes())?;

        for (idx, sheet) in self.sheets.iter().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", idx + 1), options)?;
            zip.write_all(Self::sheet_xml(sheet).as_bytes())?;
        }

        zip.finish()?;
        Ok(())
    }

    fn content_types_xml(&self) -> String {
        let overrides: String = (1..=self.sheets.len())
            .map(|i| {
                format!(
                    r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>{overrides}</Types>"#
        )
    }

    fn rels_xml() -> String {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
            .to_string()
    }

    fn workbook_xml(&self) -> String {
        let sheets: String = self
            .sheets
            .iter()
            .enumerate()
            .map(|(i, s)| {
                format!(
                    r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                    escape(&s.name),
                    i + 1,
                    i + 1
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{sheets}</sheets></workbook>"#
        )
    }

    fn workbook_rels_xml(&self) -> String {
        let rels: String = (1..=self.sheets.len())
            .map(|i| {
                format!(
                    r#"<Relationship Id="rId{i}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{i}.xml"/>"#
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
        )
    }

    fn sheet_xml(sheet: &Sheet) -> String {
        let mut data = String::new();
        for (r, row) in sheet.rows.iter().enumerate() {
            data.push_str(&format!(r#"<row r="{}">"#, r + 1));
            for (c, value) in row.iter().enumerate() {
                let cell_ref = format!("{}{}", column_name(c), r + 1);
                match value {
                    Value::Num(v) => data.push_str(&format!(r#"<c r="{cell_ref}"><v>{v}</v></c>"#)),
                    Value::Str(s) => data.push_str(&format!(
                        r#"<c r="{cell_ref}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                        escape(s)
                    )),
                    Value::Blank => {}
                }
            }
            data.push_str("</row>");
        }
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{data}</sheetData></worksheet>"#
        )
    }
}

/// Spreadsheet column letters for a 0-based index (0 → A, 26 → AA).
pub fn column_name(mut idx: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (idx % 26) as u8);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    name.reverse();
    String::from_utf8(name).unwrap()
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// A PUF-style yearly sheet: title row, header row, then one row per state.
///
/// Each state row is (state, people, race value); every percentage column is
/// filled with the race value.
pub fn puf_sheet(states: &[(&str, Value, f64)]) -> Vec<Vec<Value>> {
    let mut rows = vec![vec![text("MMLEADS Public Use File")]];
    rows.push(Column::ALL.iter().map(|c| text(&format!(" {} ", c.label()))).collect());
    for (state, people, pct) in states {
        let mut row = vec![text(state), people.clone(), num(people_ffs(people))];
        row.extend((3..Column::ALL.len()).map(|_| num(*pct)));
        rows.push(row);
    }
    rows
}

fn people_ffs(people: &Value) -> f64 {
    match people {
        Value::Num(v) => v / 2.0,
        _ => 0.0,
    }
}

/// A yearly sheet holding only the state column and the given race columns.
pub fn race_sheet(races: &[RaceColumn], rows: &[(&str, f64)]) -> Vec<Vec<Value>> {
    let mut out = vec![vec![text("title")]];
    let mut header = vec![text("State")];
    header.extend(races.iter().map(|r| text(r.label())));
    out.push(header);
    for (state, base) in rows {
        let mut row = vec![text(state)];
        row.extend(races.iter().enumerate().map(|(i, _)| num(base + i as f64)));
        out.push(row);
    }
    out
}

pub fn notes_sheet() -> Vec<Vec<Value>> {
    vec![
        vec![text("Medicare-Medicaid Linked Enrollee Analytic Data Source")],
        vec![text("Documentation only")],
    ]
}
