//! Data Cleaner Module
//! Turns a raw PUF sheet into typed records: sentinel removal, numeric
//! coercion and zero-fill.

use crate::data::loader::{format_number, Cell, RawSheet};
use crate::data::schema::Column;
use thiserror::Error;
use tracing::{debug, info};

/// Cell values the PUF uses for suppressed or unavailable figures.
pub const SENTINELS: [&str; 2] = ["*", "."];

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Sheet '{sheet}' is missing required column(s): {}", missing.join(", "))]
    MissingColumns { sheet: String, missing: Vec<String> },
}

/// The 17 percentage columns of a cleaned row.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Percentages {
    pub age_under_40: f64,
    pub age_40_to_64: f64,
    pub age_65_to_84: f64,
    pub age_85_plus: f64,
    pub female: f64,
    pub male: f64,
    pub non_hispanic_white: f64,
    pub african_american: f64,
    pub hispanic: f64,
    pub asian_pacific_islander: f64,
    pub american_indian_alaska_native: f64,
    pub other_unknown_race: f64,
    pub mas_cash_or_section_1931: f64,
    pub mas_medically_needy: f64,
    pub mas_poverty_related: f64,
    pub mas_1115_expansion: f64,
    pub mas_unclassified: f64,
}

impl Percentages {
    /// Value of a percentage column; `None` for State and the people counts.
    pub fn get(&self, column: Column) -> Option<f64> {
        let value = match column {
            Column::State | Column::People | Column::PeopleFfs => return None,
            Column::AgeUnder40 => self.age_under_40,
            Column::Age40To64 => self.age_40_to_64,
            Column::Age65To84 => self.age_65_to_84,
            Column::Age85Plus => self.age_85_plus,
            Column::Female => self.female,
            Column::Male => self.male,
            Column::NonHispanicWhite => self.non_hispanic_white,
            Column::AfricanAmerican => self.african_american,
            Column::Hispanic => self.hispanic,
            Column::AsianPacificIslander => self.asian_pacific_islander,
            Column::AmericanIndianAlaskaNative => self.american_indian_alaska_native,
            Column::OtherUnknownRace => self.other_unknown_race,
            Column::MasCashOrSection1931 => self.mas_cash_or_section_1931,
            Column::MasMedicallyNeedy => self.mas_medically_needy,
            Column::MasPovertyRelated => self.mas_poverty_related,
            Column::Mas1115Expansion => self.mas_1115_expansion,
            Column::MasUnclassified => self.mas_unclassified,
        };
        Some(value)
    }

    fn slot_mut(&mut self, column: Column) -> Option<&mut f64> {
        let slot = match column {
            Column::State | Column::People | Column::PeopleFfs => return None,
            Column::AgeUnder40 => &mut self.age_under_40,
            Column::Age40To64 => &mut self.age_40_to_64,
            Column::Age65To84 => &mut self.age_65_to_84,
            Column::Age85Plus => &mut self.age_85_plus,
            Column::Female => &mut self.female,
            Column::Male => &mut self.male,
            Column::NonHispanicWhite => &mut self.non_hispanic_white,
            Column::AfricanAmerican => &mut self.african_american,
            Column::Hispanic => &mut self.hispanic,
            Column::AsianPacificIslander => &mut self.asian_pacific_islander,
            Column::AmericanIndianAlaskaNative => &mut self.american_indian_alaska_native,
            Column::OtherUnknownRace => &mut self.other_unknown_race,
            Column::MasCashOrSection1931 => &mut self.mas_cash_or_section_1931,
            Column::MasMedicallyNeedy => &mut self.mas_medically_needy,
            Column::MasPovertyRelated => &mut self.mas_poverty_related,
            Column::Mas1115Expansion => &mut self.mas_1115_expansion,
            Column::MasUnclassified => &mut self.mas_unclassified,
        };
        Some(slot)
    }
}

/// One cleaned cohort row. Every numeric field is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedRecord {
    pub state: String,
    pub people: f64,
    pub people_ffs: f64,
    pub percents: Percentages,
}

impl CleanedRecord {
    /// Numeric value of a schema column; `State` has none.
    pub fn value(&self, column: Column) -> Option<f64> {
        match column {
            Column::People => Some(self.people),
            Column::PeopleFfs => Some(self.people_ffs),
            other => self.percents.get(other),
        }
    }
}

/// Counts of what the cleaning pass replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub rows: usize,
    pub sentinel_cells: usize,
    pub unparseable_cells: usize,
    pub empty_cells: usize,
}

/// Outcome of parsing a single numeric cell before zero-fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parsed {
    Value(f64),
    Sentinel,
    Unparseable,
    Missing,
}

impl Parsed {
    pub fn value(self) -> Option<f64> {
        match self {
            Parsed::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// Parse-or-default numeric policy: numbers and numeric text pass, sentinels
/// and anything unparseable or non-finite become missing.
pub fn parse_numeric(cell: &Cell) -> Parsed {
    match cell {
        Cell::Empty => Parsed::Missing,
        Cell::Number(n) if n.is_finite() => Parsed::Value(*n),
        Cell::Number(_) | Cell::Bool(_) => Parsed::Unparseable,
        Cell::Text(s) => {
            let trimmed = s.trim();
            if SENTINELS.contains(&trimmed) {
                Parsed::Sentinel
            } else if trimmed.is_empty() {
                Parsed::Missing
            } else {
                match trimmed.parse::<f64>() {
                    Ok(v) if v.is_finite() => Parsed::Value(v),
                    _ => Parsed::Unparseable,
                }
            }
        }
    }
}

/// String-cast and trim a State cell.
pub fn state_text(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Text(s) => s.trim().to_string(),
        Cell::Number(n) => format_number(*n),
        Cell::Bool(b) => b.to_string(),
    }
}

/// Handles the cleaning pass over the primary sheet.
pub struct DataCleaner;

impl DataCleaner {
    /// Resolve every schema column to its position in the sheet.
    pub fn resolve_columns(sheet: &RawSheet) -> Result<Vec<(Column, usize)>, CleanError> {
        let mut resolved = Vec::with_capacity(Column::ALL.len());
        let mut missing = Vec::new();

        for column in Column::ALL {
            match sheet.column_index(column.label()) {
                Some(idx) => resolved.push((column, idx)),
                None => missing.push(column.label().to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(CleanError::MissingColumns {
                sheet: sheet.name.clone(),
                missing,
            });
        }
        Ok(resolved)
    }

    /// Clean a raw sheet into typed records.
    pub fn clean(sheet: &RawSheet) -> Result<(Vec<CleanedRecord>, CleanReport), CleanError> {
        let columns = Self::resolve_columns(sheet)?;
        let mut report = CleanReport {
            rows: sheet.height(),
            ..CleanReport::default()
        };

        let records = (0..sheet.height())
            .map(|row| {
                let mut record = CleanedRecord {
                    state: String::new(),
                    people: 0.0,
                    people_ffs: 0.0,
                    percents: Percentages::default(),
                };

                for &(column, idx) in &columns {
                    let cell = sheet.cell(row, idx);
                    if !column.is_numeric() {
                        record.state = state_text(cell);
                        continue;
                    }

                    let parsed = parse_numeric(cell);
                    match parsed {
                        Parsed::Sentinel => report.sentinel_cells += 1,
                        Parsed::Unparseable => report.unparseable_cells += 1,
                        Parsed::Missing => report.empty_cells += 1,
                        Parsed::Value(_) => {}
                    }
                    let value = parsed.value().unwrap_or(0.0);

                    match column {
                        Column::People => record.people = value,
                        Column::PeopleFfs => record.people_ffs = value,
                        other => {
                            if let Some(slot) = record.percents.slot_mut(other) {
                                *slot = value;
                            }
                        }
                    }
                }
                record
            })
            .collect();

        info!(
            sheet = %sheet.name,
            rows = report.rows,
            sentinels = report.sentinel_cells,
            unparseable = report.unparseable_cells,
            "cleaned sheet"
        );
        debug!(empty = report.empty_cells, "zero-filled empty cells");

        Ok((records, report))
    }
}
