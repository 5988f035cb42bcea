//! Report configuration. Defaults reproduce the fixed MMLEADS 2006-2012 run.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_INPUT: &str = "MMLEADS_PUF_V2.0_2006-2012_02.2019.xlsx";
pub const DEFAULT_SHEET: &str = "PUF_2006";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Workbook to read.
    pub input: PathBuf,
    /// Sheet holding the per-state records.
    pub sheet: String,
    /// Physical row (0-based) of the column headers in every sheet.
    pub header_row: u32,
    pub out_dir: PathBuf,
    pub map_file: String,
    pub chart_file: String,
    pub report_file: String,
    pub chart_width: u32,
    pub chart_height: u32,
    pub map_title: String,
    pub chart_title: String,
    pub report_title: String,
    pub map_heading: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            sheet: DEFAULT_SHEET.to_string(),
            header_row: 1,
            out_dir: PathBuf::from("."),
            map_file: "enrollment_by_state_map.html".to_string(),
            chart_file: "line_plot.png".to_string(),
            report_file: "combined_visualization.html".to_string(),
            chart_width: 1000,
            chart_height: 600,
            map_title: "Medicare-Medicaid Enrollment Percentage by State".to_string(),
            chart_title: "Percent Distribution of Different Racial Groups (2006-2012)".to_string(),
            report_title: "Medicare-Medicaid Enrollment and Racial Distribution".to_string(),
            map_heading: "Enrollment by State".to_string(),
        }
    }
}

impl ReportConfig {
    /// Load from a TOML file; missing keys keep their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn map_path(&self) -> PathBuf {
        self.out_dir.join(&self.map_file)
    }

    pub fn chart_path(&self) -> PathBuf {
        self.out_dir.join(&self.chart_file)
    }

    pub fn report_path(&self) -> PathBuf {
        self.out_dir.join(&self.report_file)
    }
}
