//! MMLEADS Report - Medicare-Medicaid enrollment share & race trend report
//!
//! Reads the MMLEADS Public Use File workbook, computes each state's share
//! of national enrollment and the yearly racial composition, and writes a
//! choropleth map, a line chart and an HTML page combining both.

pub mod charts;
pub mod config;
pub mod data;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod stats;

pub use config::ReportConfig;
pub use pipeline::{analyze, render, run, Analysis, Artifacts, PipelineError, PipelineOutput};
