//! HTML Report Composer
//! Writes the combined page that references the map and the chart by
//! relative path.

use crate::stats::{RaceTrend, ShareDistribution};
use askama::Template;
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to render report: {0}")]
    Render(#[from] askama::Error),
    #[error("Failed to write report {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Everything the combined page shows.
pub struct ReportContent<'a> {
    pub title: &'a str,
    pub map_heading: &'a str,
    pub map_href: &'a str,
    pub chart_heading: &'a str,
    pub chart_src: &'a str,
    pub distribution: Option<&'a ShareDistribution>,
    pub trends: &'a [RaceTrend],
    pub generated_at: DateTime<Local>,
}

/// Frame and image sizes of the embedded artifacts.
const MAP_FRAME: (u32, u32) = (1000, 600);
const CHART_WIDTH: u32 = 800;

#[derive(Template)]
#[template(path = "report.html")]
struct ReportPage<'a> {
    title: &'a str,
    map_heading: &'a str,
    map_href: &'a str,
    map_width: u32,
    map_height: u32,
    distribution: Option<&'a ShareDistribution>,
    std_dev: String,
    chart_heading: &'a str,
    chart_src: &'a str,
    chart_width: u32,
    trends: &'a [RaceTrend],
    generated: String,
}

/// Report generator for the combined visualization page
pub struct ReportComposer;

impl ReportComposer {
    /// Render the page.
    pub fn render(content: &ReportContent<'_>) -> Result<String, ReportError> {
        let std_dev = content
            .distribution
            .and_then(|d| d.std_dev)
            .map(|s| format!("{s:.4}"))
            .unwrap_or_else(|| "n/a".to_string());

        let page = ReportPage {
            title: content.title,
            map_heading: content.map_heading,
            map_href: content.map_href,
            map_width: MAP_FRAME.0,
            map_height: MAP_FRAME.1,
            distribution: content.distribution,
            std_dev,
            chart_heading: content.chart_heading,
            chart_src: content.chart_src,
            chart_width: CHART_WIDTH,
            trends: content.trends,
            generated: content.generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        Ok(page.render()?)
    }

    /// Render and write the page to `path`, replacing any existing file.
    pub fn write(content: &ReportContent<'_>, path: &Path) -> Result<(), ReportError> {
        fs::write(path, Self::render(content)?).map_err(|source| ReportError::Write {
            path: path.display().to_string(),
            source,
        })?;
        info!("wrote report → {}", path.display());
        Ok(())
    }
}
