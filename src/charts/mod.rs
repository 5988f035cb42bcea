//! Charts module - choropleth map and race trend line chart

mod choropleth;
mod line_chart;

pub use choropleth::{blues, ChoroplethMap, STATE_TILES};
pub use line_chart::LineChartRenderer;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to write chart: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to draw chart: {0}")]
    Plot(String),
    #[error("Failed to encode chart image: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Failed to render map page: {0}")]
    Template(#[from] askama::Error),
    #[error("Chart buffer does not match {width}x{height}")]
    Buffer { width: u32, height: u32 },
}

pub(crate) fn plot_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Plot(e.to_string())
}
