//! Choropleth Map Module
//! Renders enrollment shares as a standalone HTML page with an SVG tile-grid
//! map of US states, shaded on a continuous Blues scale.

use crate::charts::ChartError;
use crate::stats::EnrollmentShare;
use askama::Template;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Tile grid position (row, column) of every state, DC and Puerto Rico.
pub const STATE_TILES: [(&str, u32, u32); 52] = [
    ("AK", 0, 0),
    ("ME", 0, 11),
    ("VT", 1, 10),
    ("NH", 1, 11),
    ("WA", 2, 1),
    ("ID", 2, 2),
    ("MT", 2, 3),
    ("ND", 2, 4),
    ("MN", 2, 5),
    ("IL", 2, 6),
    ("WI", 2, 7),
    ("MI", 2, 8),
    ("NY", 2, 9),
    ("RI", 2, 10),
    ("MA", 2, 11),
    ("OR", 3, 1),
    ("NV", 3, 2),
    ("WY", 3, 3),
    ("SD", 3, 4),
    ("IA", 3, 5),
    ("IN", 3, 6),
    ("OH", 3, 7),
    ("PA", 3, 8),
    ("NJ", 3, 9),
    ("CT", 3, 10),
    ("CA", 4, 1),
    ("UT", 4, 2),
    ("CO", 4, 3),
    ("NE", 4, 4),
    ("MO", 4, 5),
    ("KY", 4, 6),
    ("WV", 4, 7),
    ("VA", 4, 8),
    ("MD", 4, 9),
    ("DE", 4, 10),
    ("AZ", 5, 2),
    ("NM", 5, 3),
    ("KS", 5, 4),
    ("AR", 5, 5),
    ("TN", 5, 6),
    ("NC", 5, 7),
    ("SC", 5, 8),
    ("DC", 5, 9),
    ("OK", 6, 4),
    ("LA", 6, 5),
    ("MS", 6, 6),
    ("AL", 6, 7),
    ("GA", 6, 8),
    ("HI", 7, 0),
    ("TX", 7, 4),
    ("FL", 7, 9),
    ("PR", 7, 11),
];

/// Plotly's "Blues" continuous scale.
const BLUES: [(u8, u8, u8); 9] = [
    (247, 251, 255),
    (222, 235, 247),
    (198, 219, 239),
    (158, 202, 225),
    (107, 174, 214),
    (66, 146, 198),
    (33, 113, 181),
    (8, 81, 156),
    (8, 48, 107),
];

const NO_DATA_FILL: &str = "#e5e5e5";
const TILE: u32 = 56;
const GAP: u32 = 4;
const GRID_COLS: u32 = 12;
const GRID_ROWS: u32 = 8;

/// Interpolated Blues color for `t` in [0, 1] (clamped).
pub fn blues(t: f64) -> (u8, u8, u8) {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (BLUES.len() - 1) as f64;
    let lower = scaled.floor() as usize;
    let upper = (lower + 1).min(BLUES.len() - 1);
    let frac = scaled - lower as f64;

    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (a, b) = (BLUES[lower], BLUES[upper]);
    (lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

fn hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// One grid tile as drawn.
struct MapTile {
    code: &'static str,
    x: u32,
    y: u32,
    label_x: u32,
    code_y: u32,
    value_y: u32,
    fill: String,
    text_fill: &'static str,
    tooltip: String,
    value_label: String,
}

struct LegendStop {
    offset: u32,
    color: String,
}

#[derive(Template)]
#[template(path = "choropleth.html")]
struct ChoroplethPage<'a> {
    title: &'a str,
    width: u32,
    height: u32,
    tile_size: u32,
    tiles: Vec<MapTile>,
    stops: Vec<LegendStop>,
    min: f64,
    max: f64,
    unmapped: Vec<&'a EnrollmentShare>,
    shares: &'a [EnrollmentShare],
}

/// Builds the interactive enrollment map document.
pub struct ChoroplethMap<'a> {
    title: &'a str,
    shares: &'a [EnrollmentShare],
}

impl<'a> ChoroplethMap<'a> {
    pub fn new(title: &'a str, shares: &'a [EnrollmentShare]) -> Self {
        Self { title, shares }
    }

    fn value_range(&self) -> (f64, f64) {
        let min = self
            .shares
            .iter()
            .map(|s| s.percentage)
            .fold(f64::INFINITY, f64::min);
        let max = self
            .shares
            .iter()
            .map(|s| s.percentage)
            .fold(f64::NEG_INFINITY, f64::max);
        if min.is_infinite() {
            (0.0, 0.0)
        } else {
            (min, max)
        }
    }

    /// Fill color for a percentage given the data range.
    pub fn fill_for(value: f64, min: f64, max: f64) -> String {
        let t = if max > min {
            (value - min) / (max - min)
        } else {
            0.5
        };
        hex(blues(t))
    }

    /// States present in the data but absent from the tile grid.
    pub fn unmapped(&self) -> Vec<&EnrollmentShare> {
        self.shares
            .iter()
            .filter(|s| {
                let code = s.state.to_ascii_uppercase();
                !STATE_TILES.iter().any(|(c, _, _)| *c == code)
            })
            .collect()
    }

    fn tiles(&self, min: f64, max: f64) -> Vec<MapTile> {
        let by_code: HashMap<String, (usize, &EnrollmentShare)> = self
            .shares
            .iter()
            .enumerate()
            .map(|(rank, s)| (s.state.to_ascii_uppercase(), (rank + 1, s)))
            .collect();

        STATE_TILES
            .iter()
            .map(|&(code, row, col)| {
                let x = col * (TILE + GAP);
                let y = row * (TILE + GAP);
                let (fill, text_fill, tooltip, value_label) = match by_code.get(code) {
                    Some((rank, share)) => {
                        let dark = max > min && (share.percentage - min) / (max - min) > 0.6;
                        (
                            Self::fill_for(share.percentage, min, max),
                            if dark { "#ffffff" } else { "#08306b" },
                            format!(
                                "{}: {:.2}% of enrollees (rank {rank})",
                                share.state, share.percentage
                            ),
                            format!("{:.1}%", share.percentage),
                        )
                    }
                    None => (
                        NO_DATA_FILL.to_string(),
                        "#08306b",
                        format!("{code}: no data"),
                        String::new(),
                    ),
                };
                MapTile {
                    code,
                    x,
                    y,
                    label_x: x + TILE / 2,
                    code_y: y + TILE / 2 - 2,
                    value_y: y + TILE / 2 + 14,
                    fill,
                    text_fill,
                    tooltip,
                    value_label,
                }
            })
            .collect()
    }

    fn legend_stops() -> Vec<LegendStop> {
        (0..BLUES.len())
            .map(|i| {
                let t = i as f64 / (BLUES.len() - 1) as f64;
                LegendStop {
                    offset: (t * 100.0).round() as u32,
                    color: hex(blues(t)),
                }
            })
            .collect()
    }

    /// Full standalone HTML document.
    pub fn to_html(&self) -> Result<String, ChartError> {
        let (min, max) = self.value_range();
        let page = ChoroplethPage {
            title: self.title,
            width: GRID_COLS * (TILE + GAP),
            height: GRID_ROWS * (TILE + GAP),
            tile_size: TILE,
            tiles: self.tiles(min, max),
            stops: Self::legend_stops(),
            min,
            max,
            unmapped: self.unmapped(),
            shares: self.shares,
        };
        Ok(page.render()?)
    }

    /// Write the document to `path`, replacing any existing file.
    pub fn write(&self, path: &Path) -> Result<(), ChartError> {
        for share in self.unmapped() {
            warn!(state = %share.state, "state has no map tile");
        }
        fs::write(path, self.to_html()?)?;
        info!("wrote choropleth map → {}", path.display());
        Ok(())
    }
}
