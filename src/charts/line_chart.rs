//! Race Trend Line Chart
//! Draws one line per race category across survey years with plotters into
//! an in-memory RGB buffer, then encodes it as PNG.
//!
//! Layout: caption on top, year on the X axis in the order the sheets were
//! read, percent on the Y axis, legend in the upper right corner.

use crate::charts::{plot_err, ChartError};
use crate::data::{RaceColumn, YearlyRaceTable};
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::info;

// One color per race category, in `RaceColumn::ALL` order.
const SERIES_COLORS: [RGBColor; 6] = [
    RGBColor(52, 152, 219),  // Blue
    RGBColor(231, 76, 60),   // Red
    RGBColor(46, 204, 113),  // Green
    RGBColor(155, 89, 182),  // Purple
    RGBColor(243, 156, 18),  // Orange
    RGBColor(26, 188, 156),  // Teal
];

pub struct LineChartRenderer;

impl LineChartRenderer {
    /// Y axis bounds with 15% padding; 0-100 when there is nothing to plot.
    pub fn y_range(table: &YearlyRaceTable) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for row in &table.rows {
            for &v in row.values.values() {
                if v.is_finite() {
                    min = min.min(v);
                    max = max.max(v);
                }
            }
        }
        if min.is_infinite() {
            return (0.0, 100.0);
        }
        let pad = if max > min { (max - min) * 0.15 } else { 1.0 };
        ((min - pad).floor(), (max + pad).ceil())
    }

    /// Render the chart and return PNG bytes.
    pub fn render_png(
        table: &YearlyRaceTable,
        title: &str,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, ChartError> {
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        let years = table.years();
        let slots = years.len().max(1);
        let (y_min, y_max) = Self::y_range(table);

        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(plot_err)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(title, ("sans-serif", 22))
                .margin(20)
                .x_label_area_size(45)
                .y_label_area_size(55)
                .build_cartesian_2d((0usize..slots).into_segmented(), y_min..y_max)
                .map_err(plot_err)?;

            let year_label = |v: &SegmentValue<usize>| match v {
                SegmentValue::CenterOf(i) => years.get(*i).map(|y| y.to_string()).unwrap_or_default(),
                _ => String::new(),
            };

            chart
                .configure_mesh()
                .x_labels(slots)
                .x_label_formatter(&year_label)
                .x_desc("Year")
                .y_desc("Percent")
                .light_line_style(BLACK.mix(0.05))
                .bold_line_style(BLACK.mix(0.15))
                .axis_desc_style(("sans-serif", 16))
                .draw()
                .map_err(plot_err)?;

            for (race, color) in RaceColumn::ALL.iter().zip(SERIES_COLORS) {
                let points: Vec<(SegmentValue<usize>, f64)> = table
                    .series(*race)
                    .into_iter()
                    .map(|(i, v)| (SegmentValue::CenterOf(i), v))
                    .collect();
                if points.is_empty() {
                    continue;
                }

                chart
                    .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
                    .map_err(plot_err)?
                    .label(race.display_name())
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                    });
                chart
                    .draw_series(
                        points
                            .into_iter()
                            .map(|p| Circle::new(p, 4, color.filled())),
                    )
                    .map_err(plot_err)?;
            }

            if !table.is_empty() {
                chart
                    .configure_series_labels()
                    .position(SeriesLabelPosition::UpperRight)
                    .background_style(WHITE.mix(0.85))
                    .border_style(BLACK.mix(0.5))
                    .draw()
                    .map_err(plot_err)?;
            }

            root.present().map_err(plot_err)?;
        }

        let img = RgbImage::from_raw(width, height, buffer)
            .ok_or(ChartError::Buffer { width, height })?;
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    /// Render and write the PNG to `path`, replacing any existing file.
    pub fn write(
        table: &YearlyRaceTable,
        title: &str,
        width: u32,
        height: u32,
        path: &Path,
    ) -> Result<(), ChartError> {
        let png = Self::render_png(table, title, width, height)?;
        fs::write(path, png)?;
        info!(years = table.rows.len(), "wrote line chart → {}", path.display());
        Ok(())
    }
}
