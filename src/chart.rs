//! Stacked-area chart of the top-N selection
//!
//! The five top series and `Other` are stacked bottom-up over the sample
//! timestamps on a fixed 0-100% Y axis. SVG output carries the title,
//! local `HH:MM` axis labels and the legend. PNG output has the same bands
//! and grid but no text, because plotters is built without a font backend.

use crate::error::{PcpuvisError, Result};
use crate::html_output::HtmlOutput;
use crate::pipeline::PipelineReport;
use crate::top_n::TopSelection;
use chrono::{Local, TimeZone};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::ops::Range;
use std::path::Path;

/// Pixel size of the chart, 15x5 inches at 100 dpi
pub const CHART_SIZE: (u32, u32) = (1500, 500);

/// Series fill colors, in stacking order
const PALETTE: [RGBColor; 6] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
];

const GRID_COLOR: RGBColor = RGBColor(0xdd, 0xdd, 0xdd);
const Y_MAX: f64 = 100.0;
const X_LABELS: usize = 8;
const Y_LABELS: usize = 6;

/// Picture file kind, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFormat {
    Png,
    Svg,
    /// HTML page embedding the SVG chart and the ranked table
    Html,
}

impl ChartFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("png") => Ok(Self::Png),
            Some("svg") => Ok(Self::Svg),
            Some("html" | "htm") => Ok(Self::Html),
            _ => Err(PcpuvisError::InvalidConfig(format!(
                "unsupported picture file '{}': expected .png, .svg or .html",
                path.display()
            ))),
        }
    }
}

fn chart_error<E: std::fmt::Display>(err: E) -> PcpuvisError {
    PcpuvisError::Chart(err.to_string())
}

/// Upper edge of every stacked band; the last one is the row total
fn stacked_bands(selection: &TopSelection) -> Vec<Vec<f64>> {
    let mut edge = vec![0.0_f64; selection.timestamps.len()];
    selection
        .stacked()
        .iter()
        .map(|(_, series)| {
            for (i, value) in edge.iter_mut().enumerate() {
                *value += f64::from(series.get(i).copied().unwrap_or(0));
            }
            edge.clone()
        })
        .collect()
}

/// X axis range; a single sample still gets a non-empty range
fn x_range(timestamps: &[i64]) -> Range<i64> {
    let first = timestamps.first().copied().unwrap_or(0);
    let last = timestamps.last().copied().unwrap_or(first);
    first..last.max(first + 1)
}

/// Local `HH:MM` label for a Unix timestamp
fn time_label(unix: i64) -> String {
    Local
        .timestamp_opt(unix, 0)
        .earliest()
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    selection: &TopSelection,
    title: &str,
    annotate: bool,
) -> Result<()> {
    root.fill(&WHITE).map_err(chart_error)?;

    let x = x_range(&selection.timestamps);
    let mut builder = ChartBuilder::on(root);
    builder.margin(10);
    if annotate {
        builder.x_label_area_size(30).y_label_area_size(40);
        if !title.is_empty() {
            builder.caption(title, ("sans-serif", 22));
        }
    }
    let mut chart = builder
        .build_cartesian_2d(x.clone(), 0.0..Y_MAX)
        .map_err(chart_error)?;

    if annotate {
        chart
            .configure_mesh()
            .x_labels(X_LABELS)
            .y_labels(Y_LABELS)
            .x_label_formatter(&|t: &i64| time_label(*t))
            .y_label_formatter(&|v: &f64| format!("{:.0}", v))
            .y_desc("% CPU")
            .draw()
            .map_err(chart_error)?;
    } else {
        for pct in (20..=100).step_by(20) {
            let y = f64::from(pct);
            chart
                .draw_series(LineSeries::new(vec![(x.start, y), (x.end, y)], &GRID_COLOR))
                .map_err(chart_error)?;
        }
    }

    let timestamps = &selection.timestamps;
    let labels = selection.legend_labels();
    let mut lower = vec![0.0_f64; timestamps.len()];
    for (k, (upper, label)) in stacked_bands(selection).iter().zip(labels).enumerate() {
        let color = PALETTE[k % PALETTE.len()];
        let outline: Vec<(i64, f64)> = timestamps
            .iter()
            .zip(upper)
            .map(|(&t, &y)| (t, y.min(Y_MAX)))
            .chain(
                timestamps
                    .iter()
                    .zip(&lower)
                    .rev()
                    .map(|(&t, &y)| (t, y.min(Y_MAX))),
            )
            .collect();

        let band = chart
            .draw_series(std::iter::once(Polygon::new(outline, color.filled())))
            .map_err(chart_error)?;
        if annotate {
            band.label(label).legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
            });
        }
        lower.clone_from(upper);
    }

    if annotate {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(chart_error)?;
    }

    root.present().map_err(chart_error)?;
    Ok(())
}

/// Render the chart as a standalone SVG document
pub fn render_svg(selection: &TopSelection, title: &str) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        draw(&root, selection, title, true)?;
    }
    Ok(svg)
}

/// Write the chart as a PNG raster
pub fn write_png(selection: &TopSelection, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    draw(&root, selection, "", false)
}

/// Write the picture file in the format its extension names
pub fn write_chart(report: &PipelineReport, title: &str, path: &Path) -> Result<()> {
    match ChartFormat::from_path(path)? {
        ChartFormat::Png => write_png(&report.selection, path)?,
        ChartFormat::Svg => fs::write(path, render_svg(&report.selection, title)?)?,
        ChartFormat::Html => fs::write(path, HtmlOutput::new(title).to_html(report)?)?,
    }
    tracing::info!(path = %path.display(), "chart written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn selection() -> TopSelection {
        let names = ["a", "b", "c", "d", "e"];
        let per_name_series: BTreeMap<String, Vec<u8>> = names
            .iter()
            .zip([[30u8, 40], [20, 10], [10, 10], [5, 5], [2, 4]])
            .map(|(n, s)| (n.to_string(), s.to_vec()))
            .collect();
        let averages = per_name_series
            .iter()
            .map(|(n, s)| (n.clone(), f64::from(s[0] + s[1]) / 2.0))
            .collect();
        TopSelection {
            timestamps: vec![1_500_000_000, 1_500_000_015],
            top_names: names.iter().map(|n| n.to_string()).collect(),
            per_name_series,
            other_series: vec![3, 80],
            averages,
            other_average: 41.5,
        }
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ChartFormat::from_path(Path::new("a.png")).unwrap(), ChartFormat::Png);
        assert_eq!(ChartFormat::from_path(Path::new("a.SVG")).unwrap(), ChartFormat::Svg);
        assert_eq!(ChartFormat::from_path(Path::new("a.htm")).unwrap(), ChartFormat::Html);
        assert!(matches!(
            ChartFormat::from_path(Path::new("chart.gif")),
            Err(PcpuvisError::InvalidConfig(_))
        ));
        assert!(ChartFormat::from_path(Path::new("chart")).is_err());
    }

    #[test]
    fn test_bands_are_cumulative() {
        let bands = stacked_bands(&selection());
        assert_eq!(bands.len(), 6);
        assert_eq!(bands[0], vec![30.0, 40.0]);
        assert_eq!(bands[1], vec![50.0, 50.0]);
        // second row exceeds 100 and is clipped only when drawn
        assert_eq!(bands[5], vec![70.0, 149.0]);
    }

    #[test]
    fn test_x_range_single_sample() {
        assert_eq!(x_range(&[42]), 42..43);
        assert_eq!(x_range(&[10, 25]), 10..25);
        assert_eq!(x_range(&[]), 0..1);
    }

    #[test]
    fn test_svg_has_title_and_legend() {
        let svg = render_svg(&selection(), "Server 01").unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Server 01"));
        assert!(svg.contains("a: 35"));
        assert!(svg.contains("Other: 41.5%"));
        assert!(svg.matches("<polygon").count() >= 6);
    }

    #[test]
    fn test_png_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chart.png");
        write_png(&selection(), &path).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
    }
}
