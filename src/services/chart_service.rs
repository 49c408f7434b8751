use std::ops::Range;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use plotters::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::chart::price_changes;
use crate::models::{price_series, validate_data, DataError, Document, PricePoint};

pub const LINE_CHART_FILE: &str = "line_chart.png";
pub const HISTOGRAM_FILE: &str = "histogram.png";
pub const SCATTER_PLOT_FILE: &str = "scatter_plot.png";

const HISTOGRAM_BINS: usize = 50;
const DATE_FORMAT: &str = "%Y/%m/%d";

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Invalid data format for plotting: {0}")]
    InvalidData(#[from] DataError),
    #[error("Failed to render chart: {0}")]
    Render(String),
    #[error("Values too large to plot: {0}")]
    OutOfRange(String),
    #[error("Failed to prepare output directory: {0}")]
    Io(#[from] std::io::Error),
}

fn render_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

/// One histogram bar covering `[lower, upper)` (the last bar is closed)
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: u32,
}

/// Split `values` into `bins` equal-width bars spanning their min..max.
/// A zero-width span is widened by 0.5 on each side. Fails when the span
/// does not fit in an f64.
pub fn histogram_bins(values: &[f64], bins: usize) -> Result<Vec<Bin>, ChartError> {
    if values.is_empty() || bins == 0 {
        return Ok(Vec::new());
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    if !lo.is_finite() || !hi.is_finite() || !width.is_finite() || width <= 0.0 {
        return Err(ChartError::OutOfRange(format!("histogram span {}..{}", lo, hi)));
    }

    let mut result: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            lower: lo + i as f64 * width,
            upper: lo + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        result[idx].count += 1;
    }

    Ok(result)
}

/// Padded axis range for a set of values, 0..1 when there are none
fn value_range(values: impl Iterator<Item = f64>) -> Result<Range<f64>, ChartError> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min == f64::INFINITY && max == f64::NEG_INFINITY {
        return Ok(0.0..1.0);
    }
    let span = max - min;
    let padding = if span > 0.0 { span * 0.05 } else { 1.0 };
    let range = (min - padding)..(max + padding);
    // plotters cannot lay out an axis whose bounds or span overflow
    if !span.is_finite() || !range.start.is_finite() || !range.end.is_finite() {
        return Err(ChartError::OutOfRange(format!("axis span {}..{}", min, max)));
    }
    Ok(range)
}

/// The series for the histogram and scatter plot, or None when the
/// document cannot be plotted and the chart should be skipped
fn series_or_skip(document: &Document, chart: &str) -> Option<Vec<PricePoint>> {
    if !validate_data(document) {
        println!("Invalid data format for plotting");
        warn!("Skipping {}: {}", chart, DataError::MissingPrices);
        return None;
    }
    match price_series(document) {
        Ok(points) => Some(points),
        Err(e) => {
            println!("Invalid data format for plotting");
            warn!("Skipping {}: {}", chart, e);
            None
        }
    }
}

/// Time axis covering all points; at least one hour wide
fn time_range(points: &[PricePoint]) -> Range<DateTime<Utc>> {
    let start = points
        .first()
        .map(|p| p.timestamp)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    let end = points.last().map(|p| p.timestamp).unwrap_or(start);
    if end > start {
        start..end
    } else {
        start..start + Duration::hours(1)
    }
}

fn prepare_output(out_dir: &Path, file_name: &str) -> Result<PathBuf, ChartError> {
    std::fs::create_dir_all(out_dir)?;
    Ok(out_dir.join(file_name))
}

/// Bitcoin price over time as a line chart. Invalid data is an error.
pub fn plot_line_chart(document: &Document, out_dir: &Path) -> Result<(), ChartError> {
    if !validate_data(document) {
        return Err(ChartError::InvalidData(DataError::MissingPrices));
    }
    let points = price_series(document)?;
    let y_range = value_range(points.iter().map(|p| p.price))?;

    let path = prepare_output(out_dir, LINE_CHART_FILE)?;
    debug!("Rendering line chart of {} points to {}", points.len(), path.display());

    {
        let root = BitMapBackend::new(&path, (1600, 900)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let x_range = time_range(&points);
        // One label roughly every six hours
        let x_labels = ((x_range.end - x_range.start).num_hours() / 6 + 1).clamp(2, 30) as usize;

        let mut chart = ChartBuilder::on(&root)
            .caption("Bitcoin Price Over Time", ("sans-serif", 40.0).into_font())
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(x_range, y_range)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_labels(x_labels)
            .x_label_formatter(&|t: &DateTime<Utc>| t.format(DATE_FORMAT).to_string())
            .y_desc("Price in $")
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(LineSeries::new(
                points.iter().map(|p| (p.timestamp, p.price)),
                &BLUE,
            ))
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }

    info!("Saved {}", path.display());
    Ok(())
}

/// Distribution of consecutive price changes. Invalid data skips the chart.
pub fn plot_histogram(document: &Document, out_dir: &Path) -> Result<(), ChartError> {
    let Some(points) = series_or_skip(document, "histogram") else {
        return Ok(());
    };

    let changes: Vec<f64> = price_changes(&points).into_iter().map(|c| c.price).collect();
    let bins = histogram_bins(&changes, HISTOGRAM_BINS)?;

    let path = prepare_output(out_dir, HISTOGRAM_FILE)?;
    debug!("Rendering histogram of {} changes to {}", changes.len(), path.display());

    {
        let root = BitMapBackend::new(&path, (900, 400)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let x_range = match (bins.first(), bins.last()) {
            (Some(first), Some(last)) => first.lower..last.upper,
            _ => 0.0..1.0,
        };
        let y_max = bins.iter().map(|b| b.count).max().unwrap_or(0) + 1;

        let mut chart = ChartBuilder::on(&root)
            .caption("Distribution of Bitcoin Price Changes", ("sans-serif", 24.0).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, 0u32..y_max)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc("Price Change")
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(bins.iter().map(|b| {
                Rectangle::new([(b.lower, 0u32), (b.upper, b.count)], GREEN.mix(0.5).filled())
            }))
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }

    info!("Saved {}", path.display());
    Ok(())
}

/// Consecutive price changes against the time of the later sample.
/// Invalid data skips the chart.
pub fn plot_scatter(document: &Document, out_dir: &Path) -> Result<(), ChartError> {
    let Some(points) = series_or_skip(document, "scatter plot") else {
        return Ok(());
    };

    let changes = price_changes(&points);
    let y_range = value_range(changes.iter().map(|c| c.price))?;

    let path = prepare_output(out_dir, SCATTER_PLOT_FILE)?;
    debug!("Rendering scatter plot of {} changes to {}", changes.len(), path.display());

    {
        let root = BitMapBackend::new(&path, (900, 400)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Bitcoin Price Changes Over Time", ("sans-serif", 24.0).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(time_range(&changes), y_range)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_label_formatter(&|t: &DateTime<Utc>| t.format(DATE_FORMAT).to_string())
            .x_desc("Date")
            .y_desc("Price Change")
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(
                changes
                    .iter()
                    .map(|c| Circle::new((c.timestamp, c.price), 3, RED.mix(0.5).filled())),
            )
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }

    info!("Saved {}", path.display());
    Ok(())
}
