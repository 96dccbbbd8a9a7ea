//! PNG charts of the valid rows of the summary table.

use std::error::Error;
use std::fs;
use std::ops::Range;
use std::path::Path;

use cacti_report_extract::table::ValidRow;
use plotters::prelude::*;
use tracing::debug;

pub const ACCESS_TIME_CHART: &str = "access_time_comparison.png";
pub const READ_ENERGY_CHART: &str = "read_energy_comparison.png";
pub const AREA_CHART: &str = "area_vs_access.png";

const CHART_SIZE: (u32, u32) = (1200, 800);

/// Series label and its points, sorted by x.
type Series = (String, Vec<(f64, f64)>);

#[derive(Debug, Clone, Copy)]
enum Marker {
    Circle,
    Square,
}

struct LineChart<'a> {
    caption: &'a str,
    x_desc: &'a str,
    y_desc: &'a str,
    marker: Marker,
}

/// Renders the three comparison charts into `dir`.
///
/// Rows missing access time, read energy or area are left out of every
/// chart. A chart with no plottable points is skipped.
pub fn render_all(rows: &[ValidRow], dir: &Path) -> Result<(), Box<dyn Error>> {
    let complete: Vec<&ValidRow> = rows
        .iter()
        .filter(|row| {
            row.value("access_time").is_some()
                && row.value("read_energy").is_some()
                && row.value("area_mm2").is_some()
        })
        .collect();

    println!();
    println!("Creating visualizations...");
    fs::create_dir_all(dir)?;

    let by_block = group_series(
        &complete,
        |row| format!("Block: {}B", row.block_size),
        |row| Some((row.associativity_value()?, row.value("access_time")?)),
    );
    render_line_chart(
        &dir.join(ACCESS_TIME_CHART),
        &LineChart {
            caption: "Access Time by Configuration",
            x_desc: "Associativity",
            y_desc: "Access Time (ns)",
            marker: Marker::Circle,
        },
        &by_block,
    )?;

    let by_assoc = group_series(
        &complete,
        |row| format!("Assoc: {}", row.associativity),
        |row| Some((row.block_size_value()?, row.value("read_energy")?)),
    );
    render_line_chart(
        &dir.join(READ_ENERGY_CHART),
        &LineChart {
            caption: "Read Energy by Configuration",
            x_desc: "Block Size (bytes)",
            y_desc: "Read Energy (nJ)",
            marker: Marker::Square,
        },
        &by_assoc,
    )?;

    render_area_scatter(&dir.join(AREA_CHART), &complete)?;

    println!("Charts saved as PNG in {}", dir.display());
    Ok(())
}

/// Groups rows into labelled series in first-appearance order. Rows whose
/// point cannot be built are dropped.
fn group_series(
    rows: &[&ValidRow],
    label: impl Fn(&ValidRow) -> String,
    point: impl Fn(&ValidRow) -> Option<(f64, f64)>,
) -> Vec<Series> {
    let mut series: Vec<Series> = Vec::new();
    for row in rows {
        let Some(point) = point(*row) else {
            debug!(file = %row.filename, "Row has no numeric chart coordinates");
            continue;
        };
        let label = label(*row);
        match series.iter_mut().find(|(name, _)| *name == label) {
            Some((_, points)) => points.push(point),
            None => series.push((label, vec![point])),
        }
    }
    for (_, points) in &mut series {
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
    }
    series
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None::<(f64, f64)>, |acc, v| match acc {
        Some((lo, hi)) => Some((v.min(lo), v.max(hi))),
        None => Some((v, v)),
    })
}

/// Axis range covering `values` with a small margin; `None` when empty.
fn axis_range(values: impl Iterator<Item = f64>) -> Option<Range<f64>> {
    let (min, max) = bounds(values)?;
    if min == max {
        let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.1 };
        return Some(min - pad..max + pad);
    }
    let pad = (max - min) * 0.05;
    Some(min - pad..max + pad)
}

fn render_line_chart(
    path: &Path,
    layout: &LineChart<'_>,
    series: &[Series],
) -> Result<(), Box<dyn Error>> {
    let points = || series.iter().flat_map(|(_, points)| points.iter());
    let (Some(x_range), Some(y_range)) = (
        axis_range(points().map(|p| p.0)),
        axis_range(points().map(|p| p.1)),
    ) else {
        debug!(chart = %path.display(), "No plottable points, skipping chart");
        return Ok(());
    };

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(layout.caption, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(layout.x_desc)
        .y_desc(layout.y_desc)
        .draw()?;

    for (idx, (label, points)) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

        match layout.marker {
            Marker::Circle => {
                chart.draw_series(
                    points
                        .iter()
                        .map(|&point| Circle::new(point, 4, color.filled())),
                )?;
            }
            Marker::Square => {
                chart.draw_series(points.iter().map(|&point| {
                    EmptyElement::at(point) + Rectangle::new([(-4, -4), (4, 4)], color.filled())
                }))?;
            }
        }
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Scatter of access time against area. Point color follows block size and
/// point size follows associativity.
fn render_area_scatter(path: &Path, rows: &[&ValidRow]) -> Result<(), Box<dyn Error>> {
    let points: Vec<(f64, f64, Option<f64>, Option<f64>)> = rows
        .iter()
        .filter_map(|row| {
            Some((
                row.value("access_time")?,
                row.value("area_mm2")?,
                row.block_size_value(),
                row.associativity_value(),
            ))
        })
        .collect();

    let (Some(x_range), Some(y_range)) = (
        axis_range(points.iter().map(|p| p.0)),
        axis_range(points.iter().map(|p| p.1)),
    ) else {
        debug!(chart = %path.display(), "No plottable points, skipping chart");
        return Ok(());
    };
    let block_range = bounds(points.iter().filter_map(|p| p.2));

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Access Time vs Area (color: block size, size: associativity)",
            ("sans-serif", 30),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Access Time (ns)")
        .y_desc("Area (mm²)")
        .draw()?;

    chart.draw_series(points.iter().map(|&(x, y, block, assoc)| {
        let style = match (block, block_range) {
            (Some(block), Some((lo, hi))) => {
                let t = if hi > lo { (block - lo) / (hi - lo) } else { 0.5 };
                HSLColor(0.75 - 0.6 * t, 0.7, 0.45).mix(0.7).filled()
            }
            _ => RGBAColor(128, 128, 128, 0.7).filled(),
        };
        let radius = assoc.map_or(3.0, |a| (a * 20.0).sqrt().clamp(3.0, 20.0));
        Circle::new((x, y), radius as u32, style)
    }))?;

    root.present()?;
    Ok(())
}
