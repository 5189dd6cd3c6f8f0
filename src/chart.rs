use std::path::Path;

use plotters::prelude::*;

use crate::error::{KpiError, Result};

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 600;
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);

fn chart_err<E: std::fmt::Display>(e: E) -> KpiError {
    KpiError::Chart(e.to_string())
}

/// Headroom above the tallest bar, and a floor of zero unless a value is
/// negative. An all-zero series still gets a drawable range.
fn value_range(values: &[f64]) -> (f64, f64) {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    let min = values.iter().copied().fold(0.0_f64, f64::min);
    let span = if max - min > 0.0 { max - min } else { 1.0 };
    let lo = if min < 0.0 { min - span * 0.1 } else { 0.0 };
    (lo, max + span * 0.1)
}

/// Draw one bar per label and write the chart to `path` as SVG.
pub fn render_bar_chart(
    path: &Path,
    title: &str,
    y_label: &str,
    labels: &[String],
    values: &[f64],
) -> Result<()> {
    if labels.len() != values.len() {
        return Err(KpiError::Chart(format!(
            "{title}: {} labels for {} values",
            labels.len(),
            values.len()
        )));
    }
    if let Some(v) = values.iter().find(|v| !v.is_finite()) {
        return Err(KpiError::Chart(format!("{title}: cannot plot {v}")));
    }

    let root = SVGBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let slots = labels.len().max(1) as u32;
    let (lo, hi) = value_range(values);
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d((0..slots).into_segmented(), lo..hi)
        .map_err(chart_err)?;

    let category_label = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len().max(1))
        .x_label_formatter(&category_label)
        .y_desc(y_label)
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(values.iter().enumerate().map(|(i, &v)| {
            let i = i as u32;
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), v)],
                SKY_BLUE.filled(),
            );
            bar.set_margin(0, 0, 8, 8);
            bar
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    log::info!("Wrote chart {}", path.display());
    Ok(())
}
