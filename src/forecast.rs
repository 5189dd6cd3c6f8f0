use std::collections::BTreeMap;

use chrono::Datelike;

use crate::aggregate::contributing_sales;
use crate::models::{CostBasis, Forecast, ForecastResult, MergedRow};

/// Least-squares line through `points`, evaluated at `x`.
///
/// x is centred on its mean before fitting, which keeps year-sized inputs
/// from losing precision. Returns `None` with fewer than two distinct x.
pub fn fit_and_predict(points: &[(f64, f64)], x: f64) -> Option<f64> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(px, _)| px).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, py)| py).sum::<f64>() / n;
    let sxx: f64 = points.iter().map(|(px, _)| (px - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = points
        .iter()
        .map(|(px, py)| (px - mean_x) * (py - mean_y))
        .sum();
    let slope = sxy / sxx;
    Some(mean_y + slope * (x - mean_x))
}

/// Yearly sales totals per category, each sorted by year.
pub fn yearly_totals(rows: &[MergedRow], basis: CostBasis) -> BTreeMap<&str, Vec<(i32, f64)>> {
    let mut by_cat: BTreeMap<&str, BTreeMap<i32, f64>> = BTreeMap::new();
    for s in contributing_sales(rows, basis) {
        *by_cat
            .entry(s.category.as_str())
            .or_default()
            .entry(s.date.year())
            .or_default() += s.total_sales;
    }
    by_cat
        .into_iter()
        .map(|(cat, years)| (cat, years.into_iter().collect()))
        .collect()
}

/// Next-year sales per category, ordered by category name.
pub fn predict(rows: &[MergedRow], basis: CostBasis) -> Vec<ForecastResult> {
    yearly_totals(rows, basis)
        .into_iter()
        .map(|(category, years)| {
            let forecast = match years.last() {
                Some(&(last, _)) if years.len() > 1 => {
                    let points: Vec<(f64, f64)> =
                        years.iter().map(|&(y, v)| (y as f64, v)).collect();
                    fit_and_predict(&points, (last + 1) as f64)
                        .map(Forecast::Predicted)
                        .unwrap_or(Forecast::InsufficientData)
                }
                _ => Forecast::InsufficientData,
            };
            log::debug!("Forecast for {category}: {forecast} ({} years)", years.len());
            ForecastResult {
                category: category.to_string(),
                forecast,
            }
        })
        .collect()
}
