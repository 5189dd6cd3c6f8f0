use std::collections::{BTreeMap, HashSet};

use crate::error::{KpiError, Result};
use crate::models::{CategoryKpi, CostBasis, CostRecord, MergedRow, SalesRecord};

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    sales: f64,
    quantity: i64,
    cost: f64,
}

/// Sales records that feed the aggregates under `basis`.
pub fn contributing_sales(rows: &[MergedRow], basis: CostBasis) -> Vec<&SalesRecord> {
    match basis {
        CostBasis::Joined => rows.iter().map(|r| &r.sales).collect(),
        CostBasis::CostTable => {
            let mut seen = HashSet::new();
            rows.iter()
                .filter(|r| seen.insert(r.sales_row))
                .map(|r| &r.sales)
                .collect()
        }
    }
}

fn contributing_costs(rows: &[MergedRow], basis: CostBasis) -> Vec<&CostRecord> {
    match basis {
        CostBasis::Joined => rows.iter().map(|r| &r.cost).collect(),
        CostBasis::CostTable => {
            let mut seen = HashSet::new();
            rows.iter()
                .filter(|r| seen.insert(r.cost_row))
                .map(|r| &r.cost)
                .collect()
        }
    }
}

/// TotalSales, ROMS and AOV per category, ordered by category name.
pub fn compute(rows: &[MergedRow], basis: CostBasis) -> Result<Vec<CategoryKpi>> {
    let mut totals: BTreeMap<&str, Totals> = BTreeMap::new();
    for s in contributing_sales(rows, basis) {
        let t = totals.entry(s.category.as_str()).or_default();
        t.sales += s.total_sales;
        t.quantity = t.quantity.checked_add(s.quantity_sold).ok_or_else(|| {
            KpiError::Other(format!(
                "QuantitySold total overflows for category {:?}",
                s.category
            ))
        })?;
    }
    for c in contributing_costs(rows, basis) {
        totals.entry(c.category.as_str()).or_default().cost += c.cost;
    }

    let kpis = totals
        .into_iter()
        .map(|(category, t)| {
            if t.cost == 0.0 {
                return Err(KpiError::ZeroDenominator {
                    category: category.to_string(),
                    metric: "ROMS",
                });
            }
            if t.quantity == 0 {
                return Err(KpiError::ZeroDenominator {
                    category: category.to_string(),
                    metric: "AOV",
                });
            }
            Ok(CategoryKpi {
                category: category.to_string(),
                total_sales: t.sales,
                roms: t.sales / t.cost,
                aov: t.sales / t.quantity as f64,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    log::info!("Computed KPIs for {} categories", kpis.len());
    Ok(kpis)
}
