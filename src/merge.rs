use std::collections::{HashMap, HashSet};

use crate::error::{KpiError, Result};
use crate::loader::{parse_date, parse_number, parse_quantity, Table};
use crate::models::{CostRecord, MergedRow, SalesRecord};

pub const KEY: &str = "Category";
pub const SALES_SUFFIX: &str = "_sales";
pub const MARKETING_SUFFIX: &str = "_marketing";

const DATE: &str = "Date";
const TOTAL_SALES: &str = "TotalSales";
const COST: &str = "Cost";
const QUANTITY_SOLD: &str = "QuantitySold";

/// Output of the category join before any typing.
///
/// The first `sales_width` headers come from the sales table.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTable {
    pub headers: Vec<String>,
    pub sales_width: usize,
    pub rows: Vec<JoinedRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRow {
    pub sales_row: usize,
    pub cost_row: usize,
    pub values: Vec<String>,
}

impl MergedTable {
    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// The sales-side date column, whether or not it had to be suffixed.
    fn sales_date_column(&self) -> Option<usize> {
        self.column(&format!("{DATE}{SALES_SUFFIX}")).or_else(|| {
            self.column(DATE).filter(|&i| i < self.sales_width)
        })
    }

    pub fn categories(&self) -> HashSet<&str> {
        self.rows.iter().map(|r| r.values[0].as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// Join
// ---------------------------------------------------------------------------

/// Inner join on `Category`. Rows without a counterpart on the other side
/// are dropped. Every sales row is paired with every matching cost row, in
/// sales order then marketing order.
pub fn merge(sales: &Table, marketing: &Table) -> Result<MergedTable> {
    let (Some(sales_key), Some(marketing_key)) = (sales.column(KEY), marketing.column(KEY)) else {
        return Err(KpiError::MissingColumns(vec![KEY.to_string()]));
    };

    let shared: HashSet<&str> = sales
        .headers
        .iter()
        .map(String::as_str)
        .filter(|&h| h != KEY && marketing.column(h).is_some())
        .collect();
    let suffixed = |name: &str, suffix: &str| {
        if shared.contains(name) {
            format!("{name}{suffix}")
        } else {
            name.to_string()
        }
    };

    // Category leads, then the remaining sales columns, then marketing.
    let mut headers = vec![KEY.to_string()];
    let sales_cols: Vec<usize> = (0..sales.headers.len()).filter(|&i| i != sales_key).collect();
    let marketing_cols: Vec<usize> =
        (0..marketing.headers.len()).filter(|&i| i != marketing_key).collect();
    headers.extend(sales_cols.iter().map(|&i| suffixed(&sales.headers[i], SALES_SUFFIX)));
    let sales_width = headers.len();
    headers.extend(
        marketing_cols
            .iter()
            .map(|&i| suffixed(&marketing.headers[i], MARKETING_SUFFIX)),
    );

    let mut by_category: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, row) in marketing.rows.iter().enumerate() {
        by_category.entry(row[marketing_key].as_str()).or_default().push(i);
    }

    let mut rows = Vec::new();
    for (si, srow) in sales.rows.iter().enumerate() {
        let category = srow[sales_key].as_str();
        let Some(matches) = by_category.get(category) else {
            log::debug!("Dropping sales row {} (category {category:?} has no cost rows)", si + 1);
            continue;
        };
        for &ci in matches {
            let mrow = &marketing.rows[ci];
            let mut values = Vec::with_capacity(headers.len());
            values.push(category.to_string());
            values.extend(sales_cols.iter().map(|&i| srow[i].clone()));
            values.extend(marketing_cols.iter().map(|&i| mrow[i].clone()));
            rows.push(JoinedRow {
                sales_row: si,
                cost_row: ci,
                values,
            });
        }
    }

    let merged = MergedTable {
        headers,
        sales_width,
        rows,
    };
    log::info!(
        "Joined {} sales rows with {} cost rows into {} rows across {} categories",
        sales.rows.len(),
        marketing.rows.len(),
        merged.rows.len(),
        merged.categories().len()
    );
    Ok(merged)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check the required columns, then type every joined row.
pub fn validate(merged: &MergedTable) -> Result<Vec<MergedRow>> {
    let date = merged.sales_date_column();
    let total = merged.column(TOTAL_SALES);
    let cost = merged.column(COST);
    let quantity = merged.column(QUANTITY_SOLD);

    let missing: Vec<String> = [
        (DATE, date),
        (TOTAL_SALES, total),
        (COST, cost),
        (QUANTITY_SOLD, quantity),
    ]
    .iter()
    .filter(|(_, idx)| idx.is_none())
    .map(|(name, _)| name.to_string())
    .collect();

    let (Some(date), Some(total), Some(cost), Some(quantity)) = (date, total, cost, quantity)
    else {
        return Err(KpiError::MissingColumns(missing));
    };

    merged
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| -> Result<MergedRow> {
            let cell = |idx: usize| row.values[idx].as_str();
            let invalid = |idx: usize| KpiError::InvalidValue {
                row: i + 1,
                column: merged.headers[idx].clone(),
                value: row.values[idx].clone(),
            };
            let category = cell(0).to_string();
            Ok(MergedRow {
                sales_row: row.sales_row,
                cost_row: row.cost_row,
                sales: SalesRecord {
                    category: category.clone(),
                    date: parse_date(cell(date)).ok_or_else(|| invalid(date))?,
                    total_sales: parse_number(cell(total)).ok_or_else(|| invalid(total))?,
                    quantity_sold: parse_quantity(cell(quantity))
                        .ok_or_else(|| invalid(quantity))?,
                },
                cost: CostRecord {
                    category,
                    cost: parse_number(cell(cost)).ok_or_else(|| invalid(cost))?,
                },
            })
        })
        .collect()
}
