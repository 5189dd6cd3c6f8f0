use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub category: String,
    pub date: NaiveDate,
    pub total_sales: f64,
    pub quantity_sold: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostRecord {
    pub category: String,
    pub cost: f64,
}

/// One (sales row, cost row) pair produced by the category join.
///
/// `sales_row` and `cost_row` index into the source tables, so a sales row
/// repeated by several cost matches can still be recognised downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub sales_row: usize,
    pub cost_row: usize,
    pub sales: SalesRecord,
    pub cost: CostRecord,
}

/// Which rows feed the aggregates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CostBasis {
    /// Aggregate the joined rows as-is; a category with N cost rows counts
    /// each of its sales rows N times, and each cost row once per sales row.
    Joined,
    /// Count every sales row and every cost row once per category.
    #[default]
    CostTable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryKpi {
    pub category: String,
    pub total_sales: f64,
    pub roms: f64,
    pub aov: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Forecast {
    Predicted(f64),
    InsufficientData,
}

impl fmt::Display for Forecast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicted(v) => write!(f, "{v:.2}"),
            Self::InsufficientData => f.write_str("Insufficient data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    pub category: String,
    pub forecast: Forecast,
}

/// A product listing pulled from one scraped page.
#[cfg(feature = "scrape")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Price")]
    pub price: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Product URL")]
    pub product_url: String,
    #[serde(rename = "Image URL")]
    pub image_url: String,
}
