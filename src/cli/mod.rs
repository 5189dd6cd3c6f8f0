pub mod init;
pub mod report;
#[cfg(feature = "scrape")]
pub mod scrape;
pub mod status;

use clap::{Parser, Subcommand};

use crate::models::CostBasis;

#[derive(Parser)]
#[command(
    name = "kpiboard",
    version,
    about = "Sales KPI report generator with per-category forecasts."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge sales and marketing data, compute KPIs and write the HTML report.
    Report {
        /// Sales CSV (Category, Date, TotalSales, QuantitySold)
        #[arg(long)]
        sales: Option<String>,
        /// Marketing CSV (Category, Cost)
        #[arg(long)]
        marketing: Option<String>,
        /// Directory for the charts and kpi_dashboard.html
        #[arg(long = "output-dir")]
        output_dir: Option<String>,
        /// How cost rows are counted when a category has several of them
        #[arg(long = "cost-basis", value_enum)]
        cost_basis: Option<CostBasis>,
    },
    /// Scrape product listings into a JSON file.
    #[cfg(feature = "scrape")]
    Scrape {
        /// Listing URL; `?page=N` is appended per page
        #[arg(long)]
        url: Option<String>,
        /// Space-separated classes of each listing's <div>
        #[arg(long = "class")]
        listing_class: Option<String>,
        /// Number of pages to fetch
        #[arg(long)]
        pages: Option<u32>,
        /// Seconds to wait between pages
        #[arg(long)]
        delay: Option<f64>,
        /// Output JSON path
        #[arg(long)]
        output: Option<String>,
    },
    /// Save default input and output locations to the settings file.
    Init {
        #[arg(long)]
        sales: Option<String>,
        #[arg(long)]
        marketing: Option<String>,
        #[arg(long = "output-dir")]
        output_dir: Option<String>,
    },
    /// Show the effective settings and whether the inputs exist.
    Status,
}
