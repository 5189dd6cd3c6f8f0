use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::html::{self, ChartSection};
use crate::models::{CategoryKpi, CostBasis, ForecastResult};
use crate::settings::{shellexpand_path, Settings};
use crate::{aggregate, chart, forecast, loader, merge};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    TotalSales,
    Roms,
    Aov,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::TotalSales, Metric::Roms, Metric::Aov];

    pub fn title(&self) -> &'static str {
        match self {
            Self::TotalSales => "Total Sales per Category",
            Self::Roms => "Return on Marketing Spend per Category",
            Self::Aov => "Average Order Value per Category",
        }
    }

    pub fn y_label(&self) -> &'static str {
        match self {
            Self::TotalSales => "Sales",
            Self::Roms => "ROMS",
            Self::Aov => "AOV",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::TotalSales => "total_sales.svg",
            Self::Roms => "roms.svg",
            Self::Aov => "aov.svg",
        }
    }

    pub fn value(&self, kpi: &CategoryKpi) -> f64 {
        match self {
            Self::TotalSales => kpi.total_sales,
            Self::Roms => kpi.roms,
            Self::Aov => kpi.aov,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub sales_path: PathBuf,
    pub marketing_path: PathBuf,
    pub output_dir: PathBuf,
    pub cost_basis: CostBasis,
}

impl ReportConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            sales_path: PathBuf::from(shellexpand_path(&settings.sales_path)),
            marketing_path: PathBuf::from(shellexpand_path(&settings.marketing_path)),
            output_dir: PathBuf::from(shellexpand_path(&settings.output_dir)),
            cost_basis: settings.cost_basis,
        }
    }
}

#[derive(Debug)]
pub struct ReportOutcome {
    pub kpis: Vec<CategoryKpi>,
    pub forecasts: Vec<ForecastResult>,
    pub charts: Vec<PathBuf>,
    pub report: PathBuf,
}

/// load → merge → validate → aggregate → forecast → render.
///
/// Nothing is written unless every earlier stage succeeds.
pub fn run(config: &ReportConfig) -> Result<ReportOutcome> {
    let sales = loader::read_table(&config.sales_path)?;
    let marketing = loader::read_table(&config.marketing_path)?;
    let rows = merge::validate(&merge::merge(&sales, &marketing)?)?;

    let kpis = aggregate::compute(&rows, config.cost_basis)?;
    let forecasts = forecast::predict(&rows, config.cost_basis);

    let (charts, report) = render(&config.output_dir, &kpis, &forecasts)?;
    Ok(ReportOutcome {
        kpis,
        forecasts,
        charts,
        report,
    })
}

/// Write one chart per metric plus the HTML report into `output_dir`.
pub fn render(
    output_dir: &Path,
    kpis: &[CategoryKpi],
    forecasts: &[ForecastResult],
) -> Result<(Vec<PathBuf>, PathBuf)> {
    std::fs::create_dir_all(output_dir)?;
    let labels: Vec<String> = kpis.iter().map(|k| k.category.clone()).collect();

    let mut charts = Vec::with_capacity(Metric::ALL.len());
    for metric in Metric::ALL {
        let values: Vec<f64> = kpis.iter().map(|k| metric.value(k)).collect();
        let path = output_dir.join(metric.file_name());
        chart::render_bar_chart(&path, metric.title(), metric.y_label(), &labels, &values)?;
        charts.push(path);
    }

    let sections: Vec<ChartSection> = Metric::ALL
        .iter()
        .map(|m| ChartSection {
            title: m.title(),
            image: m.file_name(),
        })
        .collect();
    let report = output_dir.join(html::REPORT_FILE);
    html::write_report(&report, &html::render_report(&sections, forecasts))?;
    log::info!("Wrote report {}", report.display());
    Ok((charts, report))
}
