use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::{money, ratio};
use crate::models::{CategoryKpi, CostBasis, Forecast, ForecastResult};
use crate::pipeline::{self, ReportConfig};
use crate::settings::load_settings;

pub fn run(
    sales: Option<String>,
    marketing: Option<String>,
    output_dir: Option<String>,
    cost_basis: Option<CostBasis>,
) -> Result<()> {
    let mut settings = load_settings();
    if let Some(s) = sales {
        settings.sales_path = s;
    }
    if let Some(m) = marketing {
        settings.marketing_path = m;
    }
    if let Some(o) = output_dir {
        settings.output_dir = o;
    }
    if let Some(b) = cost_basis {
        settings.cost_basis = b;
    }

    let config = ReportConfig::from_settings(&settings);
    let outcome = pipeline::run(&config)?;

    println!("{}", format_summary(&outcome.kpis, &outcome.forecasts));
    for chart in &outcome.charts {
        println!("Chart saved: {}", chart.display());
    }
    println!("HTML report generated: {}", outcome.report.display());
    Ok(())
}

pub(crate) fn format_summary(kpis: &[CategoryKpi], forecasts: &[ForecastResult]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Total Sales", "ROMS", "AOV", "Next Year"]);
    for kpi in kpis {
        let next = forecasts
            .iter()
            .find(|f| f.category == kpi.category)
            .map(|f| match f.forecast {
                Forecast::Predicted(v) => Cell::new(money(v)),
                Forecast::InsufficientData => Cell::new(f.forecast.to_string().dimmed()),
            })
            .unwrap_or_else(|| Cell::new(""));
        table.add_row(vec![
            Cell::new(&kpi.category),
            Cell::new(money(kpi.total_sales)),
            Cell::new(ratio(kpi.roms)),
            Cell::new(money(kpi.aov)),
            next,
        ]);
    }
    format!("{}\n{table}", "Category KPIs".bold())
}
