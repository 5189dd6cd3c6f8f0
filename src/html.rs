use std::fmt::Write as _;
use std::path::Path;

use crate::error::Result;
use crate::models::{Forecast, ForecastResult};

pub const REPORT_FILE: &str = "kpi_dashboard.html";

const HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>KPI Dashboard Report</title>
    <style>
        body { font-family: Arial, sans-serif; }
        h1 { text-align: center; }
        .chart { text-align: center; margin-bottom: 30px; }
        .predictions { color: green; font-weight: bold; }
        .insufficient { color: #888; font-style: italic; }
        table { width: 100%; border-collapse: collapse; margin-bottom: 30px; }
        table, th, td { border: 1px solid black; padding: 8px; text-align: left; }
        th { background-color: #f2f2f2; }
    </style>
</head>
<body>
    <h1>KPI Dashboard Report</h1>
"#;

/// A chart image embedded by relative reference.
pub struct ChartSection<'a> {
    pub title: &'a str,
    pub image: &'a str,
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_report(charts: &[ChartSection], forecasts: &[ForecastResult]) -> String {
    let mut html = String::from(HEAD);

    for chart in charts {
        let title = escape(chart.title);
        let _ = write!(
            html,
            "\n    <h2>{title}</h2>\n    <div class=\"chart\">\n        <img src=\"{}\" alt=\"{title}\">\n    </div>\n",
            escape(chart.image)
        );
    }

    html.push_str(
        "\n    <h2>Sales Predictions per Category</h2>\n    <div>\n        <table>\n            <tr>\n                <th>Category</th>\n                <th>Predicted Sales for Next Year</th>\n            </tr>\n",
    );
    for f in forecasts {
        let class = match f.forecast {
            Forecast::Predicted(_) => "predictions",
            Forecast::InsufficientData => "insufficient",
        };
        let _ = write!(
            html,
            "            <tr>\n                <td>{}</td>\n                <td class=\"{class}\">{}</td>\n            </tr>\n",
            escape(&f.category),
            f.forecast
        );
    }
    html.push_str("        </table>\n    </div>\n</body>\n</html>\n");
    html
}

/// Plain overwrite; no temp file.
pub fn write_report(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, html)?;
    Ok(())
}
