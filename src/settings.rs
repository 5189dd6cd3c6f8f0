use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{KpiError, Result};
use crate::models::CostBasis;

/// Points the CLI at a different settings file.
pub const CONFIG_ENV: &str = "KPIBOARD_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_sales_path")]
    pub sales_path: String,
    #[serde(default = "default_marketing_path")]
    pub marketing_path: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub cost_basis: CostBasis,
    #[serde(default)]
    pub scrape: ScrapeSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeSettings {
    pub base_url: String,
    pub listing_class: String,
    pub pages: u32,
    pub delay_secs: f64,
    pub timeout_secs: u64,
    pub output: String,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            base_url: "https://webscraper.io/test-sites/e-commerce/allinone".to_string(),
            listing_class: "col-md-4 col-xl-4 col-lg-4".to_string(),
            pages: 5,
            delay_secs: 2.0,
            timeout_secs: 10,
            output: "scraped_data.json".to_string(),
        }
    }
}

fn default_sales_path() -> String {
    "sales data1.csv".to_string()
}

fn default_marketing_path() -> String {
    "sales data2.csv".to_string()
}

fn default_output_dir() -> String {
    ".".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sales_path: default_sales_path(),
            marketing_path: default_marketing_path(),
            output_dir: default_output_dir(),
            cost_basis: CostBasis::default(),
            scrape: ScrapeSettings::default(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("kpiboard")
}

pub fn settings_path() -> PathBuf {
    match std::env::var_os(CONFIG_ENV) {
        Some(p) if !p.is_empty() => PathBuf::from(p),
        _ => config_dir().join("settings.json"),
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

/// Missing or unreadable files fall back to defaults.
pub fn load_settings_from(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }
    let content = std::fs::read_to_string(path).unwrap_or_default();
    serde_json::from_str(&content).unwrap_or_else(|e| {
        log::warn!("Ignoring malformed settings file {}: {e}", path.display());
        Settings::default()
    })
}

pub fn save_settings(settings: &Settings) -> Result<PathBuf> {
    let path = settings_path();
    save_settings_to(settings, &path)?;
    Ok(path)
}

pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| KpiError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn settings_file_exists() -> bool {
    settings_path().exists()
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}
