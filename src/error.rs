use thiserror::Error;

#[derive(Error, Debug)]
pub enum KpiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "scrape")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Missing columns in the dataset: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Invalid value {value:?} in column {column} (row {row})")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Cannot compute {metric} for category {category:?}: denominator is zero")]
    ZeroDenominator { category: String, metric: &'static str },

    #[error("Chart error: {0}")]
    Chart(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, KpiError>;
