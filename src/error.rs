use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Data file not found: {path}")]
    DataFileNotFound { path: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("Missing required columns in {path}: {}", .columns.join(", "))]
    MissingColumns { path: String, columns: Vec<String> },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Returned when a role name is not one of the five lane assignments.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown role '{0}'. Expected one of TOP, JUNGLE, MID, ADC, SUP or ANY")]
pub struct ParseRoleError(pub String);
