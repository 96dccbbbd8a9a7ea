//! Error types for report extraction and tabulation.
//!
//! Per-file problems never surface here: they become error records. These
//! variants cover the failures that stop a run, such as an unreadable
//! configuration file or results directory, or a table that cannot be written.

use thiserror::Error;

/// Errors that can occur while analyzing a results directory.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// File or directory I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML configuration parsing failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// CSV reading or writing failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid or missing input (unknown encoding name, missing column).
    #[error("{0}")]
    InvalidInput(String),
}

/// Convenience alias for results with [`ExtractError`].
pub type Result<T> = std::result::Result<T, ExtractError>;
