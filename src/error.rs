//! Error handling for tokscrape

use thiserror::Error;

/// Main error type for tokscrape operations
#[derive(Error, Debug)]
pub enum TokscrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Session error: {0}")]
    Session(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

/// Result type alias for tokscrape operations
pub type Result<T> = std::result::Result<T, TokscrapeError>;
