//! Error types for actlog-core

use thiserror::Error;

/// Main error type for the actlog-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV export error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A stored timestamp did not match `YYYY-MM-DD HH:MM:SS`
    #[error("malformed timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Collector failed to source raw data
    #[error("collector error: {0}")]
    Collector(String),
}

/// Result type alias for actlog-core
pub type Result<T> = std::result::Result<T, Error>;
