//! Error types for the campus-scout crate

use thiserror::Error;

/// Result type for campus-scout operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for campus-scout operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Web crawling error
    #[error("Crawl error: {0}")]
    Crawl(String),

    /// Page store error
    #[error("Store error: {0}")]
    Store(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
