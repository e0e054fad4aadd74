//! Error types for the crawler module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for fetch and scrape operations
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Transport-level HTTP failure, including timeouts
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response status
    #[error("request for {url} returned status {status}")]
    Status {
        /// URL the request was issued for
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl From<CrawlError> for CrateError {
    fn from(err: CrawlError) -> Self {
        match err {
            CrawlError::Http(e) => CrateError::Http(e),
            CrawlError::UrlParse(e) => CrateError::Other(format!("URL parse error: {}", e)),
            _ => CrateError::Crawl(err.to_string()),
        }
    }
}
