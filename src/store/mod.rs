//! Durable page storage
//!
//! A last-write-wins table keyed by URL, backed by a local libsql database.
//! The crawler only ever inserts or overwrites; retention is someone else's
//! problem.

mod database;
pub mod error;
mod schema;

pub use database::PageStore;
pub use error::StoreError;

use serde::{Deserialize, Serialize};

/// A stored page: extracted text keyed by the URL it was fetched from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Absolute URL; primary key in the store
    pub url: String,

    /// Extracted plain-text content at time of crawl
    pub content: String,
}
