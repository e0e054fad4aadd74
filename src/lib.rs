//! # campus-scout: site crawling for an LLM course advisor
//!
//! This crate acquires the text corpus behind a course-advisor chat
//! application: it crawls a university site depth-first within a domain,
//! extracts visible page text, and upserts it into a local libsql table
//! whose full scan becomes plain-text context for the (external) prompt
//! assembler. Two one-shot scrapers produce the static JSON artifacts the
//! advisor consults: a discipline keyword table and a structured course
//! catalog.
//!
//! ## Features
//!
//! - Sequential, politeness-delayed crawling with a per-run visited set and
//!   a configurable depth bound
//! - Visible-text extraction and same-domain link discovery
//! - Durable last-write-wins page storage backed by libsql
//! - Discipline keyword scraping with insertion-ordered classification
//! - Course catalog scraping (program pages and plan tables)
//! - Async API with Tokio
//!
//! ## Example
//!
//! ```rust,no_run
//! use campus_scout::crawler::{Crawler, CrawlerConfig};
//! use campus_scout::store::PageStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = PageStore::new_from_path("pages.db").await?;
//!     let config = CrawlerConfig::builder().max_depth(2).build();
//!
//!     let crawler = Crawler::new(config, store.clone())?;
//!     let report = crawler.run("https://www.rmit.edu.au/").await?;
//!     println!("stored {} pages", report.pages_stored);
//!
//!     // Hand the corpus to a prompt assembler.
//!     let context = store.context_text(Some(20_000)).await?;
//!     println!("{} chars of context", context.len());
//!     Ok(())
//! }
//! ```

mod error;

pub mod catalog;
pub mod crawler;
pub mod keywords;
pub mod store;

pub use error::Error;

/// Re-export of the crate's error types for public use
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::Result;
}
