//! # Site Crawler Module
//!
//! Sequential crawling of a single domain: a timed-out fetcher, a
//! markup-stripping text extractor, and the traversal driver that walks the
//! hyperlink graph depth-first up to a configured bound and upserts every
//! page's text into the [`crate::store::PageStore`].
//!
//! ## Key Components
//!
//! - `CrawlerConfig`: depth bound, politeness delay, timeout, user agent
//! - `Fetcher`: one GET per page, any failure reported for the caller to skip
//! - `extract`: visible text plus the absolute links a page references
//! - `Crawler`: the traversal itself, returning a [`CrawlReport`]
//!
//! Fetching is strictly one page at a time with a fixed pause after each
//! downloaded page. That is a politeness tradeoff the rest of the crate
//! assumes; callers wanting concurrency are looking at the wrong crate.

mod config;
mod driver;
mod error;
mod extract;
mod fetch;

pub use config::{CrawlerConfig, CrawlerConfigBuilder};
pub use driver::{CrawlReport, Crawler};
pub use error::CrawlError;
pub use extract::{Extraction, extract};
pub use fetch::Fetcher;
