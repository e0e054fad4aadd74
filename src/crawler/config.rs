//! Configuration for the crawler

use std::time::Duration;

/// Configuration for a crawl run
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Maximum link depth to follow from the seed
    pub max_depth: u32,

    /// Pause in milliseconds after each fetched page
    pub delay_ms: u64,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// User agent to use for requests
    pub user_agent: String,

    /// Host suffix that counts as in-domain; the seed's host when `None`
    pub domain_suffix: Option<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            delay_ms: 1000,
            timeout_secs: 10,
            user_agent: format!("campus-scout/{}", env!("CARGO_PKG_VERSION")),
            domain_suffix: None,
        }
    }
}

/// Builder for CrawlerConfig
#[derive(Debug, Default)]
pub struct CrawlerConfigBuilder {
    config: CrawlerConfig,
}

impl CrawlerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CrawlerConfig::default(),
        }
    }

    /// Set the maximum link depth to follow
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Set the pause in milliseconds after each fetched page
    pub fn delay_ms(mut self, delay_ms: u64) -> Self {
        self.config.delay_ms = delay_ms;
        self
    }

    /// Set the per-request timeout in seconds
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.config.timeout_secs = timeout_secs;
        self
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the host suffix that counts as in-domain
    pub fn domain_suffix(mut self, domain_suffix: impl Into<String>) -> Self {
        self.config.domain_suffix = Some(domain_suffix.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> CrawlerConfig {
        self.config
    }
}

impl CrawlerConfig {
    /// Create a new builder
    pub fn builder() -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::new()
    }

    /// Get the politeness delay as a Duration
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Get the fetch timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
