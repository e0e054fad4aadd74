//! HTTP fetching for the crawler
//!
//! A thin wrapper around a configured reqwest client. Any failure, whether
//! transport-level or a non-success status, comes back as a [`CrawlError`]
//! so the caller can treat the page uniformly as "skip this node". There
//! are no retries.

use std::time::Duration;

use reqwest::Client as ReqwestClient;
use tracing::debug;

use crate::crawler::error::CrawlError;

/// HTTP fetcher with a fixed per-request timeout
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: ReqwestClient,
}

impl Fetcher {
    /// Create a new fetcher
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, CrawlError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch a page and return its body text
    pub async fn fetch(&self, url: &str) -> Result<String, CrawlError> {
        debug!("Sending GET request to {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn fetcher() -> Fetcher {
        Fetcher::new(Duration::from_secs(5), "campus-scout-test/0.1").unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><body>hello</body></html>")
            .expect(1)
            .create_async()
            .await;

        let body = fetcher()
            .fetch(&format!("{}/page", server.url()))
            .await
            .unwrap();
        assert!(body.contains("hello"));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let err = fetcher()
            .fetch(&format!("{}/missing", server.url()))
            .await
            .unwrap_err();
        match err {
            CrawlError::Status { status, .. } => assert_eq!(status, 404),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_connection_error() {
        // Nothing listens on the discard port.
        let err = fetcher().fetch("http://127.0.0.1:9/none").await.unwrap_err();
        assert!(matches!(err, CrawlError::Http(_)));
    }
}
