//! Database operations for the page store

use libsql::{Connection, Row, params};
use tracing::{debug, instrument};

use crate::store::error::StoreError;
use crate::store::{Page, schema};

/// Last-write-wins page table keyed by URL
#[derive(Clone)]
pub struct PageStore {
    conn: Connection,
}

impl PageStore {
    /// Create a new store over an existing connection
    #[instrument(skip(conn))]
    pub async fn new(conn: Connection) -> Result<Self, StoreError> {
        schema::initialize_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Open (or create) a store at the given path
    pub async fn new_from_path(path: &str) -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to open database: {}", e)))?;

        let conn = db
            .connect()
            .map_err(|e| StoreError::Connection(format!("Failed to connect to database: {}", e)))?;

        Self::new(conn).await
    }

    /// Insert or fully replace the record for `url`
    pub async fn upsert(&self, url: &str, content: &str) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT INTO pages (url, content) VALUES (?, ?)
                 ON CONFLICT(url) DO UPDATE SET content = excluded.content",
                params![url, content],
            )
            .await
            .map_err(|e| StoreError::Query(format!("Failed to upsert page: {}", e)))?;

        debug!(url, "upserted page");
        Ok(())
    }

    /// Get a single page by URL
    pub async fn get(&self, url: &str) -> Result<Option<Page>, StoreError> {
        let mut rows = self
            .conn
            .query("SELECT url, content FROM pages WHERE url = ?", params![url])
            .await
            .map_err(|e| StoreError::Query(format!("Failed to get page: {}", e)))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_page(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Data(format!("Failed to get page: {}", e))),
        }
    }

    /// All stored page bodies. Row order is unspecified; callers must not
    /// depend on it.
    #[instrument(skip(self))]
    pub async fn scan_all(&self) -> Result<Vec<String>, StoreError> {
        let mut rows = self
            .conn
            .query("SELECT content FROM pages", params![])
            .await
            .map_err(|e| StoreError::Query(format!("Failed to scan pages: {}", e)))?;

        let mut bodies = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            bodies.push(
                row.get(0)
                    .map_err(|e| StoreError::Data(format!("Failed to get content: {}", e)))?,
            );
        }

        Ok(bodies)
    }

    /// All stored pages with their URLs
    pub async fn scan_pages(&self) -> Result<Vec<Page>, StoreError> {
        let mut rows = self
            .conn
            .query("SELECT url, content FROM pages", params![])
            .await
            .map_err(|e| StoreError::Query(format!("Failed to scan pages: {}", e)))?;

        let mut pages = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            pages.push(row_to_page(&row)?);
        }

        Ok(pages)
    }

    /// Number of stored pages
    pub async fn count(&self) -> Result<u64, StoreError> {
        let mut rows = self
            .conn
            .query("SELECT COUNT(*) FROM pages", params![])
            .await
            .map_err(|e| StoreError::Query(format!("Failed to count pages: {}", e)))?;

        let row = match rows.next().await {
            Ok(Some(row)) => row,
            Ok(None) => return Ok(0),
            Err(e) => return Err(StoreError::Data(format!("Failed to get count: {}", e))),
        };

        let count: i64 = row
            .get(0)
            .map_err(|e| StoreError::Data(format!("Failed to get count: {}", e)))?;
        Ok(count as u64)
    }

    /// The full corpus as one plain-text blob for a downstream prompt
    /// assembler, optionally truncated to `max_chars` characters.
    pub async fn context_text(&self, max_chars: Option<usize>) -> Result<String, StoreError> {
        let text = self.scan_all().await?.join("\n\n");

        Ok(match max_chars {
            Some(limit) => truncate_chars(&text, limit),
            None => text,
        })
    }
}

fn row_to_page(row: &Row) -> Result<Page, StoreError> {
    Ok(Page {
        url: row
            .get(0)
            .map_err(|e| StoreError::Data(format!("Failed to get url: {}", e)))?,
        content: row
            .get(1)
            .map_err(|e| StoreError::Data(format!("Failed to get content: {}", e)))?,
    })
}

/// Truncate to at most `limit` characters, respecting char boundaries
fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    async fn setup_test_store() -> (PageStore, tempfile::TempDir) {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();

        let store = PageStore::new_from_path(&db_path).await.unwrap();

        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_upsert_overwrites_not_appends() {
        let (store, _temp_dir) = setup_test_store().await;

        store.upsert("http://x/a", "v1").await.unwrap();
        store.upsert("http://x/a", "v2").await.unwrap();

        let bodies = store.scan_all().await.unwrap();
        assert_eq!(bodies, vec!["v2".to_string()]);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_and_scan_pages() {
        let (store, _temp_dir) = setup_test_store().await;

        store.upsert("http://x/a", "alpha").await.unwrap();
        store.upsert("http://x/b", "beta").await.unwrap();

        let page = store.get("http://x/a").await.unwrap().unwrap();
        assert_eq!(page.url, "http://x/a");
        assert_eq!(page.content, "alpha");
        assert!(store.get("http://x/missing").await.unwrap().is_none());

        let mut pages = store.scan_pages().await.unwrap();
        pages.sort_by(|a, b| a.url.cmp(&b.url));
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].content, "beta");
    }

    #[tokio::test]
    async fn test_rows_survive_reopen() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();

        {
            let store = PageStore::new_from_path(&db_path).await.unwrap();
            store.upsert("http://x/a", "kept").await.unwrap();
        }

        let store = PageStore::new_from_path(&db_path).await.unwrap();
        let page = store.get("http://x/a").await.unwrap().unwrap();
        assert_eq!(page.content, "kept");
    }

    #[tokio::test]
    async fn test_context_text_truncation() {
        let (store, _temp_dir) = setup_test_store().await;

        store.upsert("http://x/a", "abcdef").await.unwrap();

        assert_eq!(store.context_text(Some(3)).await.unwrap(), "abc");
        assert_eq!(store.context_text(None).await.unwrap(), "abcdef");
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
        assert_eq!(truncate_chars("", 3), "");
    }
}
