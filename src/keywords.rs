//! Discipline keyword table scraped from a listing page
//!
//! A one-shot scrape: anchors on a single listing page become
//! `label -> keyword tokens` entries that keyword-matching components look
//! up later. The table keeps insertion order because classification breaks
//! ties by the first matching entry, and duplicate labels overwrite earlier
//! tokens in place, the same last-write-wins rule the page store follows.

use std::collections::HashSet;
use std::path::Path;

use scraper::{Html, Selector};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::crawler::{CrawlError, Fetcher};
use crate::error::Error;

/// Ordered mapping from discipline label to keyword tokens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisciplineTable {
    entries: Vec<(String, Vec<String>)>,
}

impl DisciplineTable {
    /// Insert or overwrite an entry. A relisted label keeps its original
    /// position but takes the new tokens.
    pub fn insert(&mut self, label: String, tokens: Vec<String>) {
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| *existing == label)
        {
            Some((_, existing_tokens)) => *existing_tokens = tokens,
            None => self.entries.push((label, tokens)),
        }
    }

    /// Tokens for a label
    pub fn get(&self, label: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, tokens)| tokens.as_slice())
    }

    /// Labels in table order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Classify free text against the table: the first entry in table order
    /// with any token present as a word of the lowercased input wins.
    pub fn classify(&self, text: &str) -> Option<&str> {
        let words: HashSet<String> = text
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();

        self.entries
            .iter()
            .find(|(_, tokens)| tokens.iter().any(|token| words.contains(token)))
            .map(|(label, _)| label.as_str())
    }

    /// JSON object form, keys in table order
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (label, tokens) in &self.entries {
            map.insert(
                label.clone(),
                Value::Array(tokens.iter().cloned().map(Value::String).collect()),
            );
        }
        Value::Object(map)
    }

    /// Rebuild from the JSON object form, keeping key order
    pub fn from_json(value: &Value) -> Result<Self, Error> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::Other("discipline table must be a JSON object".to_string()))?;

        let mut table = Self::default();
        for (label, tokens) in object {
            let tokens = tokens
                .as_array()
                .ok_or_else(|| Error::Other(format!("tokens for '{}' must be an array", label)))?
                .iter()
                .map(|token| {
                    token.as_str().map(str::to_string).ok_or_else(|| {
                        Error::Other(format!("token under '{}' must be a string", label))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            table.insert(label.clone(), tokens);
        }

        Ok(table)
    }

    /// Persist as a JSON mapping file
    pub async fn save(&self, path: &Path) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(&self.to_json())?;
        tokio::fs::write(path, json).await?;

        info!(path = %path.display(), entries = self.len(), "saved discipline table");
        Ok(())
    }

    /// Load a previously saved mapping file
    pub async fn load(path: &Path) -> Result<Self, Error> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::from_json(&serde_json::from_str(&raw)?)
    }
}

/// Derive keyword tokens from a discipline label: lowercase, `&` to "and",
/// `/` to space, split on whitespace, first occurrence kept.
pub fn keyword_tokens(label: &str) -> Vec<String> {
    let normalized = label.to_lowercase().replace('&', "and").replace('/', " ");

    let mut seen = HashSet::new();
    let mut tokens = Vec::new();
    for token in normalized.split_whitespace() {
        if seen.insert(token.to_string()) {
            tokens.push(token.to_string());
        }
    }

    tokens
}

/// Fetch a single listing page and derive the discipline table from the
/// anchors matching `selector`. Duplicate labels overwrite earlier entries.
pub async fn scrape_disciplines(
    fetcher: &Fetcher,
    listing_url: &str,
    selector: &str,
) -> Result<DisciplineTable, CrawlError> {
    let selector = Selector::parse(selector)
        .map_err(|e| CrawlError::Other(format!("invalid selector '{}': {}", selector, e)))?;

    let html = fetcher.fetch(listing_url).await?;
    let document = Html::parse_document(&html);

    let mut table = DisciplineTable::default();
    for anchor in document.select(&selector) {
        let raw: String = anchor.text().collect();
        let label = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if label.is_empty() {
            continue;
        }

        let tokens = keyword_tokens(&label);
        debug!(label = %label, ?tokens, "discipline entry");
        table.insert(label, tokens);
    }

    info!(
        url = listing_url,
        entries = table.len(),
        "scraped discipline listing"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use mockito::Server;

    #[test]
    fn test_keyword_tokens_normalization() {
        assert_eq!(
            keyword_tokens("Design & Technology"),
            vec!["design", "and", "technology"]
        );
        assert_eq!(
            keyword_tokens("Media/Communication"),
            vec!["media", "communication"]
        );
        assert_eq!(keyword_tokens("Business  Business"), vec!["business"]);
    }

    #[test]
    fn test_duplicate_label_last_write_wins() {
        let mut table = DisciplineTable::default();
        table.insert("Science".to_string(), vec!["science".to_string()]);
        table.insert("Arts".to_string(), vec!["arts".to_string()]);
        table.insert("Science".to_string(), vec!["stem".to_string()]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("Science").unwrap(), ["stem"]);
        // Overwriting keeps the original position.
        assert_eq!(table.labels().collect::<Vec<_>>(), vec!["Science", "Arts"]);
    }

    #[test]
    fn test_classify_first_match_in_table_order() {
        let mut table = DisciplineTable::default();
        table.insert("Engineering".to_string(), keyword_tokens("Engineering"));
        table.insert(
            "Computing & IT".to_string(),
            keyword_tokens("Computing & IT"),
        );

        // Both entries match; table order decides.
        assert_eq!(
            table.classify("I like computing and engineering"),
            Some("Engineering")
        );
        assert_eq!(table.classify("mostly Computing"), Some("Computing & IT"));
        assert_eq!(table.classify("history of art"), None);
    }

    #[tokio::test]
    async fn test_scrape_disciplines_from_listing() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/disciplines")
            .with_body(
                r#"<ul>
                    <li><a href="/d/eng"> Engineering </a></li>
                    <li><a href="/d/dt">Design &amp; Technology</a></li>
                    <li><a href="/d/eng2">Engineering</a></li>
                </ul>"#,
            )
            .create_async()
            .await;

        let fetcher = Fetcher::new(Duration::from_secs(5), "campus-scout-test/0.1").unwrap();
        let table = scrape_disciplines(&fetcher, &format!("{}/disciplines", server.url()), "a")
            .await
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("Engineering").unwrap(), ["engineering"]);
        assert_eq!(
            table.get("Design & Technology").unwrap(),
            ["design", "and", "technology"]
        );
    }

    #[tokio::test]
    async fn test_save_and_load_keep_table_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("disciplines.json");

        let mut table = DisciplineTable::default();
        table.insert("Zoology".to_string(), keyword_tokens("Zoology"));
        table.insert("Arts".to_string(), keyword_tokens("Arts"));
        table.save(&path).await.unwrap();

        let loaded = DisciplineTable::load(&path).await.unwrap();
        assert_eq!(loaded, table);
        assert_eq!(loaded.labels().collect::<Vec<_>>(), vec!["Zoology", "Arts"]);
    }
}
