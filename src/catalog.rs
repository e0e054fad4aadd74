//! Course catalog scraper
//!
//! One-shot, two-hop scrape of a degree listing: program links on the
//! listing page, plan links on each program page, and a course table on
//! each plan page. No recursion and no depth bound; a failing page is
//! logged and the remaining programs are still visited.

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::crawler::{CrawlError, Fetcher};
use crate::error::Error;

/// A single row of a course plan table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseEntry {
    /// Course code, e.g. "COSC1101"
    pub course_code: String,

    /// Course title
    pub title: String,

    /// Credit points as printed on the plan page
    pub credit_points: String,

    /// Campus the course runs at
    pub campus: String,
}

/// A program and the courses its plan lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Program title from the program page heading
    pub program_title: String,

    /// Program page URL
    pub url: String,

    /// Courses parsed from the plan table
    pub course_details: Vec<CourseEntry>,
}

/// Link-selection patterns for the catalog scrape
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Substring a program link's href must contain
    pub program_pattern: String,

    /// Substrings a plan link's href must all contain
    pub plan_patterns: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            program_pattern: "bachelor-degrees".to_string(),
            plan_patterns: vec!["bp".to_string(), "auscy".to_string()],
        }
    }
}

fn anchor_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("a[href]").expect("valid anchor selector"))
}

fn heading_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("h1").expect("valid heading selector"))
}

fn row_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("table tr").expect("valid row selector"))
}

fn cell_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("td").expect("valid cell selector"))
}

/// Scrape a degree listing into structured programs.
///
/// Program links are followed at most once each and only on the listing's
/// own site; one [`Program`] is produced per plan link whose table yielded
/// any courses.
pub async fn scrape_catalog(
    fetcher: &Fetcher,
    listing_url: &str,
    config: &CatalogConfig,
) -> Result<Vec<Program>, CrawlError> {
    let listing_url = Url::parse(listing_url)?;
    let listing_html = fetcher.fetch(listing_url.as_str()).await?;

    let mut visited: HashSet<String> = HashSet::new();
    let mut programs = Vec::new();

    for (label, program_url) in program_links(&listing_html, &listing_url, &config.program_pattern)
    {
        if !same_site(&program_url, &listing_url) || !visited.insert(program_url.to_string()) {
            continue;
        }
        debug!(url = %program_url, "visiting program page");

        let program_html = match fetcher.fetch(program_url.as_str()).await {
            Ok(html) => html,
            Err(err) => {
                warn!(url = %program_url, error = %err, "program page failed, skipping");
                continue;
            }
        };

        let document = Html::parse_document(&program_html);
        let program_title = first_heading(&document).unwrap_or(label);

        for plan_url in plan_links(&document, &program_url, &config.plan_patterns) {
            let course_details = match fetcher.fetch(plan_url.as_str()).await {
                Ok(html) => parse_course_table(&html),
                Err(err) => {
                    warn!(url = %plan_url, error = %err, "plan page failed, skipping");
                    continue;
                }
            };
            if course_details.is_empty() {
                continue;
            }

            programs.push(Program {
                program_title: program_title.clone(),
                url: program_url.to_string(),
                course_details,
            });
        }
    }

    info!(programs = programs.len(), "catalog scrape finished");
    Ok(programs)
}

/// Persist the catalog as pretty-printed JSON
pub async fn save_catalog(programs: &[Program], path: &Path) -> Result<(), Error> {
    let json = serde_json::to_string_pretty(programs)?;
    tokio::fs::write(path, json).await?;

    info!(path = %path.display(), programs = programs.len(), "saved catalog");
    Ok(())
}

fn collapse_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn program_links(html: &str, base_url: &Url, pattern: &str) -> Vec<(String, Url)> {
    let document = Html::parse_document(html);

    let mut links = Vec::new();
    for anchor in document.select(anchor_selector()) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !href.contains(pattern) {
            continue;
        }
        let Ok(resolved) = base_url.join(href) else {
            continue;
        };
        links.push((collapse_text(anchor), resolved));
    }

    links
}

fn plan_links(document: &Html, base_url: &Url, patterns: &[String]) -> Vec<Url> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.select(anchor_selector()) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !patterns.iter().all(|pattern| href.contains(pattern)) {
            continue;
        }
        let Ok(resolved) = base_url.join(href) else {
            continue;
        };
        if seen.insert(resolved.to_string()) {
            links.push(resolved);
        }
    }

    links
}

fn first_heading(document: &Html) -> Option<String> {
    document
        .select(heading_selector())
        .next()
        .map(collapse_text)
        .filter(|title| !title.is_empty())
}

fn same_site(url: &Url, listing: &Url) -> bool {
    url.scheme() == listing.scheme() && url.host_str() == listing.host_str()
}

/// Parse the course rows of a plan page. The first table row is the header;
/// rows need at least four cells and a non-empty course code.
fn parse_course_table(html: &str) -> Vec<CourseEntry> {
    let document = Html::parse_document(html);

    let mut entries = Vec::new();
    for row in document.select(row_selector()).skip(1) {
        let cells: Vec<String> = row.select(cell_selector()).map(collapse_text).collect();
        if cells.len() < 4 {
            continue;
        }

        let course_code = cells[2].clone();
        if course_code.is_empty() {
            continue;
        }

        entries.push(CourseEntry {
            course_code,
            title: cells[0].clone(),
            credit_points: cells[1].clone(),
            campus: cells[3].clone(),
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use mockito::Server;

    const PLAN_PAGE: &str = r#"
        <h1>Bachelor of Cyber Security</h1>
        <table>
            <tr><th>Title</th><th>Credits</th><th>Code</th><th>Campus</th></tr>
            <tr><td> Intro to Security </td><td>12</td><td>COSC1101</td><td>City</td></tr>
            <tr><td>Networks</td><td>12</td><td>COSC1102</td><td>City</td></tr>
            <tr><td>Elective placeholder</td><td>12</td><td></td><td>City</td></tr>
            <tr><td>malformed row</td></tr>
        </table>"#;

    #[test]
    fn test_parse_course_table() {
        let entries = parse_course_table(PLAN_PAGE);

        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0],
            CourseEntry {
                course_code: "COSC1101".to_string(),
                title: "Intro to Security".to_string(),
                credit_points: "12".to_string(),
                campus: "City".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_course_table_without_table() {
        assert!(parse_course_table("<p>no plan here</p>").is_empty());
    }

    #[tokio::test]
    async fn test_scrape_catalog_end_to_end() {
        let mut server = Server::new_async().await;

        let _listing = server
            .mock("GET", "/degrees")
            .with_body(
                r#"<a href="/study/bachelor-degrees/cyber">Cyber Security</a>
                   <a href="/study/bachelor-degrees/cyber">Cyber Security (again)</a>
                   <a href="http://elsewhere.invalid/study/bachelor-degrees/x">External</a>
                   <a href="/study/other/arts">Arts</a>"#,
            )
            .create_async()
            .await;
        let program = server
            .mock("GET", "/study/bachelor-degrees/cyber")
            .with_body(
                r#"<h1>Bachelor of Cyber Security</h1>
                   <a href="/plans/bp355auscy">Plan</a>
                   <a href="/plans/unrelated">Other</a>"#,
            )
            .expect(1)
            .create_async()
            .await;
        let _plan = server
            .mock("GET", "/plans/bp355auscy")
            .with_body(PLAN_PAGE)
            .create_async()
            .await;

        let fetcher = Fetcher::new(Duration::from_secs(5), "campus-scout-test/0.1").unwrap();
        let programs = scrape_catalog(
            &fetcher,
            &format!("{}/degrees", server.url()),
            &CatalogConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(programs.len(), 1);
        let entry = &programs[0];
        assert_eq!(entry.program_title, "Bachelor of Cyber Security");
        assert!(entry.url.ends_with("/study/bachelor-degrees/cyber"));
        assert_eq!(entry.course_details.len(), 2);
        program.assert_async().await;
    }
}
