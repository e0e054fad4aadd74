//! Text and link extraction from fetched HTML

use std::collections::HashSet;
use std::sync::OnceLock;

use scraper::{Html, Node, Selector};
use url::Url;

/// The visible text of a page plus the absolute links it references
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Markup-free page text, whitespace collapsed
    pub text: String,

    /// Absolute anchor targets in document order, deduplicated
    pub links: Vec<Url>,
}

fn anchor_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("a[href]").expect("valid anchor selector"))
}

/// Extract visible text and anchor targets from a page.
///
/// Relative references are resolved against `base_url`; unresolvable hrefs
/// are dropped. Link filtering is the caller's concern; every resolvable
/// target is returned. Malformed HTML is parsed as far as html5ever can
/// recover and never fails.
pub fn extract(html: &str, base_url: &Url) -> Extraction {
    let document = Html::parse_document(html);

    Extraction {
        text: visible_text(&document),
        links: anchor_targets(&document, base_url),
    }
}

/// Text content of the document with markup removed. Text under non-rendered
/// elements is skipped; whitespace inside a node collapses to single spaces
/// and nodes are joined with newlines.
fn visible_text(document: &Html) -> String {
    let mut lines: Vec<String> = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element())
            .is_some_and(|element| {
                matches!(element.name(), "script" | "style" | "noscript" | "template")
            });
        if hidden {
            continue;
        }

        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !collapsed.is_empty() {
            lines.push(collapsed);
        }
    }

    lines.join("\n")
}

fn anchor_targets(document: &Html, base_url: &Url) -> Vec<Url> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.select(anchor_selector()) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Ok(resolved) = base_url.join(href) else {
            continue;
        };
        if seen.insert(resolved.to_string()) {
            links.push(resolved);
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.example.edu/courses/index.html").unwrap()
    }

    #[test]
    fn test_text_is_collapsed_and_markup_free() {
        let html = "<html><head><title>Degrees</title><style>body { color: red; }</style></head>\
                    <body><h1>  Bachelor   Degrees </h1><p>Study\nwith us.</p>\
                    <script>var x = 1;</script></body></html>";
        let extraction = extract(html, &base());

        assert_eq!(extraction.text, "Degrees\nBachelor Degrees\nStudy with us.");
    }

    #[test]
    fn test_links_resolved_against_base() {
        let html =
            r##"<a href="/a">A</a><a href="b.html">B</a><a href="https://other.org/c">C</a>"##;
        let extraction = extract(html, &base());

        let links: Vec<String> = extraction.links.iter().map(|u| u.to_string()).collect();
        assert_eq!(
            links,
            vec![
                "https://www.example.edu/a",
                "https://www.example.edu/courses/b.html",
                "https://other.org/c",
            ]
        );
    }

    #[test]
    fn test_duplicate_links_returned_once() {
        let html = r#"<a href="/a">one</a><a href="/a">two</a>"#;
        let extraction = extract(html, &base());

        assert_eq!(extraction.links.len(), 1);
    }

    #[test]
    fn test_malformed_html_degrades() {
        let extraction = extract("<div><p>broken", &base());

        assert_eq!(extraction.text, "broken");
        assert!(extraction.links.is_empty());
    }
}
