//! Scrape source descriptions
//!
//! Every ingestion target is described by a [`Source`] value rather than
//! its own code path: one parameterized pipeline consumes these. Adding a
//! source means adding data here, not another fetch/extract/index copy.

use serde::Serialize;

/// How the pages of a source are located and traversed.
#[derive(Debug, Clone)]
pub enum SourceKind {
    /// One or more standalone article pages, each yielding one document.
    ArticlePages { urls: Vec<&'static str> },
    /// A JSON listing endpoint where every entry becomes one document
    /// (the Reddit `.json` shape: `data.children[].data`).
    JsonListing { url: &'static str },
    /// A directory page whose entry links are crawled one by one, each
    /// detail page yielding one document.
    Directory {
        url: &'static str,
        /// CSS selector matching the detail-page links on the listing
        link_selector: &'static str,
    },
}

/// A single scrape target: where to fetch, how to locate content, and
/// which index receives the documents.
#[derive(Debug, Clone)]
pub struct Source {
    /// Stable key used in CLI arguments and route wiring
    pub key: &'static str,
    /// Human-readable label, also the title fallback when a page has none
    pub label: &'static str,
    /// Name of the index this source rebuilds
    pub index_name: &'static str,
    /// Page traversal strategy
    pub kind: SourceKind,
    /// Candidate content-region selectors, tried in order; the whole
    /// document is used when none match
    pub content_selectors: &'static [&'static str],
}

/// Keys for the built-in sources, in the order they are searched by the
/// fan-out endpoint.
pub const SOURCE_KEYS: &[&str] = &["articles", "reddit", "cfa"];

/// The built-in source catalog.
pub fn builtin() -> Vec<Source> {
    vec![
        Source {
            key: "articles",
            label: "Articles",
            index_name: "cat_articles",
            kind: SourceKind::ArticlePages {
                urls: vec![
                    "https://www.britannica.com/animal/cat",
                    "https://en.wikipedia.org/w/index.php?title=Cat&action=render",
                ],
            },
            content_selectors: &["article", ".topic-content", "main", "[role='main']"],
        },
        Source {
            key: "reddit",
            label: "Reddit",
            index_name: "cat_reddit",
            kind: SourceKind::JsonListing {
                url: "https://www.reddit.com/r/Catmemes/.json?limit=100",
            },
            content_selectors: &[],
        },
        Source {
            key: "cfa",
            label: "CFA Breeds",
            index_name: "cat_breeds",
            kind: SourceKind::Directory {
                url: "https://cfa.org/breeds/",
                link_selector: "a[href*='/breeds/']",
            },
            content_selectors: &["article", ".entry-content", "main"],
        },
    ]
}

/// Look up a built-in source by key.
pub fn by_key(key: &str) -> Option<Source> {
    builtin().into_iter().find(|s| s.key == key)
}

/// Summary row for diagnostics and CLI listings.
#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    pub key: String,
    pub label: String,
    pub index_name: String,
}

impl From<&Source> for SourceSummary {
    fn from(source: &Source) -> Self {
        Self {
            key: source.key.to_string(),
            label: source.label.to_string(),
            index_name: source.index_name.to_string(),
        }
    }
}
