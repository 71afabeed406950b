//! Core data types shared across the pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized document ready for indexing.
///
/// Created by the normalizer, immutable once indexed, and superseded
/// wholesale on the next rebuild of its index. The `url` is the canonical
/// identifier for display purposes but is not guaranteed unique across
/// sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Page or post title
    pub title: String,
    /// Source URL
    pub url: String,
    /// Full extracted text, markup-free
    pub body_text: String,
    /// Short excerpt derived from `body_text` for result display
    pub snippet: String,
    /// When the page was scraped
    pub scraped_at: DateTime<Utc>,
}

/// Outcome of one bulk load into an index.
///
/// Bulk ingestion is non-atomic: documents that fail to index are counted
/// here rather than rolling back the ones that succeeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    /// Index the documents were loaded into
    pub index: String,
    /// Documents successfully indexed
    pub success_count: usize,
    /// Documents rejected during the bulk load
    pub error_count: usize,
    /// First rejection message, if any
    pub sample_error: Option<String>,
}

/// A single search result mapped from a raw index hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Relevance score from the engine, rounded to two decimal places
    pub score: f32,
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Response shape for a single-index query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    /// The query text as received
    pub query: String,
    /// Total matching documents in the index (not just the returned page)
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

/// One labeled result group from a fan-out query across all indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledResults {
    /// Human-readable source label, e.g. "CFA Breeds"
    pub label: String,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

/// Stored fields of an indexed document, used by the diagnostic endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocPreview {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_serializes_round_trip() {
        let doc = Document {
            title: "Cat".to_string(),
            url: "https://example.org/cat".to_string(),
            body_text: "Cats are small carnivorous mammals.".to_string(),
            snippet: "Cats are small carnivorous mammals.".to_string(),
            scraped_at: Utc::now(),
        };

        let json = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(doc, back);
    }
}
