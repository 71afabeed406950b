//! Query service
//!
//! Builds field-weighted queries against one named index and maps raw
//! engine hits into the uniform result shape. Title matches are boosted
//! over body matches, the way the original ranking behaved.

use tantivy::collector::{Count, TopDocs};
use tantivy::query::QueryParser;
use tantivy::schema::Value;
use tantivy::TantivyDocument;
use thiserror::Error;
use tracing::{debug, warn};

use crate::index::{IndexError, IndexManager};
use crate::sources::Source;
use crate::types::{LabeledResults, SearchHit, SearchResults};

/// Boost applied to title matches relative to body matches
const TITLE_BOOST: f32 = 2.0;

/// Errors from query execution
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error("Could not parse query: {0}")]
    BadQuery(String),
}

/// Executes free-text queries against named indices.
#[derive(Debug, Clone)]
pub struct QueryService {
    manager: IndexManager,
    default_limit: usize,
}

impl QueryService {
    pub fn new(manager: IndexManager, default_limit: usize) -> Self {
        Self {
            manager,
            default_limit,
        }
    }

    /// Query one index with the default title weighting. A missing index
    /// is a direct failure, never an empty result set; an existing empty
    /// index returns zero hits.
    pub fn search(
        &self,
        index_name: &str,
        query_text: &str,
        limit: Option<usize>,
    ) -> Result<SearchResults, SearchError> {
        self.search_weighted(index_name, query_text, limit, TITLE_BOOST)
    }

    /// Query one index with an explicit title boost relative to body
    /// matches.
    pub fn search_weighted(
        &self,
        index_name: &str,
        query_text: &str,
        limit: Option<usize>,
        title_boost: f32,
    ) -> Result<SearchResults, SearchError> {
        let limit = limit.unwrap_or(self.default_limit).max(1);
        let index = self.manager.open(index_name)?;
        let reader = index.reader().map_err(IndexError::from)?;
        let searcher = reader.searcher();
        let schema = index.schema();

        let title = schema.get_field("title").map_err(IndexError::from)?;
        let body_text = schema.get_field("body_text").map_err(IndexError::from)?;
        let url = schema.get_field("url").map_err(IndexError::from)?;
        let snippet = schema.get_field("snippet").map_err(IndexError::from)?;

        let mut parser = QueryParser::for_index(&index, vec![title, body_text]);
        parser.set_field_boost(title, title_boost);
        let query = parser
            .parse_query(query_text)
            .map_err(|e| SearchError::BadQuery(e.to_string()))?;

        let (top, total_hits) = searcher
            .search(&query, &(TopDocs::with_limit(limit), Count))
            .map_err(IndexError::from)?;

        let mut results = Vec::with_capacity(top.len());
        for (score, address) in top {
            let doc: TantivyDocument = searcher.doc(address).map_err(IndexError::from)?;
            let text_of = |field| {
                doc.get_first(field)
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string()
            };
            results.push(SearchHit {
                score: round2(score),
                title: text_of(title),
                url: text_of(url),
                snippet: text_of(snippet),
            });
        }

        debug!(
            "Query '{}' against '{}': {} of {} hits returned",
            query_text,
            index_name,
            results.len(),
            total_hits
        );

        Ok(SearchResults {
            query: query_text.to_string(),
            total_hits,
            results,
        })
    }

    /// Fan one query out to every source's index and concatenate labeled
    /// result groups. Sources whose index has not been built yet are
    /// skipped with a warning; any other failure propagates.
    pub fn search_all(
        &self,
        sources: &[Source],
        query_text: &str,
        limit: Option<usize>,
    ) -> Result<Vec<LabeledResults>, SearchError> {
        let mut groups = Vec::with_capacity(sources.len());
        for source in sources {
            match self.search(source.index_name, query_text, limit) {
                Ok(found) => groups.push(LabeledResults {
                    label: source.label.to_string(),
                    total_hits: found.total_hits,
                    results: found.results,
                }),
                Err(SearchError::Index(IndexError::NotFound(name))) => {
                    warn!("Skipping unbuilt index '{}' in fan-out query", name);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(groups)
    }
}

/// Round an engine score to two decimal places for display.
fn round2(score: f32) -> f32 {
    (score * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::FieldMapping;
    use crate::types::Document;
    use chrono::Utc;
    use tempfile::TempDir;

    fn doc(title: &str, url: &str, body: &str) -> Document {
        Document {
            title: title.to_string(),
            url: url.to_string(),
            body_text: body.to_string(),
            snippet: body.chars().take(200).collect(),
            scraped_at: Utc::now(),
        }
    }

    fn service_with_index(dir: &TempDir, name: &str, docs: &[Document]) -> QueryService {
        let manager = IndexManager::new(dir.path());
        manager.rebuild(name, &FieldMapping::documents(), docs).unwrap();
        QueryService::new(manager, 10)
    }

    #[test]
    fn exact_title_round_trip() {
        let dir = TempDir::new().unwrap();
        let service = service_with_index(
            &dir,
            "articles",
            &[
                doc("Maine Coon", "https://example.org/maine-coon", "A large longhaired breed."),
                doc("Sphynx", "https://example.org/sphynx", "A hairless breed."),
            ],
        );

        let found = service.search("articles", "Maine Coon", None).unwrap();
        assert!(found.total_hits >= 1);
        assert_eq!(found.results[0].title, "Maine Coon");
        assert_eq!(found.results[0].url, "https://example.org/maine-coon");
    }

    #[test]
    fn empty_index_returns_zero_hits_not_an_error() {
        let dir = TempDir::new().unwrap();
        let service = service_with_index(&dir, "empty", &[]);

        let found = service.search("empty", "anything", None).unwrap();
        assert_eq!(found.total_hits, 0);
        assert!(found.results.is_empty());
    }

    #[test]
    fn missing_index_is_a_direct_failure() {
        let dir = TempDir::new().unwrap();
        let service = QueryService::new(IndexManager::new(dir.path()), 10);

        let err = service.search("never_built", "cats", None).unwrap_err();
        assert!(matches!(
            err,
            SearchError::Index(IndexError::NotFound(_))
        ));
    }

    #[test]
    fn result_count_is_capped_by_limit() {
        let dir = TempDir::new().unwrap();
        let docs: Vec<Document> = (0..15)
            .map(|i| {
                doc(
                    &format!("Cat fact {i}"),
                    &format!("https://example.org/{i}"),
                    "cats cats cats",
                )
            })
            .collect();
        let service = service_with_index(&dir, "facts", &docs);

        let found = service.search("facts", "cats", Some(5)).unwrap();
        assert_eq!(found.results.len(), 5);
        assert_eq!(found.total_hits, 15);
    }

    #[test]
    fn scores_are_rounded_to_two_decimals() {
        let dir = TempDir::new().unwrap();
        let service = service_with_index(
            &dir,
            "round",
            &[doc("Cat", "https://example.org/cat", "a cat sat on a mat")],
        );

        let found = service.search("round", "cat", None).unwrap();
        for hit in &found.results {
            let scaled = hit.score * 100.0;
            assert!((scaled - scaled.round()).abs() < 1e-4);
        }
    }

    #[test]
    fn title_weight_ranks_title_matches_first() {
        let dir = TempDir::new().unwrap();
        let service = service_with_index(
            &dir,
            "weighted",
            &[
                doc("Ragdoll", "https://example.org/ragdoll", "a relaxed companion breed"),
                doc("Breed notes", "https://example.org/notes", "ragdoll ragdoll mentions here"),
            ],
        );

        let found = service
            .search_weighted("weighted", "ragdoll", None, 10.0)
            .unwrap();
        assert_eq!(found.total_hits, 2);
        assert_eq!(found.results[0].title, "Ragdoll");
    }

    #[test]
    fn fan_out_skips_unbuilt_indices() {
        let dir = TempDir::new().unwrap();
        let manager = IndexManager::new(dir.path());
        manager
            .rebuild(
                "cat_articles",
                &FieldMapping::documents(),
                &[doc("Cat", "https://example.org/cat", "cats everywhere")],
            )
            .unwrap();
        let service = QueryService::new(manager, 10);

        let sources = crate::sources::builtin();
        let groups = service.search_all(&sources, "cats", None).unwrap();

        // Only the articles index exists, so only its group appears
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "Articles");
        assert_eq!(groups[0].total_hits, 1);
    }
}
