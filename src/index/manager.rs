//! Index lifecycle: delete, recreate, bulk load, inspect
//!
//! The rebuild model is a blunt full replace: an existing index is
//! deleted unconditionally before the new batch is loaded. Concurrent
//! rebuilds of the same index name can race; this is a documented
//! limitation, not guarded against.

use std::fs;
use std::path::{Path, PathBuf};

use tantivy::collector::TopDocs;
use tantivy::query::AllQuery;
use tantivy::schema::{Schema, Value};
use tantivy::{Index, ReloadPolicy, TantivyDocument};
use thiserror::Error;
use tracing::{debug, info};

use super::schema::{FieldKind, FieldMapping};
use crate::types::{DocPreview, Document, IngestReport};

/// Writer heap per bulk load
const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Errors from index operations
#[derive(Debug, Error)]
pub enum IndexError {
    /// The named index has never been built (or its directory was removed)
    #[error("Index '{0}' does not exist")]
    NotFound(String),
    #[error("Index engine error: {0}")]
    Engine(#[from] tantivy::TantivyError),
    #[error("Index I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Manages named indices under one data directory.
///
/// Constructed once at startup and shared read-only; each operation opens
/// the index it needs rather than holding long-lived handles.
#[derive(Debug, Clone)]
pub struct IndexManager {
    data_dir: PathBuf,
}

impl IndexManager {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn index_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    /// Whether a named index exists on disk.
    pub fn exists(&self, name: &str) -> bool {
        self.index_path(name).join("meta.json").exists()
    }

    /// Open an existing index, failing with `NotFound` when it was never
    /// built. Queries never degrade a missing index to empty results.
    pub fn open(&self, name: &str) -> Result<Index, IndexError> {
        let path = self.index_path(name);
        if !self.exists(name) {
            return Err(IndexError::NotFound(name.to_string()));
        }
        Ok(Index::open_in_dir(&path)?)
    }

    /// Delete (if present) and recreate the named index, then bulk-load
    /// `docs` in one writer pass.
    ///
    /// Data loss on the old index is intentional: this is a full-replace
    /// model, not an upsert. The load is non-atomic; documents that fail
    /// are counted in the report while the rest stay visible. The commit
    /// and reader reload before returning guarantee that a query issued
    /// immediately after sees the new batch.
    pub fn rebuild(
        &self,
        name: &str,
        mapping: &FieldMapping,
        docs: &[Document],
    ) -> Result<IngestReport, IndexError> {
        let path = self.index_path(name);
        if path.exists() {
            fs::remove_dir_all(&path)?;
            info!("Deleted existing index '{}' for fresh start", name);
        }
        fs::create_dir_all(&path)?;

        let schema = mapping.build_schema();
        let index = Index::create_in_dir(&path, schema.clone())?;
        let mut writer = index.writer(WRITER_HEAP_BYTES)?;

        let mut success_count = 0usize;
        let mut error_count = 0usize;
        let mut sample_error: Option<String> = None;

        for doc in docs {
            let outcome = Self::to_engine_doc(&schema, mapping, doc)
                .and_then(|tdoc| writer.add_document(tdoc).map_err(|e| e.to_string()));
            match outcome {
                Ok(_) => success_count += 1,
                Err(e) => {
                    error_count += 1;
                    if sample_error.is_none() {
                        sample_error = Some(e);
                    }
                }
            }
        }

        writer.commit()?;

        // Wait for visibility: force a reader reload so the batch is
        // queryable the moment this returns.
        let reader: tantivy::IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        reader.reload()?;

        info!(
            "Rebuilt index '{}': {} indexed, {} failed",
            name, success_count, error_count
        );

        Ok(IngestReport {
            index: name.to_string(),
            success_count,
            error_count,
            sample_error,
        })
    }

    /// Number of documents in the named index.
    pub fn doc_count(&self, name: &str) -> Result<u64, IndexError> {
        let index = self.open(name)?;
        let reader = index.reader()?;
        Ok(reader.searcher().num_docs())
    }

    /// Up to `limit` stored documents from the named index, for the
    /// diagnostic endpoints.
    pub fn sample(&self, name: &str, limit: usize) -> Result<Vec<DocPreview>, IndexError> {
        let index = self.open(name)?;
        let reader = index.reader()?;
        let searcher = reader.searcher();
        let schema = index.schema();

        let title = schema.get_field("title")?;
        let url = schema.get_field("url")?;
        let snippet = schema.get_field("snippet")?;

        let top = searcher.search(&AllQuery, &TopDocs::with_limit(limit.max(1)))?;
        let mut previews = Vec::with_capacity(top.len());
        for (_score, address) in top {
            let doc: TantivyDocument = searcher.doc(address)?;
            let text_of = |field| {
                doc.get_first(field)
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string()
            };
            previews.push(DocPreview {
                title: text_of(title),
                url: text_of(url),
                snippet: text_of(snippet),
            });
        }

        debug!("Sampled {} documents from index '{}'", previews.len(), name);
        Ok(previews)
    }

    /// Map a normalized document onto the engine schema.
    ///
    /// A field declared in the mapping but unknown to the document shape
    /// is a per-document mapping mismatch, reported rather than raised.
    fn to_engine_doc(
        schema: &Schema,
        mapping: &FieldMapping,
        doc: &Document,
    ) -> Result<TantivyDocument, String> {
        let mut engine_doc = TantivyDocument::new();

        for (name, kind) in mapping.fields() {
            let field = schema
                .get_field(name)
                .map_err(|_| format!("mapping field '{name}' missing from schema"))?;

            match (name.as_str(), kind) {
                ("title", _) => engine_doc.add_text(field, &doc.title),
                ("body_text", _) => engine_doc.add_text(field, &doc.body_text),
                ("url", _) => engine_doc.add_text(field, &doc.url),
                ("snippet", _) => engine_doc.add_text(field, &doc.snippet),
                ("scraped_at", FieldKind::Date) => engine_doc.add_date(
                    field,
                    tantivy::DateTime::from_timestamp_secs(doc.scraped_at.timestamp()),
                ),
                _ => return Err(format!("document has no value for mapped field '{name}'")),
            }
        }

        Ok(engine_doc)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn rebuild_reports_all_documents_indexed() {
        let dir = TempDir::new().unwrap();
        let manager = IndexManager::new(dir.path());

        let docs = vec![
            doc("Yosemite", "https://example.org/yosemite", "Granite cliffs and waterfalls."),
            doc("Yellowstone", "https://example.org/yellowstone", "Geothermal features and wildlife."),
        ];

        let report = manager
            .rebuild("parks", &FieldMapping::documents(), &docs)
            .unwrap();

        assert_eq!(report.success_count, 2);
        assert_eq!(report.error_count, 0);
        assert!(report.sample_error.is_none());
        assert_eq!(manager.doc_count("parks").unwrap(), 2);
    }

    #[test]
    fn rebuild_is_a_full_replace_not_an_accumulation() {
        let dir = TempDir::new().unwrap();
        let manager = IndexManager::new(dir.path());
        let mapping = FieldMapping::documents();

        let docs = vec![
            doc("One", "https://example.org/1", "first body"),
            doc("Two", "https://example.org/2", "second body"),
            doc("Three", "https://example.org/3", "third body"),
        ];

        manager.rebuild("cats", &mapping, &docs).unwrap();
        assert_eq!(manager.doc_count("cats").unwrap(), 3);

        // Running ingestion again must not accumulate
        manager.rebuild("cats", &mapping, &docs).unwrap();
        assert_eq!(manager.doc_count("cats").unwrap(), 3);
    }

    #[test]
    fn empty_batch_builds_an_empty_queryable_index() {
        let dir = TempDir::new().unwrap();
        let manager = IndexManager::new(dir.path());

        let report = manager
            .rebuild("empty", &FieldMapping::documents(), &[])
            .unwrap();
        assert_eq!(report.success_count, 0);
        assert_eq!(manager.doc_count("empty").unwrap(), 0);
    }

    #[test]
    fn missing_index_is_not_found() {
        let dir = TempDir::new().unwrap();
        let manager = IndexManager::new(dir.path());
        assert!(matches!(
            manager.doc_count("never_built"),
            Err(IndexError::NotFound(_))
        ));
    }

    #[test]
    fn mapping_mismatch_is_reported_not_raised() {
        let dir = TempDir::new().unwrap();
        let manager = IndexManager::new(dir.path());

        let mapping = FieldMapping::new(vec![
            ("title".to_string(), FieldKind::Text),
            ("page_rank".to_string(), FieldKind::Text),
        ]);
        let docs = vec![doc("Cat", "https://example.org/cat", "body")];

        let report = manager.rebuild("mismatch", &mapping, &docs).unwrap();
        assert_eq!(report.success_count, 0);
        assert_eq!(report.error_count, 1);
        assert!(report.sample_error.unwrap().contains("page_rank"));
    }

    #[test]
    fn sample_returns_stored_fields() {
        let dir = TempDir::new().unwrap();
        let manager = IndexManager::new(dir.path());

        let docs = vec![doc("Siamese", "https://example.org/siamese", "A vocal short-haired breed.")];
        manager.rebuild("breeds", &FieldMapping::documents(), &docs).unwrap();

        let previews = manager.sample("breeds", 5).unwrap();
        assert_eq!(previews.len(), 1);
        assert_eq!(previews[0].title, "Siamese");
        assert_eq!(previews[0].url, "https://example.org/siamese");
    }
}
