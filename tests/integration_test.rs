//! Integration tests for catdex
//!
//! Exercises the extract → normalize → index → query path end to end
//! against on-disk indices, without touching the network.

use catdex::index::{FieldMapping, IndexError, IndexManager};
use catdex::ingest::normalize;
use catdex::scraping::Extractor;
use catdex::search::{QueryService, SearchError};
use catdex::sources;
use catdex::types::Document;
use chrono::Utc;
use tempfile::TempDir;

/// A small article page with navigation noise, citation markers, and a
/// caption that must not survive extraction.
const ARTICLE_HTML: &str = r#"
<html>
<head><title>Cat - Wikipedia</title></head>
<body>
    <nav>Home | Articles | About</nav>
    <article>
        <p>The cat is a domesticated species of small carnivorous mammal, and is
        the only domesticated species in the family Felidae.[1] Advances in
        archaeology and genetics have shown that cats were domesticated in the
        Near East around 7500 BC.[2]</p>
        <p>A house cat is valued by humans for companionship and its ability to
        kill vermin. About sixty cat breeds are recognized by various cat
        registries around the world.[13]</p>
        <p>Photo: a cat.</p>
    </article>
    <footer>Footer text</footer>
</body>
</html>
"#;

fn extract_article(data_dir: &TempDir) -> (IndexManager, QueryService) {
    let extractor = Extractor::new(50);
    let page = extractor
        .extract(ARTICLE_HTML, &["article", "main"])
        .expect("article page should yield content");

    let doc = normalize(
        page.title.as_deref(),
        "Articles",
        "https://en.wikipedia.org/wiki/Cat",
        page.text,
        200,
        Utc::now(),
    );

    let manager = IndexManager::new(data_dir.path());
    let report = manager
        .rebuild("cat_articles", &FieldMapping::documents(), &[doc])
        .unwrap();
    assert_eq!(report.success_count, 1);
    assert_eq!(report.error_count, 0);

    let query = QueryService::new(manager.clone(), 10);
    (manager, query)
}

#[test]
fn scraped_page_is_searchable_end_to_end() {
    let dir = TempDir::new().unwrap();
    let (_manager, query) = extract_article(&dir);

    let found = query.search("cat_articles", "domesticated carnivorous mammal", None).unwrap();
    assert_eq!(found.total_hits, 1);

    let hit = &found.results[0];
    assert_eq!(hit.title, "Cat");
    assert_eq!(hit.url, "https://en.wikipedia.org/wiki/Cat");
    assert!(hit.snippet.ends_with("..."));
    assert!(!hit.snippet.contains('<'), "snippet must be markup-free");
    assert!(!hit.snippet.contains("[1]"), "snippet must be citation-free");
}

#[test]
fn extraction_drops_short_fragments_and_citations() {
    let extractor = Extractor::new(50);
    let page = extractor.extract(ARTICLE_HTML, &["article"]).unwrap();

    // The photo caption is below the length threshold
    assert!(!page.text.contains("Photo: a cat."));
    assert_eq!(page.fragment_count, 2);

    // Citation markers are gone
    for marker in ["[1]", "[2]", "[13]"] {
        assert!(!page.text.contains(marker));
    }
}

#[test]
fn reingesting_replaces_rather_than_accumulates() {
    let dir = TempDir::new().unwrap();
    let (manager, _query) = extract_article(&dir);
    assert_eq!(manager.doc_count("cat_articles").unwrap(), 1);

    // Second run of the same ingestion
    let (_manager, query) = extract_article(&dir);
    let found = query.search("cat_articles", "domesticated", None).unwrap();
    assert_eq!(found.total_hits, 1, "full replace, not accumulation");
}

#[test]
fn query_against_missing_index_fails_loudly() {
    let dir = TempDir::new().unwrap();
    let query = QueryService::new(IndexManager::new(dir.path()), 10);

    let err = query.search("cat_reddit", "memes", None).unwrap_err();
    assert!(matches!(
        err,
        SearchError::Index(IndexError::NotFound(_))
    ));
}

#[test]
fn fan_out_reports_only_built_indices_with_labels() {
    let dir = TempDir::new().unwrap();
    let (_manager, query) = extract_article(&dir);

    let groups = query
        .search_all(&sources::builtin(), "domesticated", None)
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].label, "Articles");
}

#[test]
fn bulk_load_of_listing_documents_round_trips() {
    let dir = TempDir::new().unwrap();
    let manager = IndexManager::new(dir.path());

    let scraped_at = Utc::now();
    let docs: Vec<Document> = ["Cat loaf of the day", "My cat judges me", "Friday night zoomies"]
        .iter()
        .enumerate()
        .map(|(i, title)| {
            normalize(
                Some(title),
                "Reddit",
                &format!("https://www.reddit.com/r/Catmemes/comments/{i}/"),
                title.to_string(),
                200,
                scraped_at,
            )
        })
        .collect();

    let report = manager
        .rebuild("cat_reddit", &FieldMapping::documents(), &docs)
        .unwrap();
    assert_eq!(report.success_count, 3);

    let query = QueryService::new(manager, 10);
    let found = query.search("cat_reddit", "zoomies", None).unwrap();
    assert_eq!(found.total_hits, 1);
    assert_eq!(found.results[0].title, "Friday night zoomies");
}
