//! System and diagnostic handlers: landing page, health, content checks

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use tracing::error;

use super::AppState;
use crate::http::types::{
    CheckContentResponse, DebugIndexResponse, ErrorResponse, HealthResponse, IndexStatus,
};
use crate::index::IndexError;
use crate::sources;

/// Sample size used by the diagnostic endpoints
const SAMPLE_LIMIT: usize = 3;

/// `GET /`: minimal landing page with usage notes
pub async fn home() -> impl IntoResponse {
    Html(
        r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Catdex</title></head>
<body>
  <h1>Catdex</h1>
  <p>Scrape-and-search service for cat content.</p>
  <ol>
    <li>Rebuild an index: <code>POST /index_data</code>, <code>POST /index_reddit</code>, <code>POST /index_cfa</code></li>
    <li>Search one index: <code>GET /search?q=sleepy+cat</code>, <code>GET /search_reddit?q=...</code>, <code>GET /search_cfa?q=...</code></li>
    <li>Search everything: <code>GET /api/search_all?q=...</code></li>
  </ol>
</body>
</html>
"#,
    )
}

/// `GET /health`: liveness probe
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /check_content`: per-index document counts and sample titles.
/// Indices that have not been built yet report a null count rather than
/// failing the whole diagnostic.
pub async fn check_content(State(state): State<AppState>) -> impl IntoResponse {
    let mut rows = Vec::new();
    for source in sources::builtin() {
        let (documents, sample_titles) = match state.manager.doc_count(source.index_name) {
            Ok(count) => {
                let titles = state
                    .manager
                    .sample(source.index_name, SAMPLE_LIMIT)
                    .map(|docs| docs.into_iter().map(|d| d.title).collect())
                    .unwrap_or_default();
                (Some(count), titles)
            }
            Err(IndexError::NotFound(_)) => (None, Vec::new()),
            Err(e) => {
                error!("Content check failed for '{}': {}", source.index_name, e);
                (None, Vec::new())
            }
        };

        rows.push(IndexStatus {
            source: source.key.to_string(),
            label: source.label.to_string(),
            index: source.index_name.to_string(),
            documents,
            sample_titles,
        });
    }

    Json(CheckContentResponse { indices: rows })
}

/// `GET /debug_cfa`: document count and sample documents for the CFA
/// breed index.
pub async fn debug_cfa(State(state): State<AppState>) -> axum::response::Response {
    let Some(source) = sources::by_key("cfa") else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal_error("CFA source is not configured")),
        )
            .into_response();
    };

    let documents = match state.manager.doc_count(source.index_name) {
        Ok(count) => count,
        Err(IndexError::NotFound(name)) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(
                    "INDEX_NOT_FOUND",
                    format!("Index '{name}' does not exist. Run POST /index_cfa first."),
                )),
            )
                .into_response();
        }
        Err(e) => {
            error!("CFA debug failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("INDEX_ERROR", e.to_string())),
            )
                .into_response();
        }
    };

    let sample = state
        .manager
        .sample(source.index_name, SAMPLE_LIMIT)
        .unwrap_or_default();

    (
        StatusCode::OK,
        Json(DebugIndexResponse {
            index: source.index_name.to_string(),
            documents,
            sample,
        }),
    )
        .into_response()
}
