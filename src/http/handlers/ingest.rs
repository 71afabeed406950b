//! Ingestion handlers
//!
//! Each endpoint runs the same parameterized pipeline for its source and
//! fully replaces that source's index.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::{error, info};

use super::AppState;
use crate::http::types::{ErrorResponse, IngestResponse};
use crate::index::IndexError;
use crate::ingest::IngestError;
use crate::scraping::FetchError;
use crate::sources;

/// `POST /index_data`: ingest the article source
pub async fn index_data(State(state): State<AppState>) -> impl IntoResponse {
    run_ingest(&state, "articles").await
}

/// `POST /index_reddit`: ingest the Reddit listing source
pub async fn index_reddit(State(state): State<AppState>) -> impl IntoResponse {
    run_ingest(&state, "reddit").await
}

/// `POST /index_cfa`: ingest the CFA breed directory source
pub async fn index_cfa(State(state): State<AppState>) -> impl IntoResponse {
    run_ingest(&state, "cfa").await
}

async fn run_ingest(state: &AppState, source_key: &str) -> axum::response::Response {
    let Some(source) = sources::by_key(source_key) else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal_error(format!(
                "Unknown source '{source_key}'"
            ))),
        )
            .into_response();
    };

    info!("HTTP ingest request for source '{}'", source_key);
    match state.pipeline.run(&source).await {
        Ok(report) => (StatusCode::OK, Json(IngestResponse::from(report))).into_response(),
        Err(e) => {
            error!("Ingestion of '{}' failed: {}", source_key, e);
            let (status, body) = ingest_error(e);
            (status, Json(body)).into_response()
        }
    }
}

/// Map pipeline failures onto HTTP statuses. Fetch and extraction
/// problems are upstream failures (502); robots.txt refusals are our own
/// policy (403).
fn ingest_error(e: IngestError) -> (StatusCode, ErrorResponse) {
    match e {
        IngestError::Fetch(FetchError::Status { status, url }) => (
            StatusCode::BAD_GATEWAY,
            ErrorResponse::new(
                "HTTP_STATUS_ERROR",
                format!("Source responded with status {status} for {url}. If 403, the site may be blocking our user agent."),
            ),
        ),
        IngestError::Fetch(e) => (
            StatusCode::BAD_GATEWAY,
            ErrorResponse::new("NETWORK_ERROR", e.to_string()),
        ),
        IngestError::Extract(e) => (
            StatusCode::BAD_GATEWAY,
            ErrorResponse::new("NO_CONTENT", e.to_string()),
        ),
        IngestError::Listing(e) => (
            StatusCode::BAD_GATEWAY,
            ErrorResponse::new("PARSE_ERROR", format!("Listing response was not valid JSON: {e}")),
        ),
        IngestError::RobotsDisallowed(url) => (
            StatusCode::FORBIDDEN,
            ErrorResponse::new("ROBOTS_DISALLOWED", format!("robots.txt disallows fetching {url}")),
        ),
        IngestError::Index(IndexError::NotFound(name)) => (
            StatusCode::NOT_FOUND,
            ErrorResponse::new("INDEX_NOT_FOUND", format!("Index '{name}' does not exist")),
        ),
        IngestError::Index(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("INDEX_ERROR", e.to_string()),
        ),
    }
}
