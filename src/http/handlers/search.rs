//! Search handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{debug, error};

use super::{AppState, MAX_QUERY_LENGTH};
use crate::http::types::{ErrorResponse, SearchAllResponse, SearchParams};
use crate::index::IndexError;
use crate::search::SearchError;
use crate::sources;

/// `GET /search?q=`: query the article index
pub async fn search_articles(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    run_search(&state, "articles", params)
}

/// `GET /search_reddit?q=`: query the Reddit index
pub async fn search_reddit(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    run_search(&state, "reddit", params)
}

/// `GET /search_cfa?q=`: query the CFA breed index
pub async fn search_cfa(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    run_search(&state, "cfa", params)
}

/// `GET /api/search_all?q=`: fan the query out to every index and
/// return labeled result groups.
pub async fn search_all(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> axum::response::Response {
    let query_text = match require_query(&params) {
        Ok(q) => q,
        Err(response) => return response,
    };

    let catalog = sources::builtin();
    match state.query.search_all(&catalog, &query_text, params.limit) {
        Ok(groups) => (
            StatusCode::OK,
            Json(SearchAllResponse {
                query: query_text,
                groups,
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Fan-out search failed: {}", e);
            let (status, body) = search_error(e);
            (status, Json(body)).into_response()
        }
    }
}

fn run_search(state: &AppState, source_key: &str, params: SearchParams) -> axum::response::Response {
    let query_text = match require_query(&params) {
        Ok(q) => q,
        Err(response) => return response,
    };

    let Some(source) = sources::by_key(source_key) else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::internal_error(format!(
                "Unknown source '{source_key}'"
            ))),
        )
            .into_response();
    };

    debug!("HTTP search request: index={}, q={}", source.index_name, query_text);
    match state.query.search(source.index_name, &query_text, params.limit) {
        Ok(results) => (StatusCode::OK, Json(results)).into_response(),
        Err(e) => {
            error!("Search against '{}' failed: {}", source.index_name, e);
            let (status, body) = search_error(e);
            (status, Json(body)).into_response()
        }
    }
}

/// Pull the query text out of the parameters, rejecting missing, empty,
/// or oversized queries.
fn require_query(params: &SearchParams) -> Result<String, axum::response::Response> {
    let q = params.q.as_deref().unwrap_or("").trim();
    if q.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(
                "Missing query parameter 'q'. Usage: ?q=your+query",
            )),
        )
            .into_response());
    }
    if q.len() > MAX_QUERY_LENGTH {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "QUERY_TOO_LARGE",
                format!(
                    "Query length {} exceeds maximum allowed length of {} bytes",
                    q.len(),
                    MAX_QUERY_LENGTH
                ),
            )),
        )
            .into_response());
    }
    Ok(q.to_string())
}

/// Map query failures onto HTTP statuses. A missing index is 404, never
/// silently empty results.
fn search_error(e: SearchError) -> (StatusCode, ErrorResponse) {
    match e {
        SearchError::Index(IndexError::NotFound(name)) => (
            StatusCode::NOT_FOUND,
            ErrorResponse::new(
                "INDEX_NOT_FOUND",
                format!("Index '{name}' does not exist. Run the matching ingest endpoint first."),
            ),
        ),
        SearchError::BadQuery(message) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("BAD_QUERY", message),
        ),
        SearchError::Index(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("INDEX_ERROR", e.to_string()),
        ),
    }
}
