//! HTTP route definitions

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, AppState};

/// Create the router with every route wired to the shared state.
///
/// Each source keeps its ingest/search endpoint pair; all pairs share the
/// same parameterized pipeline and query service underneath.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        // Article source
        .route("/index_data", post(handlers::index_data))
        .route("/search", get(handlers::search_articles))
        // Reddit listing source
        .route("/index_reddit", post(handlers::index_reddit))
        .route("/search_reddit", get(handlers::search_reddit))
        // CFA breed directory source
        .route("/index_cfa", post(handlers::index_cfa))
        .route("/search_cfa", get(handlers::search_cfa))
        // Aggregation and diagnostics
        .route("/api/search_all", get(handlers::search_all))
        .route("/check_content", get(handlers::check_content))
        .route("/debug_cfa", get(handlers::debug_cfa))
        .with_state(state)
}
