//! HTTP API
//!
//! Axum server, routes, and handlers for the ingest/search endpoint
//! pairs plus the diagnostic endpoints.

pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;

pub use handlers::AppState;
pub use server::HttpServer;
