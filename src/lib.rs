//! Catdex: scrape-and-search service for cat content
//!
//! A small search service that ingests a handful of public cat pages
//! (encyclopedia articles, a Reddit listing, the CFA breed directory),
//! normalizes the extracted text into uniform documents, and serves
//! full-text queries over per-source Tantivy indices:
//! - Polite HTTP fetching with robots.txt checks
//! - CSS-selector content location with whole-document fallback
//! - Full-replace index rebuilds (delete + recreate + bulk load)
//! - Axum HTTP API mirroring the ingest/search endpoint pairs

pub mod config;
pub mod http;
pub mod index;
pub mod ingest;
pub mod scraping;
pub mod search;
pub mod sources;
pub mod types;

pub use config::Config;
pub use types::*;
