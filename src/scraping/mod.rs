//! Web scraping subsystem
//!
//! Fetching, robots.txt checks, and content extraction for the ingestion
//! pipeline. The scraper is deliberately sequential and fail-fast: one
//! request at a time, no retries, and a failed fetch aborts the whole
//! ingestion run for that source.
//!
//! Key components:
//! - `Fetcher`: HTTP GET with identifying user agent, timeout, size bound
//! - `RobotsCache`: per-host robots.txt permission checks
//! - `Extractor`: HTML to clean, citation-free text fragments

pub mod extractor;
pub mod fetcher;
pub mod robots;

pub use extractor::{ExtractError, ExtractedPage, Extractor};
pub use fetcher::{FetchError, FetchResult, Fetcher};
pub use robots::RobotsCache;
