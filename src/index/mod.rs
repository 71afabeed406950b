//! Named on-disk search indices
//!
//! Each source owns one index under the data directory. Indices are
//! schema-bound collections of documents with a full-replace lifecycle:
//! created empty, populated by one bulk load, and deleted + recreated on
//! the next ingestion run.

mod manager;
mod schema;

pub use manager::{IndexError, IndexManager};
pub use schema::{FieldKind, FieldMapping};
