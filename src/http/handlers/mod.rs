//! HTTP request handlers

mod ingest;
mod search;
mod system;

use std::sync::Arc;

use crate::config::Config;
use crate::index::IndexManager;
use crate::ingest::Pipeline;
use crate::search::QueryService;

/// Maximum allowed query length (10KB)
pub(crate) const MAX_QUERY_LENGTH: usize = 10_000;

/// Shared application state, built once at startup and handed to every
/// handler through axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub manager: IndexManager,
    pub query: QueryService,
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    /// Wire up the full state from configuration.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let manager = IndexManager::new(config.search.data_dir.clone());
        let query = QueryService::new(manager.clone(), config.search.result_limit);
        let pipeline = Arc::new(Pipeline::new(&config, manager.clone())?);
        Ok(Self {
            config: Arc::new(config),
            manager,
            query,
            pipeline,
        })
    }
}

pub use ingest::{index_cfa, index_data, index_reddit};
pub use search::{search_all, search_articles, search_cfa, search_reddit};
pub use system::{check_content, debug_cfa, health, home};
