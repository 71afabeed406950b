//! Index and query configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for on-disk indices and query defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Directory holding one subdirectory per named index
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Maximum results returned per query
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
    /// Snippet length in characters
    #[serde(default = "default_snippet_chars")]
    pub snippet_chars: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".catdex/indices")
}

fn default_result_limit() -> usize {
    10
}

fn default_snippet_chars() -> usize {
    200
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            result_limit: default_result_limit(),
            snippet_chars: default_snippet_chars(),
        }
    }
}
