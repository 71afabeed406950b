//! HTTP API server configuration

use serde::{Deserialize, Serialize};

/// HTTP API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Listen address (e.g. "0.0.0.0:8080")
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Enable permissive CORS for browser-based clients
    #[serde(default = "default_cors_enabled")]
    pub cors_enabled: bool,
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_cors_enabled() -> bool {
    true
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            cors_enabled: default_cors_enabled(),
        }
    }
}
