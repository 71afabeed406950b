//! Outbound scraping configuration

use serde::{Deserialize, Serialize};

use super::DEFAULT_USER_AGENT;

/// Configuration for outbound page fetching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapingConfig {
    /// User agent string sent with every request
    pub user_agent: String,
    /// Request timeout (seconds)
    pub request_timeout_secs: u64,
    /// Connection timeout (seconds)
    pub connect_timeout_secs: u64,
    /// Maximum response size (bytes)
    pub max_content_size: usize,
    /// Fixed delay between consecutive detail-page fetches (milliseconds).
    /// Not adaptive, just a constant throttle.
    pub politeness_delay_ms: u64,
    /// Minimum extracted fragment length in characters; shorter fragments
    /// (image captions, nav items, footers) are discarded
    pub min_fragment_chars: usize,
    /// Check robots.txt before fetching
    pub respect_robots: bool,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 15,
            connect_timeout_secs: 10,
            max_content_size: 10 * 1024 * 1024, // 10 MB
            politeness_delay_ms: 300,
            min_fragment_chars: 50,
            respect_robots: true,
        }
    }
}
