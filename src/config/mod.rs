//! Configuration for catdex

mod http;
mod logging;
mod scraping;
mod search;

pub use http::HttpConfig;
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use scraping::ScrapingConfig;
pub use search::SearchConfig;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default user agent for all outbound HTTP requests (pages, listings,
/// robots.txt). Sites like Britannica reject requests without an
/// identifying agent, so this must always be sent.
pub const DEFAULT_USER_AGENT: &str = "CatdexBot/1.0 (+https://github.com/catdex/catdex)";

/// Main configuration, loaded from a TOML file or built from defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP API server configuration
    #[serde(default)]
    pub http: HttpConfig,
    /// Outbound scraping configuration
    #[serde(default)]
    pub scraping: ScrapingConfig,
    /// Index and query configuration
    #[serde(default)]
    pub search: SearchConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file, validating after deserialize.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate all configuration fields.
    ///
    /// Collects all validation errors and reports them together so the
    /// user can fix everything in one pass.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if self.scraping.user_agent.trim().is_empty() {
            errors.push("scraping user_agent must not be empty".to_string());
        }
        if self.scraping.request_timeout_secs == 0 {
            errors.push("request_timeout_secs must be positive".to_string());
        }
        if self.scraping.max_content_size == 0 {
            errors.push("max_content_size must be positive".to_string());
        }

        if self.search.data_dir.as_os_str().is_empty() {
            errors.push("search data_dir must not be empty".to_string());
        }
        if self.search.result_limit == 0 {
            errors.push("result_limit must be positive".to_string());
        }
        if self.search.snippet_chars == 0 {
            errors.push("snippet_chars must be positive".to_string());
        }

        if !self.http.listen_addr.is_empty() {
            if let Some(port_str) = self.http.listen_addr.rsplit(':').next() {
                if let Ok(port) = port_str.parse::<u32>() {
                    if port == 0 || port > 65535 {
                        errors.push(format!(
                            "HTTP listen port must be between 1 and 65535, got {}",
                            port
                        ));
                    }
                }
            }
        } else {
            errors.push("HTTP listen_addr must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }
    }
}
