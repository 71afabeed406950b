//! HTTP fetching for the ingestion pipeline
//!
//! One GET per call, no retries. A failed fetch is terminal for the
//! ingestion run that issued it.

use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::ScrapingConfig;

/// Errors that can occur during fetching
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS, or timeout failure before a response arrived
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The server answered with a non-success status. 403 usually means
    /// the user agent was rejected; 429 that we are being throttled.
    #[error("HTTP status {status} fetching {url}")]
    Status { status: u16, url: String },
    #[error("Content too large: {0} bytes")]
    ContentTooLarge(usize),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Result of a successful fetch
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// The fetched URL (may differ from the request due to redirects)
    pub final_url: Url,
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: String,
    /// Content type header, defaulted to text/html when absent
    pub content_type: String,
}

/// HTTP fetcher with a shared connection pool
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    max_content_size: usize,
}

impl Fetcher {
    /// Create a fetcher from the scraping configuration.
    pub fn new(config: &ScrapingConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            max_content_size: config.max_content_size,
        })
    }

    /// Fetch a URL, returning the body on a 2xx response.
    pub async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        self.fetch_url(&parsed).await
    }

    /// Fetch a parsed URL, returning the body on a 2xx response.
    pub async fn fetch_url(&self, url: &Url) -> Result<FetchResult, FetchError> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: final_url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        if let Some(len) = response.content_length() {
            if len as usize > self.max_content_size {
                return Err(FetchError::ContentTooLarge(len as usize));
            }
        }

        let body = response.text().await?;
        if body.len() > self.max_content_size {
            return Err(FetchError::ContentTooLarge(body.len()));
        }

        Ok(FetchResult {
            final_url,
            status: status.as_u16(),
            body,
            content_type,
        })
    }
}
