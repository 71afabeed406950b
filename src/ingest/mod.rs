//! Ingestion pipeline
//!
//! One parameterized pipeline for every source: fetch page(s), extract
//! readable text, normalize into documents, and rebuild the source's
//! index in a single full-replace bulk load. Documents flow in memory
//! from extraction straight to the index; there is no intermediate
//! on-disk handoff.
//!
//! Failure policy is fail-fast: the first fetch or extraction failure
//! aborts the whole run for that source, and nothing is retried.

pub mod normalize;

pub use normalize::{normalize, snippet};

use std::collections::HashSet;
use std::time::Duration;

use chrono::Utc;
use scraper::{Html, Selector};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::config::{Config, ScrapingConfig};
use crate::index::{FieldMapping, IndexError, IndexManager};
use crate::scraping::{ExtractError, Extractor, FetchError, Fetcher, RobotsCache};
use crate::sources::{Source, SourceKind};
use crate::types::{Document, IngestReport};

/// Errors that abort an ingestion run
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("Fetching {0} is disallowed by robots.txt")]
    RobotsDisallowed(String),
    #[error("Could not parse listing JSON: {0}")]
    Listing(#[from] serde_json::Error),
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// The fetch → extract → normalize → index pipeline.
///
/// Strictly sequential within a run: one fetch at a time, with only the
/// fixed politeness sleep between directory detail pages.
pub struct Pipeline {
    fetcher: Fetcher,
    extractor: Extractor,
    manager: IndexManager,
    scraping: ScrapingConfig,
    snippet_chars: usize,
}

impl Pipeline {
    pub fn new(config: &Config, manager: IndexManager) -> Result<Self, FetchError> {
        Ok(Self {
            fetcher: Fetcher::new(&config.scraping)?,
            extractor: Extractor::new(config.scraping.min_fragment_chars),
            manager,
            scraping: config.scraping.clone(),
            snippet_chars: config.search.snippet_chars,
        })
    }

    /// Run one source end to end and rebuild its index.
    pub async fn run(&self, source: &Source) -> Result<IngestReport, IngestError> {
        info!("Ingesting source '{}' into index '{}'", source.key, source.index_name);
        let mut robots = RobotsCache::new();

        let docs = match &source.kind {
            SourceKind::ArticlePages { urls } => {
                self.collect_articles(source, urls, &mut robots).await?
            }
            SourceKind::JsonListing { url } => {
                self.collect_listing(source, url, &mut robots).await?
            }
            SourceKind::Directory { url, link_selector } => {
                self.collect_directory(source, url, link_selector, &mut robots)
                    .await?
            }
        };

        // The ingestion contract: an empty batch is a failure, never a
        // silently empty index.
        if docs.is_empty() {
            return Err(ExtractError::NoContent.into());
        }

        let report = self
            .manager
            .rebuild(source.index_name, &FieldMapping::documents(), &docs)?;
        Ok(report)
    }

    /// Standalone article pages: one document per URL.
    async fn collect_articles(
        &self,
        source: &Source,
        urls: &[&str],
        robots: &mut RobotsCache,
    ) -> Result<Vec<Document>, IngestError> {
        let mut docs = Vec::with_capacity(urls.len());
        for url in urls {
            let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
            self.check_robots(robots, &parsed).await?;

            let page = self.fetcher.fetch_url(&parsed).await?;
            let extracted = self.extractor.extract(&page.body, source.content_selectors)?;
            debug!(
                "Extracted {} fragments ({} chars) from {}",
                extracted.fragment_count,
                extracted.text.len(),
                url
            );

            docs.push(normalize(
                extracted.title.as_deref(),
                source.label,
                page.final_url.as_str(),
                extracted.text,
                self.snippet_chars,
                Utc::now(),
            ));
        }
        Ok(docs)
    }

    /// A JSON listing endpoint: one document per post. Post titles double
    /// as the body text, since the listing carries no article content.
    async fn collect_listing(
        &self,
        source: &Source,
        url: &str,
        robots: &mut RobotsCache,
    ) -> Result<Vec<Document>, IngestError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        self.check_robots(robots, &parsed).await?;

        let page = self.fetcher.fetch_url(&parsed).await?;
        let listing: Listing = serde_json::from_str(&page.body)?;

        let scraped_at = Utc::now();
        let docs: Vec<Document> = listing
            .data
            .children
            .into_iter()
            .map(|child| child.data)
            .filter(|post| !post.title.trim().is_empty() && !post.permalink.is_empty())
            .map(|post| {
                let absolute = format!("https://www.reddit.com{}", post.permalink);
                normalize(
                    Some(post.title.trim()),
                    source.label,
                    &absolute,
                    post.title.trim().to_string(),
                    self.snippet_chars,
                    scraped_at,
                )
            })
            .collect();

        debug!("Listing {} yielded {} posts", url, docs.len());
        Ok(docs)
    }

    /// A directory page: crawl each detail link with a fixed politeness
    /// sleep between fetches, one document per detail page.
    async fn collect_directory(
        &self,
        source: &Source,
        url: &str,
        link_selector: &str,
        robots: &mut RobotsCache,
    ) -> Result<Vec<Document>, IngestError> {
        let base = Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        self.check_robots(robots, &base).await?;

        let listing = self.fetcher.fetch_url(&base).await?;
        let links = extract_detail_links(&listing.body, link_selector, &listing.final_url);
        debug!("Directory {} yielded {} detail links", url, links.len());

        let delay = Duration::from_millis(self.scraping.politeness_delay_ms);
        let mut docs = Vec::with_capacity(links.len());
        for (i, link) in links.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(delay).await;
            }
            self.check_robots(robots, link).await?;

            let page = self.fetcher.fetch_url(link).await?;
            let extracted = self.extractor.extract(&page.body, source.content_selectors)?;
            docs.push(normalize(
                extracted.title.as_deref(),
                source.label,
                page.final_url.as_str(),
                extracted.text,
                self.snippet_chars,
                Utc::now(),
            ));
        }
        Ok(docs)
    }

    async fn check_robots(&self, robots: &mut RobotsCache, url: &Url) -> Result<(), IngestError> {
        if !self.scraping.respect_robots {
            return Ok(());
        }
        if robots
            .is_allowed(&self.fetcher, &self.scraping.user_agent, url)
            .await
        {
            Ok(())
        } else {
            Err(IngestError::RobotsDisallowed(url.to_string()))
        }
    }
}

/// The subset of the Reddit listing shape we consume:
/// `data.children[].data.{title, permalink}`.
#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: ListingPost,
}

#[derive(Debug, Deserialize)]
struct ListingPost {
    #[serde(default)]
    title: String,
    #[serde(default)]
    permalink: String,
}

/// Resolve detail-page links out of a directory listing.
///
/// Keeps links on the listing's host, drops the listing page itself, and
/// de-duplicates while preserving document order.
fn extract_detail_links(html: &str, link_selector: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(link_selector) else {
        tracing::warn!("Invalid link selector '{}'", link_selector);
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Ok(mut resolved) = base.join(href) else {
            continue;
        };
        resolved.set_fragment(None);

        if resolved.host_str() != base.host_str() {
            continue;
        }
        if resolved.path().trim_end_matches('/') == base.path().trim_end_matches('/') {
            continue;
        }
        if seen.insert(resolved.as_str().to_string()) {
            links.push(resolved);
        }
    }
    links
}
