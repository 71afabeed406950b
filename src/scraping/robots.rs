//! robots.txt permission checks
//!
//! Before fetching a page the pipeline asks this cache whether the
//! configured user agent may access the path. Rules are fetched once per
//! host and kept for the duration of one ingestion run. If robots.txt
//! cannot be fetched or parsed we assume permission, which is the
//! standard convention.

use std::collections::HashMap;
use url::Url;

use super::fetcher::Fetcher;

/// Parsed robots.txt rules for the configured user agent.
#[derive(Debug, Clone)]
pub struct RobotsRules {
    disallow: Vec<String>,
    allow: Vec<String>,
}

impl RobotsRules {
    /// Parse robots.txt content, keeping only the group that applies to
    /// `user_agent`. A specific agent match overrides wildcard rules.
    pub fn parse(content: &str, user_agent: &str) -> Self {
        let ua_lower = user_agent.to_lowercase();
        let mut disallow = Vec::new();
        let mut allow = Vec::new();
        let mut current_applies = false;
        let mut found_specific = false;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((directive, value)) = line.split_once(':') else {
                continue;
            };
            let directive = directive.trim().to_lowercase();
            let value = value.trim();

            match directive.as_str() {
                "user-agent" => {
                    let agent = value.to_lowercase();
                    if agent == "*" {
                        current_applies = !found_specific;
                    } else if ua_lower.contains(&agent) || agent.contains(&ua_lower) {
                        current_applies = true;
                        found_specific = true;
                        // Specific group replaces any wildcard rules
                        disallow.clear();
                        allow.clear();
                    } else {
                        current_applies = false;
                    }
                }
                "disallow" if current_applies && !value.is_empty() => {
                    disallow.push(value.to_string());
                }
                "allow" if current_applies && !value.is_empty() => {
                    allow.push(value.to_string());
                }
                _ => {}
            }
        }

        Self { disallow, allow }
    }

    /// Rules that permit everything, used when robots.txt is unavailable.
    pub fn allow_all() -> Self {
        Self {
            disallow: Vec::new(),
            allow: Vec::new(),
        }
    }

    /// Check whether a path is allowed. Longest matching rule wins; on a
    /// tie, allow wins.
    pub fn is_allowed(&self, path: &str) -> bool {
        let longest_allow = self
            .allow
            .iter()
            .filter(|p| Self::path_matches(path, p))
            .map(|p| p.len())
            .max()
            .unwrap_or(0);
        let longest_disallow = self
            .disallow
            .iter()
            .filter(|p| Self::path_matches(path, p))
            .map(|p| p.len())
            .max()
            .unwrap_or(0);

        longest_allow >= longest_disallow
    }

    /// Match a path against a robots.txt pattern with `*` wildcards and
    /// an optional `$` end anchor.
    fn path_matches(path: &str, pattern: &str) -> bool {
        let (pattern, anchored) = match pattern.strip_suffix('$') {
            Some(p) => (p, true),
            None => (pattern, false),
        };

        let mut remainder = path;
        let mut first = true;
        for part in pattern.split('*') {
            if part.is_empty() {
                first = false;
                continue;
            }
            match remainder.find(part) {
                Some(idx) if !first || idx == 0 => {
                    remainder = &remainder[idx + part.len()..];
                }
                _ => return false,
            }
            first = false;
        }

        !anchored || remainder.is_empty() || pattern.ends_with('*')
    }
}

/// Per-host robots.txt cache scoped to one ingestion run.
#[derive(Debug, Default)]
pub struct RobotsCache {
    rules: HashMap<String, RobotsRules>,
}

impl RobotsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `url` may be fetched, loading the host's robots.txt
    /// on first use.
    pub async fn is_allowed(&mut self, fetcher: &Fetcher, user_agent: &str, url: &Url) -> bool {
        let Some(host) = url.host_str().map(|h| h.to_string()) else {
            return true;
        };

        if !self.rules.contains_key(&host) {
            let robots_url = format!("{}://{}/robots.txt", url.scheme(), host);
            let rules = match fetcher.fetch(&robots_url).await {
                Ok(result) => RobotsRules::parse(&result.body, user_agent),
                Err(e) => {
                    tracing::debug!("robots.txt unavailable for {}: {} (assuming permission)", host, e);
                    RobotsRules::allow_all()
                }
            };
            self.rules.insert(host.clone(), rules);
        }

        self.rules
            .get(&host)
            .map(|r| r.is_allowed(url.path()))
            .unwrap_or(true)
    }
}
