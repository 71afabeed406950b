//! Content extraction from HTML
//!
//! Locates a content region by trying candidate CSS selectors in order
//! (falling back to the whole document), splits the region into
//! block-level text fragments, discards fragments below a minimum length,
//! and strips bracketed citation markers. The output is plain text with
//! no markup.

use regex_lite::Regex;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Errors during content extraction
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No fragment survived the length filter. Zero-fragment extraction
    /// is always a hard failure, never an empty success.
    #[error("No usable content found in page")]
    NoContent,
}

/// Extracted content from one page
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    /// Page title from `<title>`, with site suffixes removed
    pub title: Option<String>,
    /// Surviving fragments joined with single spaces
    pub text: String,
    /// Number of fragments that passed the length filter
    pub fragment_count: usize,
}

/// Site-name suffixes stripped from `<title>` text
const TITLE_SUFFIXES: &[&str] = &[" - Wikipedia", " | Britannica", " – The Cat Fanciers' Association"];

/// HTML to plain-text extractor
pub struct Extractor {
    min_fragment_chars: usize,
    citation_marker: Regex,
}

impl Extractor {
    /// Create an extractor with the given minimum fragment length.
    pub fn new(min_fragment_chars: usize) -> Self {
        Self {
            min_fragment_chars,
            // Bracketed numeric citation markers like [12]
            citation_marker: Regex::new(r"\[\d+\]").expect("citation pattern is valid"),
        }
    }

    /// Extract clean text from a page.
    ///
    /// `content_selectors` are tried in order; the first one with a match
    /// becomes the content region. When none match, the whole document is
    /// the region.
    pub fn extract(&self, html: &str, content_selectors: &[&str]) -> Result<ExtractedPage, ExtractError> {
        let document = Html::parse_document(html);
        let raw_fragments = Self::collect_fragments(&document, content_selectors);

        let kept: Vec<String> = raw_fragments
            .iter()
            .filter_map(|raw| self.clean_fragment(raw))
            .collect();

        if kept.is_empty() {
            return Err(ExtractError::NoContent);
        }

        let fragment_count = kept.len();
        Ok(ExtractedPage {
            title: Self::page_title(&document),
            text: kept.join(" "),
            fragment_count,
        })
    }

    /// Collect candidate text fragments, split on block boundaries.
    ///
    /// Paragraph elements are the preferred block unit; regions without
    /// any `<p>` fall back to line-split visible text, which handles
    /// pages that render content outside paragraph tags.
    fn collect_fragments(document: &Html, content_selectors: &[&str]) -> Vec<String> {
        let p_selector = Selector::parse("p").expect("p selector is valid");

        for candidate in content_selectors {
            let Ok(selector) = Selector::parse(candidate) else {
                tracing::warn!("Skipping invalid content selector '{}'", candidate);
                continue;
            };
            if let Some(region) = document.select(&selector).next() {
                return Self::region_fragments(&region, &p_selector);
            }
        }

        // Whole-document fallback
        let body_selector = Selector::parse("body").expect("body selector is valid");
        if let Some(body) = document.select(&body_selector).next() {
            return Self::region_fragments(&body, &p_selector);
        }

        document
            .root_element()
            .text()
            .flat_map(|t| t.split('\n'))
            .map(str::to_string)
            .collect()
    }

    fn region_fragments(region: &ElementRef, p_selector: &Selector) -> Vec<String> {
        let paragraphs: Vec<String> = region
            .select(p_selector)
            .map(|p| p.text().collect::<String>())
            .collect();

        if !paragraphs.is_empty() {
            return paragraphs;
        }

        // No <p> blocks in the region: treat each visible line as a block
        region
            .text()
            .flat_map(|t| t.split('\n'))
            .map(str::to_string)
            .collect()
    }

    /// Normalize one fragment: collapse whitespace, apply the length
    /// filter, then strip citation markers. Returns `None` for fragments
    /// that do not survive.
    fn clean_fragment(&self, raw: &str) -> Option<String> {
        let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.chars().count() < self.min_fragment_chars {
            return None;
        }

        let cleaned = self
            .citation_marker
            .replace_all(&collapsed, "")
            .trim()
            .to_string();
        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned)
        }
    }

    /// Extract the page title, dropping known site-name suffixes.
    fn page_title(document: &Html) -> Option<String> {
        let selector = Selector::parse("title").expect("title selector is valid");
        let raw = document
            .select(&selector)
            .next()
            .map(|t| t.text().collect::<String>())?;

        let mut title = raw.trim().to_string();
        for suffix in TITLE_SUFFIXES {
            if let Some(stripped) = title.strip_suffix(suffix) {
                title = stripped.trim().to_string();
                break;
            }
        }

        if title.is_empty() {
            None
        } else {
            Some(title)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(len: usize) -> String {
        // Deterministic filler of exactly `len` chars
        "abcdefghij".chars().cycle().take(len).collect()
    }

    #[test]
    fn short_fragments_are_discarded() {
        let html = format!(
            "<html><body><article><p>{}</p><p>{}</p><p>{}</p></article></body></html>",
            para(10),
            para(80),
            para(120),
        );

        let extractor = Extractor::new(50);
        let page = extractor.extract(&html, &["article"]).unwrap();

        assert_eq!(page.fragment_count, 2);
        assert_eq!(page.text, format!("{} {}", para(80), para(120)));
    }

    #[test]
    fn citation_markers_are_stripped() {
        let body = format!("{}[1] and some more text follows here[23] to pad this out.", para(40));
        let html = format!("<html><body><p>{body}</p></body></html>");

        let extractor = Extractor::new(50);
        let page = extractor.extract(&html, &[]).unwrap();

        assert!(!page.text.contains("[1]"));
        assert!(!page.text.contains("[23]"));
        assert!(page.text.contains("and some more text"));
    }

    #[test]
    fn zero_surviving_fragments_is_a_hard_failure() {
        let html = "<html><body><p>too short</p><p>also short</p></body></html>";
        let extractor = Extractor::new(50);
        assert!(matches!(
            extractor.extract(html, &["article"]),
            Err(ExtractError::NoContent)
        ));
    }

    #[test]
    fn first_matching_selector_wins() {
        let html = format!(
            "<html><body><div class='sidebar'><p>{}</p></div><article><p>{}</p></article></body></html>",
            para(60),
            para(70),
        );

        let extractor = Extractor::new(50);
        let page = extractor.extract(&html, &["article", ".sidebar"]).unwrap();
        assert_eq!(page.text, para(70));
    }

    #[test]
    fn falls_back_to_whole_document_when_no_selector_matches() {
        let html = format!("<html><body><p>{}</p></body></html>", para(90));
        let extractor = Extractor::new(50);
        let page = extractor.extract(&html, &["article", "main"]).unwrap();
        assert_eq!(page.text, para(90));
    }

    #[test]
    fn regions_without_paragraphs_split_on_lines() {
        let html = format!(
            "<html><body><div id='c'>{}\n{}\nshort line</div></body></html>",
            para(60),
            para(55),
        );

        let extractor = Extractor::new(50);
        let page = extractor.extract(&html, &["#c"]).unwrap();
        assert_eq!(page.fragment_count, 2);
    }

    #[test]
    fn whitespace_is_collapsed_within_fragments() {
        let html = format!(
            "<html><body><p>  {}   \n\t {} </p></body></html>",
            para(30),
            para(30),
        );

        let extractor = Extractor::new(50);
        let page = extractor.extract(&html, &[]).unwrap();
        assert_eq!(page.text, format!("{} {}", para(30), para(30)));
    }

    #[test]
    fn page_title_strips_site_suffix() {
        let html = "<html><head><title>Cat - Wikipedia</title></head><body><p>x</p></body></html>";
        let document = Html::parse_document(html);
        assert_eq!(Extractor::page_title(&document), Some("Cat".to_string()));
    }

    #[test]
    fn missing_title_is_none() {
        let html = "<html><body><p>no head here</p></body></html>";
        let document = Html::parse_document(html);
        assert_eq!(Extractor::page_title(&document), None);
    }
}
