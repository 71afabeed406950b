//! Document normalization
//!
//! Pure functions mapping extracted text plus source metadata into the
//! uniform document shape. No side effects, no failure modes: missing
//! inputs are substituted with defaults.

use chrono::{DateTime, Utc};

use crate::types::Document;

/// Derive the display snippet: the first `max_chars` characters of the
/// body plus an ellipsis marker. Character-based, so multibyte text is
/// never split mid-codepoint.
pub fn snippet(body_text: &str, max_chars: usize) -> String {
    let mut excerpt: String = body_text.trim().chars().take(max_chars).collect();
    excerpt.push_str("...");
    excerpt
}

/// Build a normalized document from one extracted page.
///
/// An absent or empty title falls back to the source's fixed label.
pub fn normalize(
    title: Option<&str>,
    fallback_title: &str,
    url: &str,
    body_text: String,
    snippet_chars: usize,
    scraped_at: DateTime<Utc>,
) -> Document {
    let title = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(fallback_title)
        .to_string();

    let snippet = snippet(&body_text, snippet_chars);

    Document {
        title,
        url: url.to_string(),
        body_text,
        snippet,
        scraped_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_truncates_with_ellipsis() {
        let body = "x".repeat(500);
        let s = snippet(&body, 200);
        assert_eq!(s.chars().count(), 203);
        assert!(s.ends_with("..."));
    }

    #[test]
    fn snippet_is_char_safe_for_multibyte_text() {
        let body = "é".repeat(300);
        let s = snippet(&body, 200);
        assert!(s.starts_with(&"é".repeat(200)));
        assert!(s.ends_with("..."));
    }

    #[test]
    fn missing_title_falls_back_to_source_label() {
        let doc = normalize(
            None,
            "Articles",
            "https://example.org/cat",
            "body".to_string(),
            200,
            Utc::now(),
        );
        assert_eq!(doc.title, "Articles");

        let doc = normalize(
            Some("   "),
            "Articles",
            "https://example.org/cat",
            "body".to_string(),
            200,
            Utc::now(),
        );
        assert_eq!(doc.title, "Articles");
    }

    #[test]
    fn explicit_title_is_kept() {
        let doc = normalize(
            Some("Cat"),
            "Articles",
            "https://example.org/cat",
            "Cats are small carnivorous mammals kept as pets.".to_string(),
            200,
            Utc::now(),
        );
        assert_eq!(doc.title, "Cat");
        assert!(doc.snippet.starts_with("Cats are small"));
    }
}
