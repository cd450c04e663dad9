//! Text cleanup shared by the scrapers.
//!
//! Feed descriptions arrive as HTML fragments, page text comes with layout
//! whitespace, and every source formats dates its own way. These helpers
//! turn all of that into the plain strings stored on a listing.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use scraper::Html;

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn clean_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip markup from an HTML fragment, decoding entities along the way.
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    clean_text(&text)
}

/// Plain-text teaser of an HTML description, at most `max_chars` characters.
///
/// Truncation happens on a character boundary and appends `…`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(excerpt("<p>Hello <b>world</b></p>", 200), "Hello world");
/// assert_eq!(excerpt("abcdef", 3), "abc…");
/// ```
pub fn excerpt(html: &str, max_chars: usize) -> String {
    let text = html_to_text(html);
    if text.chars().count() <= max_chars {
        return text;
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    cut
}

/// Normalize a posting date to `YYYY-MM-DD`.
///
/// Accepts RFC 2822 (RSS `pubDate`), RFC 3339, naive `YYYY-MM-DDTHH:MM:SS`
/// and bare `YYYY-MM-DD`. Anything else yields `None`.
pub fn normalize_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let date = DateTime::parse_from_rfc2822(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()?;

    Some(date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  Senior \n\t Rust   Engineer "), "Senior Rust Engineer");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_html_to_text() {
        let html = "<p>We&#39;re hiring!</p><ul><li>Rust</li><li>Tokio &amp; Axum</li></ul>";
        assert_eq!(html_to_text(html), "We're hiring! Rust Tokio & Axum");
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let html = format!("<p>{}</p>", "é".repeat(250));
        let out = excerpt(&html, 200);
        assert_eq!(out.chars().count(), 201);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn test_excerpt_short_text_untouched() {
        assert_eq!(excerpt("<b>Remote</b> role", 200), "Remote role");
        assert_eq!(excerpt("one two three", 4), "one…");
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(
            normalize_date("Tue, 14 May 2024 12:00:00 +0000"),
            Some("2024-05-14".to_string())
        );
        assert_eq!(
            normalize_date("2024-05-14T08:30:00-05:00"),
            Some("2024-05-14".to_string())
        );
        assert_eq!(normalize_date("2024-05-14T08:30:00"), Some("2024-05-14".to_string()));
        assert_eq!(normalize_date("2024-05-14"), Some("2024-05-14".to_string()));
        assert_eq!(normalize_date("last week"), None);
        assert_eq!(normalize_date("  "), None);
    }
}
