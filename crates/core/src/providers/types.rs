//! Normalized types for external provider responses.

use serde::{Deserialize, Serialize};

/// A book record normalized from an external provider.
///
/// Both providers map their heterogeneous payloads into this shape before
/// anything downstream sees them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExternalBook {
    /// Book title. Required; records without one are dropped.
    pub title: String,
    /// Primary author (first of `authors`, or "Unknown Author").
    pub author: String,
    /// All listed authors.
    #[serde(default)]
    pub authors: Vec<String>,
    /// Description/synopsis (may be empty).
    #[serde(default)]
    pub description: String,
    /// Publication year, parsed from the first 4 characters of the
    /// provider's date string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Primary genre (first category, or "Unknown").
    pub genre: String,
    /// All listed categories/subjects.
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings_count: Option<u32>,
    /// Best available cover image (largest size first).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    /// First ISBN-13, else first ISBN-10.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_books_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_library_id: Option<String>,
    /// Which provider produced this record.
    pub source: String,
}

/// Pick the primary author from an authors list.
pub(crate) fn primary_author(authors: &[String]) -> String {
    authors
        .first()
        .cloned()
        .unwrap_or_else(|| "Unknown Author".to_string())
}

/// Pick the primary genre from a categories list.
pub(crate) fn primary_genre(categories: &[String]) -> String {
    categories
        .first()
        .cloned()
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Parse a year from the first 4 characters of a provider date string
/// ("2019-05-01", "2019", "199?" ...).
pub(crate) fn parse_year(date: &str) -> Option<i32> {
    let prefix: String = date.chars().take(4).collect();
    if prefix.is_empty() {
        return None;
    }
    prefix.parse().ok()
}
