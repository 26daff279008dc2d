//! Types for the book search system.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{BookFilter, CatalogEntry, CatalogError};
use crate::providers::ExternalBook;

/// Queries shorter than this (after trimming) are treated as "no query".
pub const MIN_QUERY_LEN: usize = 2;

/// Sort mode for local search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Relevance,
    Popularity,
    Rating,
    Newest,
    Oldest,
    Title,
}

/// Filters and options for a search request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchFilters {
    /// OR of case-insensitive substring matches on genre.
    #[serde(default)]
    pub genres: Vec<String>,
    /// OR of case-insensitive substring matches on theme tags.
    #[serde(default)]
    pub moods: Vec<String>,
    /// Minimum average rating (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    /// Published year range (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_from: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_to: Option<i32>,
    #[serde(default)]
    pub sort: SortMode,
    /// Result budget, clamped to [1, 100].
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    20
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            genres: Vec::new(),
            moods: Vec::new(),
            min_rating: None,
            year_from: None,
            year_to: None,
            sort: SortMode::default(),
            limit: default_limit(),
        }
    }
}

impl SearchFilters {
    /// The limit clamped to its valid range.
    pub fn effective_limit(&self) -> u32 {
        self.limit.clamp(1, 100)
    }

    /// The catalog-facing predicate (everything except sort and limit).
    pub fn as_book_filter(&self) -> BookFilter {
        BookFilter {
            genres: self.genres.clone(),
            moods: self.moods.clone(),
            min_rating: self.min_rating,
            year_from: self.year_from,
            year_to: self.year_to,
        }
    }
}

/// Result of a combined local + external search.
#[derive(Debug, Clone, Serialize)]
pub struct CombinedSearchResult {
    /// Ranked local catalog matches, truncated to the limit.
    pub local_books: Vec<CatalogEntry>,
    /// Deduplicated external matches filling the remaining budget.
    pub external_books: Vec<ExternalBook>,
    /// Local count + external count after truncation.
    pub total_count: usize,
}

/// Errors that can occur during search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}
