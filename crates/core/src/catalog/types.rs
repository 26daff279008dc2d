//! Types for the book catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Energy level of a book's narrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyLevel {
    High,
    Medium,
    Low,
}

impl EnergyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyLevel::High => "high",
            EnergyLevel::Medium => "medium",
            EnergyLevel::Low => "low",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "high" => Some(EnergyLevel::High),
            "medium" => Some(EnergyLevel::Medium),
            "low" => Some(EnergyLevel::Low),
            _ => None,
        }
    }
}

/// Complexity and depth of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingDepth {
    Light,
    Medium,
    Deep,
}

impl ReadingDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingDepth::Light => "light",
            ReadingDepth::Medium => "medium",
            ReadingDepth::Deep => "deep",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(ReadingDepth::Light),
            "medium" => Some(ReadingDepth::Medium),
            "deep" => Some(ReadingDepth::Deep),
            _ => None,
        }
    }
}

/// Overall pacing of the narrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingPace {
    Fast,
    Moderate,
    Slow,
}

impl ReadingPace {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingPace::Fast => "fast",
            ReadingPace::Moderate => "moderate",
            ReadingPace::Slow => "slow",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fast" => Some(ReadingPace::Fast),
            "moderate" => Some(ReadingPace::Moderate),
            "slow" => Some(ReadingPace::Slow),
            _ => None,
        }
    }
}

/// A book held by the catalog.
///
/// Treated as an immutable snapshot by the search and recommendation code;
/// only the catalog itself writes these rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: i64,
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    pub description: String,
    pub genre: String,
    pub published_year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_books_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_library_id: Option<String>,
    pub average_rating: f64,
    pub rating_count: u32,
    pub popularity_score: f64,
    /// Mood metadata; None when the book has not been classified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_level: Option<EnergyLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_depth: Option<ReadingDepth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_pace: Option<ReadingPace>,
    /// Comma-separated theme tags (e.g. "adventure, coming-of-age").
    #[serde(default)]
    pub theme_tags: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for inserting a book into the catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub description: String,
    pub genre: String,
    pub published_year: i32,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub google_books_id: Option<String>,
    #[serde(default)]
    pub open_library_id: Option<String>,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub rating_count: u32,
    #[serde(default)]
    pub popularity_score: f64,
    #[serde(default)]
    pub energy_level: Option<EnergyLevel>,
    #[serde(default)]
    pub reading_depth: Option<ReadingDepth>,
    #[serde(default)]
    pub reading_pace: Option<ReadingPace>,
    #[serde(default)]
    pub theme_tags: String,
}

/// Text-search predicate for the catalog.
///
/// The catalog applies the predicate and filters; ordering beyond stable
/// id order is the ranker's job.
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    /// OR of case-insensitive substring matches on genre.
    pub genres: Vec<String>,
    /// OR of case-insensitive substring matches on theme tags.
    pub moods: Vec<String>,
    /// Minimum average rating (inclusive).
    pub min_rating: Option<f64>,
    /// Published year range (inclusive).
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
}

/// Energy side of a mood candidate predicate. Medium imposes no predicate,
/// so it has no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyBias {
    /// energy_level = high OR reading_pace = fast
    High,
    /// energy_level = low OR reading_pace = slow
    Low,
}

/// Depth side of a mood candidate predicate. Medium imposes no predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthBias {
    /// reading_depth = light OR page_count < 300
    Light,
    /// reading_depth = deep OR page_count > 400
    Deep,
}

/// Conjunctive predicate for mood-based candidate retrieval.
///
/// Results are ordered by average_rating DESC, rating_count DESC and capped
/// at `limit`. An empty `genre_terms` list means no genre narrowing.
#[derive(Debug, Clone)]
pub struct CandidateQuery {
    pub genre_terms: Vec<String>,
    pub energy: Option<EnergyBias>,
    pub depth: Option<DepthBias>,
    pub limit: u32,
}

/// Field selector for distinct-value suggestion lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogField {
    Title,
    Author,
    Genre,
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
