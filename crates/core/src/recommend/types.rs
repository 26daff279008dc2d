//! Types for the mood recommendation system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{CatalogEntry, CatalogError};

/// Energy axis of the mood quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodEnergy {
    High,
    Medium,
    Low,
}

impl MoodEnergy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodEnergy::High => "high",
            MoodEnergy::Medium => "medium",
            MoodEnergy::Low => "low",
        }
    }
}

/// Depth axis of the mood quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodDepth {
    Light,
    Medium,
    Deep,
}

impl MoodDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodDepth::Light => "light",
            MoodDepth::Medium => "medium",
            MoodDepth::Deep => "deep",
        }
    }
}

/// The 3-axis mood quiz input.
///
/// Genre is a free string; keys outside the known set take the fallback
/// path (no genre narrowing) rather than failing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodQuery {
    pub energy: MoodEnergy,
    pub genre: String,
    pub depth: MoodDepth,
}

/// A scored candidate, ephemeral per request.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    /// Unbounded rubric score; the ranking key.
    pub match_score: i64,
    /// Score clamped to [60, 95] for display.
    pub match_percentage: i64,
    /// At most 2, in rubric accumulation order.
    pub match_reasons: Vec<String>,
    /// At most 3, in fixed priority order.
    pub mood_tags: Vec<String>,
}

/// A display tag with its accent color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodTag {
    pub label: String,
    pub color: String,
}

/// Human-readable summary of a mood quiz, for display above the results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodSummary {
    pub title: String,
    pub description: String,
    pub emoji: String,
    pub tags: Vec<MoodTag>,
}

/// Full response of a mood recommendation request.
#[derive(Debug, Clone, Serialize)]
pub struct MoodRecommendations {
    pub recommendations: Vec<MatchResult>,
    pub mood_summary: MoodSummary,
    /// Number of scored candidates before truncation to the limit.
    pub total_found: usize,
}

/// Payload for upserting a recommendation row.
#[derive(Debug, Clone)]
pub struct NewRecommendation {
    pub user_id: String,
    pub book_id: i64,
    pub mood_energy: MoodEnergy,
    pub mood_genre: String,
    pub mood_depth: MoodDepth,
    pub match_score: i64,
    pub match_percentage: i64,
    pub match_reasons: Vec<String>,
}

/// A persisted per-user recommendation.
///
/// Unique per (user_id, book_id, mood_energy, mood_genre, mood_depth);
/// re-running the same quiz refreshes the score fields and leaves the
/// interaction flags alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecommendation {
    pub id: i64,
    pub user_id: String,
    pub book_id: i64,
    pub mood_energy: String,
    pub mood_genre: String,
    pub mood_depth: String,
    pub match_score: i64,
    pub match_percentage: i64,
    pub match_reasons: Vec<String>,
    pub dismissed: bool,
    pub saved: bool,
    pub viewed: bool,
    pub created_at: DateTime<Utc>,
}

/// Filter for listing a user's recommendations.
#[derive(Debug, Clone, Default)]
pub struct RecommendationFilter {
    pub saved: Option<bool>,
    pub dismissed: Option<bool>,
    pub limit: i64,
}

impl RecommendationFilter {
    pub fn new() -> Self {
        Self {
            saved: None,
            dismissed: None,
            limit: 100,
        }
    }

    pub fn with_saved(mut self, saved: bool) -> Self {
        self.saved = Some(saved);
        self
    }

    pub fn with_dismissed(mut self, dismissed: bool) -> Self {
        self.dismissed = Some(dismissed);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }
}

/// Errors for recommendation operations.
#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to persist recommendations: {0}")]
    Storage(String),
}
