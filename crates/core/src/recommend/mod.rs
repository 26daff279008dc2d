//! Mood-based book recommendations.
//!
//! A 3-axis quiz (energy, genre, depth) drives candidate retrieval from
//! the catalog, a point-based match rubric, and per-user persistence of
//! the scored results.

mod mappings;
mod scorer;
mod sqlite_store;
mod store;
mod types;

pub use mappings::{build_mood_summary, category_terms, genre_label};
pub use scorer::{clamp_percentage, mood_tags, score_book, MoodRecommender, DEFAULT_LIMIT};
pub use sqlite_store::SqliteRecommendationStore;
pub use store::RecommendationStore;
pub use types::*;
