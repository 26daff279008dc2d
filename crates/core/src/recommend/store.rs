//! Recommendation storage trait.

use super::types::{NewRecommendation, RecommendationError, RecommendationFilter, UserRecommendation};

/// Trait for recommendation storage backends.
///
/// The store owns the uniqueness invariant: at most one row per
/// (user, book, energy, genre, depth), enforced atomically so concurrent
/// identical quizzes converge to a single row.
pub trait RecommendationStore: Send + Sync {
    /// Insert or refresh a recommendation.
    ///
    /// Idempotent on the 5-tuple key: an existing row gets its score,
    /// percentage and reasons overwritten; the dismissed/saved/viewed
    /// flags are left untouched.
    fn upsert(&self, rec: &NewRecommendation) -> Result<UserRecommendation, RecommendationError>;

    /// Get a recommendation by id.
    fn get(&self, id: i64) -> Result<UserRecommendation, RecommendationError>;

    /// List a user's recommendations matching the filter, ordered by
    /// created_at DESC then match_score DESC.
    fn list(
        &self,
        user_id: &str,
        filter: &RecommendationFilter,
    ) -> Result<Vec<UserRecommendation>, RecommendationError>;

    /// Flag setters. Fail with NotFound when the row does not exist or
    /// belongs to a different user.
    fn set_dismissed(&self, user_id: &str, id: i64, value: bool)
        -> Result<(), RecommendationError>;
    fn set_saved(&self, user_id: &str, id: i64, value: bool) -> Result<(), RecommendationError>;
    fn set_viewed(&self, user_id: &str, id: i64, value: bool) -> Result<(), RecommendationError>;
}
