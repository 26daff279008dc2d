//! Mood recommendation API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use bookmood_core::recommend::DEFAULT_LIMIT;
use bookmood_core::{
    MoodDepth, MoodEnergy, MoodQuery, MoodRecommendations, RecommendationError,
    RecommendationFilter, UserRecommendation,
};

use super::ErrorResponse;
use crate::state::AppState;

/// Upper bound on requested recommendations per quiz.
const MAX_LIMIT: u32 = 50;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct MoodQuizRequest {
    pub user_id: String,
    pub energy: MoodEnergy,
    pub genre: String,
    pub depth: MoodDepth,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct UserParams {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct FlagRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct SavedRecommendationsResponse {
    pub recommendations: Vec<UserRecommendation>,
}

fn error_status(e: &RecommendationError) -> StatusCode {
    match e {
        RecommendationError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/recommendations/mood
///
/// Run the mood quiz pipeline and persist the scored recommendations.
pub async fn mood_recommendations(
    State(state): State<Arc<AppState>>,
    Json(body): Json<MoodQuizRequest>,
) -> Result<Json<MoodRecommendations>, impl IntoResponse> {
    if body.user_id.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("user_id is required")),
        ));
    }

    let query = MoodQuery {
        energy: body.energy,
        genre: body.genre,
        depth: body.depth,
    };
    let limit = body.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    match state.recommender().recommend(&body.user_id, &query, limit) {
        Ok(result) => Ok(Json(result)),
        Err(e) => Err((error_status(&e), Json(ErrorResponse::new(e.to_string())))),
    }
}

/// GET /api/v1/recommendations?user_id=...
///
/// All persisted recommendations for a user, newest first.
pub async fn list_recommendations(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserParams>,
) -> Result<Json<SavedRecommendationsResponse>, impl IntoResponse> {
    match state
        .recommendations()
        .list(&params.user_id, &RecommendationFilter::new())
    {
        Ok(recommendations) => Ok(Json(SavedRecommendationsResponse { recommendations })),
        Err(e) => Err((error_status(&e), Json(ErrorResponse::new(e.to_string())))),
    }
}

/// GET /api/v1/recommendations/saved?user_id=...
///
/// Saved, non-dismissed recommendations for a user.
pub async fn saved_recommendations(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserParams>,
) -> Result<Json<SavedRecommendationsResponse>, impl IntoResponse> {
    let filter = RecommendationFilter::new()
        .with_saved(true)
        .with_dismissed(false);

    match state.recommendations().list(&params.user_id, &filter) {
        Ok(recommendations) => Ok(Json(SavedRecommendationsResponse { recommendations })),
        Err(e) => Err((error_status(&e), Json(ErrorResponse::new(e.to_string())))),
    }
}

/// POST /api/v1/recommendations/{id}/dismiss
pub async fn dismiss_recommendation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<FlagRequest>,
) -> Result<Json<UserRecommendation>, impl IntoResponse> {
    set_flag(&state, &body.user_id, id, Flag::Dismissed)
}

/// POST /api/v1/recommendations/{id}/save
pub async fn save_recommendation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<FlagRequest>,
) -> Result<Json<UserRecommendation>, impl IntoResponse> {
    set_flag(&state, &body.user_id, id, Flag::Saved)
}

/// POST /api/v1/recommendations/{id}/viewed
pub async fn mark_recommendation_viewed(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<FlagRequest>,
) -> Result<Json<UserRecommendation>, impl IntoResponse> {
    set_flag(&state, &body.user_id, id, Flag::Viewed)
}

enum Flag {
    Dismissed,
    Saved,
    Viewed,
}

fn set_flag(
    state: &AppState,
    user_id: &str,
    id: i64,
    flag: Flag,
) -> Result<Json<UserRecommendation>, (StatusCode, Json<ErrorResponse>)> {
    let store = state.recommendations();
    let result = match flag {
        Flag::Dismissed => store.set_dismissed(user_id, id, true),
        Flag::Saved => store.set_saved(user_id, id, true),
        Flag::Viewed => store.set_viewed(user_id, id, true),
    };

    match result.and_then(|_| store.get(id)) {
        Ok(recommendation) => Ok(Json(recommendation)),
        Err(e) => Err((error_status(&e), Json(ErrorResponse::new(e.to_string())))),
    }
}
