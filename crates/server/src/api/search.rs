//! Search API handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use bookmood_core::search::MIN_QUERY_LEN;
use bookmood_core::{CatalogEntry, ExternalBook, SearchFilters, SortMode};

use super::ErrorResponse;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub moods: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub year_from: Option<i32>,
    #[serde(default)]
    pub year_to: Option<i32>,
    #[serde(default)]
    pub sort_by: Option<SortMode>,
    #[serde(default)]
    pub limit: Option<u32>,
    /// Query external providers when local results leave budget unfilled.
    #[serde(default = "default_include_external")]
    pub include_external: bool,
}

fn default_include_external() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total_count: usize,
    pub local_books: Vec<CatalogEntry>,
    pub external_books: Vec<ExternalBook>,
    pub has_more: bool,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionsParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/search
///
/// Combined local + external search.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, impl IntoResponse> {
    let query = body.query.trim().to_string();
    if query.len() < MIN_QUERY_LEN {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!(
                "query must be at least {} characters",
                MIN_QUERY_LEN
            ))),
        ));
    }

    let filters = SearchFilters {
        genres: body.genres,
        moods: body.moods,
        min_rating: body.rating,
        year_from: body.year_from,
        year_to: body.year_to,
        sort: body.sort_by.unwrap_or_default(),
        limit: body.limit.unwrap_or(20),
    };

    match state
        .search()
        .combined_search(&query, &filters, body.include_external)
        .await
    {
        Ok(result) => {
            let has_more = result.local_books.len() + result.external_books.len()
                >= filters.effective_limit() as usize;
            Ok(Json(SearchResponse {
                query,
                total_count: result.total_count,
                local_books: result.local_books,
                external_books: result.external_books,
                has_more,
            }))
        }
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )),
    }
}

/// GET /api/v1/search/suggestions?q=...
///
/// Short queries produce an empty suggestion list rather than an error.
pub async fn suggestions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SuggestionsParams>,
) -> Result<Json<SuggestionsResponse>, impl IntoResponse> {
    match state.search().suggestions(&params.q) {
        Ok(suggestions) => Ok(Json(SuggestionsResponse { suggestions })),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )),
    }
}
