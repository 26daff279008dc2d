//! Catalog API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use bookmood_core::{CatalogEntry, CatalogError, CatalogField, NewBook};

use super::ErrorResponse;
use crate::state::AppState;

const DEFAULT_LIST_LIMIT: u32 = 20;
const GENRE_LIST_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct BooksResponse {
    pub books: Vec<CatalogEntry>,
}

#[derive(Debug, Serialize)]
pub struct GenresResponse {
    pub genres: Vec<GenreEntry>,
}

#[derive(Debug, Serialize)]
pub struct GenreEntry {
    pub name: String,
}

/// GET /api/v1/books/popular
pub async fn popular_books(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<BooksResponse>, impl IntoResponse> {
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, 100);
    match state.catalog().list_popular(limit) {
        Ok(books) => Ok(Json(BooksResponse { books })),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )),
    }
}

/// GET /api/v1/books/genre/{genre}
pub async fn books_by_genre(
    State(state): State<Arc<AppState>>,
    Path(genre): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<BooksResponse>, impl IntoResponse> {
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, 100);
    match state.catalog().list_by_genre(&genre, limit) {
        Ok(books) => Ok(Json(BooksResponse { books })),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )),
    }
}

/// GET /api/v1/books/{id}
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<CatalogEntry>, impl IntoResponse> {
    match state.catalog().get(id) {
        Ok(book) => Ok(Json(book)),
        Err(CatalogError::NotFound(_)) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("book {} not found", id))),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )),
    }
}

/// POST /api/v1/books
///
/// Ingest a book (typically one picked from external search results) into
/// the catalog. Rows already known by ISBN or Google Books id are returned
/// as-is instead of being duplicated.
pub async fn add_book(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewBook>,
) -> Result<(StatusCode, Json<CatalogEntry>), impl IntoResponse> {
    if body.title.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("title is required")),
        ));
    }

    match state.catalog().insert(&body) {
        Ok(book) => Ok((StatusCode::CREATED, Json(book))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )),
    }
}

/// GET /api/v1/genres
pub async fn available_genres(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GenresResponse>, impl IntoResponse> {
    match state
        .catalog()
        .distinct_values(CatalogField::Genre, None, GENRE_LIST_LIMIT)
    {
        Ok(genres) => Ok(Json(GenresResponse {
            genres: genres
                .into_iter()
                .filter(|g| !g.is_empty())
                .map(|name| GenreEntry { name })
                .collect(),
        })),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )),
    }
}
