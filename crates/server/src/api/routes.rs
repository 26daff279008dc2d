use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{books, handlers, recommendations, search};
use crate::metrics;
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::get_metrics))
        // Search
        .route("/search", post(search::search))
        .route("/search/suggestions", get(search::suggestions))
        // Catalog
        .route("/books", post(books::add_book))
        .route("/books/popular", get(books::popular_books))
        .route("/books/genre/{genre}", get(books::books_by_genre))
        .route("/books/{id}", get(books::get_book))
        .route("/genres", get(books::available_genres))
        // Mood recommendations
        .route(
            "/recommendations",
            get(recommendations::list_recommendations),
        )
        .route(
            "/recommendations/mood",
            post(recommendations::mood_recommendations),
        )
        .route(
            "/recommendations/saved",
            get(recommendations::saved_recommendations),
        )
        .route(
            "/recommendations/{id}/dismiss",
            post(recommendations::dismiss_recommendation),
        )
        .route(
            "/recommendations/{id}/save",
            post(recommendations::save_recommendation),
        )
        .route(
            "/recommendations/{id}/viewed",
            post(recommendations::mark_recommendation_viewed),
        )
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(metrics::track_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
