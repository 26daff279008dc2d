//! Common test utilities for E2E testing with mocks.
//!
//! Provides a test fixture that builds the real router in-process with
//! in-memory stores and mock providers, so the full HTTP surface can be
//! exercised without external infrastructure.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use bookmood_core::testing::MockProvider;
use bookmood_core::{
    BookCatalog, BookProvider, BookSearchService, Config, DatabaseConfig, MoodRecommender,
    NewBook, ServerConfig, SqliteCatalog, SqliteRecommendationStore,
};

/// Re-export fixtures for test convenience
pub use bookmood_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new().await;
/// let response = fixture.post("/api/v1/search", json!({"query": "dune"})).await;
/// assert_eq!(response.status, StatusCode::OK);
/// ```
pub struct TestFixture {
    /// The Axum router for in-process requests
    pub router: Router,
    /// Mock Google Books provider
    pub google_books: Arc<MockProvider>,
    /// Mock Open Library provider
    pub open_library: Arc<MockProvider>,
    /// The in-memory catalog, for seeding
    pub catalog: Arc<SqliteCatalog>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with an empty catalog and default mocks.
    pub async fn new() -> Self {
        let catalog = Arc::new(SqliteCatalog::in_memory().expect("Failed to create catalog"));
        let recommendations = Arc::new(
            SqliteRecommendationStore::in_memory().expect("Failed to create recommendation store"),
        );

        let google_books = Arc::new(MockProvider::new("google_books"));
        let open_library = Arc::new(MockProvider::new("open_library"));
        let providers: Vec<Arc<dyn BookProvider>> = vec![
            Arc::clone(&google_books) as Arc<dyn BookProvider>,
            Arc::clone(&open_library) as Arc<dyn BookProvider>,
        ];

        let config = Config {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            providers: None,
        };

        let search = Arc::new(BookSearchService::new(
            Arc::clone(&catalog) as Arc<dyn BookCatalog>,
            providers,
        ));
        let recommender = Arc::new(MoodRecommender::new(
            Arc::clone(&catalog) as Arc<dyn BookCatalog>,
            Arc::clone(&recommendations) as Arc<dyn bookmood_core::RecommendationStore>,
        ));

        let state = Arc::new(bookmood_server::state::AppState::new(
            config,
            Arc::clone(&catalog) as Arc<dyn BookCatalog>,
            search,
            recommender,
            recommendations,
        ));

        let router = bookmood_server::api::create_router(state);

        Self {
            router,
            google_books,
            open_library,
            catalog,
        }
    }

    /// Seed a book into the catalog.
    pub fn seed_book(&self, book: &NewBook) -> i64 {
        self.catalog.insert(book).expect("Failed to seed book").id
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a GET request and return the raw body text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&body_bytes).to_string())
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let request = match body {
            Some(json) => {
                request_builder = request_builder.header("Content-Type", "application/json");
                request_builder
                    .body(Body::from(json.to_string()))
                    .unwrap()
            }
            None => request_builder.body(Body::empty()).unwrap(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
