//! Combined search E2E tests with mocked external providers.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{fixtures, TestFixture};

#[tokio::test]
async fn test_search_local_only() {
    let fixture = TestFixture::new().await;
    fixture.seed_book(&fixtures::catalog_book(
        "Dune",
        "Frank Herbert",
        "Science Fiction",
    ));

    let response = fixture
        .post(
            "/api/v1/search",
            json!({"query": "dune", "include_external": false}),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["query"], "dune");
    assert_eq!(response.body["total_count"], 1);
    assert_eq!(response.body["local_books"][0]["title"], "Dune");
    assert_eq!(response.body["external_books"].as_array().unwrap().len(), 0);
    assert_eq!(response.body["has_more"], false);
}

#[tokio::test]
async fn test_search_rejects_short_query() {
    let fixture = TestFixture::new().await;

    let response = fixture.post("/api/v1/search", json!({"query": "d"})).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn test_search_fills_budget_with_external_results() {
    let fixture = TestFixture::new().await;
    fixture
        .google_books
        .set_results(vec![
            fixtures::external_book_from("Dune", "Frank Herbert", "google_books"),
            fixtures::external_book_from("Dune Messiah", "Frank Herbert", "google_books"),
        ])
        .await;
    fixture
        .open_library
        .set_results(vec![fixtures::external_book_from(
            "Children of Dune",
            "Frank Herbert",
            "open_library",
        )])
        .await;

    let response = fixture.post("/api/v1/search", json!({"query": "dune"})).await;

    assert_eq!(response.status, StatusCode::OK);
    let external = response.body["external_books"].as_array().unwrap();
    assert_eq!(external.len(), 3);
    assert_eq!(response.body["total_count"], 3);

    // Budget 20 over two providers: 10 each
    let searches = fixture.google_books.recorded_searches().await;
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].max_results, 10);
}

#[tokio::test]
async fn test_search_dedups_across_providers_preferring_google() {
    let fixture = TestFixture::new().await;
    fixture
        .google_books
        .set_results(vec![fixtures::external_book_from(
            "Dune",
            "Frank Herbert",
            "google_books",
        )])
        .await;
    fixture
        .open_library
        .set_results(vec![fixtures::external_book_from(
            "DUNE",
            "frank herbert",
            "open_library",
        )])
        .await;

    let response = fixture.post("/api/v1/search", json!({"query": "dune"})).await;

    let external = response.body["external_books"].as_array().unwrap();
    assert_eq!(external.len(), 1);
    assert_eq!(external[0]["source"], "google_books");
}

#[tokio::test]
async fn test_search_skips_external_when_local_fills_limit() {
    let fixture = TestFixture::new().await;
    fixture.seed_book(&fixtures::catalog_book("Dune", "Frank Herbert", "SF"));
    fixture.seed_book(&fixtures::catalog_book("Dune Messiah", "Frank Herbert", "SF"));
    fixture
        .google_books
        .set_results(vec![fixtures::external_book("Dune Online", "Someone")])
        .await;

    let response = fixture
        .post("/api/v1/search", json!({"query": "dune", "limit": 2}))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["local_books"].as_array().unwrap().len(), 2);
    assert_eq!(response.body["external_books"].as_array().unwrap().len(), 0);
    // Limit filled entirely from local results
    assert_eq!(response.body["has_more"], true);
    assert_eq!(fixture.google_books.search_count().await, 0);
}

#[tokio::test]
async fn test_search_sort_by_rating() {
    let fixture = TestFixture::new().await;
    let mut low = fixtures::catalog_book("Dune Fanfic", "Nobody", "SF");
    low.average_rating = 2.0;
    fixture.seed_book(&low);
    let mut high = fixtures::catalog_book("Dune", "Frank Herbert", "SF");
    high.average_rating = 4.8;
    fixture.seed_book(&high);

    let response = fixture
        .post(
            "/api/v1/search",
            json!({"query": "dune", "sort_by": "rating", "include_external": false}),
        )
        .await;

    assert_eq!(response.body["local_books"][0]["title"], "Dune");
}

#[tokio::test]
async fn test_suggestions() {
    let fixture = TestFixture::new().await;
    fixture.seed_book(&fixtures::catalog_book(
        "Dune",
        "Frank Herbert",
        "Science Fiction",
    ));

    let response = fixture.get("/api/v1/search/suggestions?q=dun").await;
    assert_eq!(response.status, StatusCode::OK);
    let suggestions = response.body["suggestions"].as_array().unwrap();
    assert!(suggestions.iter().any(|s| s == "Dune"));
}

#[tokio::test]
async fn test_suggestions_short_query_is_empty() {
    let fixture = TestFixture::new().await;
    fixture.seed_book(&fixtures::catalog_book("Dune", "Frank Herbert", "SF"));

    let response = fixture.get("/api/v1/search/suggestions?q=d").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["suggestions"].as_array().unwrap().len(), 0);
}
