//! Basic server wiring tests: health, config sanitization, metrics.

mod common;

use axum::http::StatusCode;

use common::TestFixture;

#[tokio::test]
async fn test_health_endpoint() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_config_endpoint_is_sanitized() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/config").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["server"]["port"].is_number());
    // No raw provider secrets in the body
    assert!(response.body.to_string().find("api_key\":").is_none());
}

#[tokio::test]
async fn test_metrics_endpoint_renders_prometheus_text() {
    let fixture = TestFixture::new().await;

    // Generate one request so the HTTP counters exist
    fixture.get("/api/v1/health").await;

    let (status, body) = fixture.get_text("/api/v1/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("bookmood_"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let fixture = TestFixture::new().await;
    let response = fixture.get("/api/v1/nonexistent").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
