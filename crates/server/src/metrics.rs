//! Prometheus registry and HTTP-level metrics for the server.

use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use once_cell::sync::Lazy;
use prometheus::{
    HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

use crate::state::AppState;

/// Global metrics registry holding server and core metrics.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request counts by method and status.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("bookmood_http_requests_total", "Total HTTP requests"),
        &["method", "status"],
    )
    .unwrap()
});

/// HTTP request duration in seconds by method.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "bookmood_http_request_duration_seconds",
            "HTTP request duration",
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        &["method"],
    )
    .unwrap()
});

/// Current number of catalog rows.
pub static CATALOG_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("bookmood_catalog_entries", "Number of books in the catalog").unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(CATALOG_ENTRIES.clone()))
        .unwrap();

    // Core metrics (search, providers, recommendations)
    for metric in bookmood_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}

/// Refresh gauges that reflect current application state.
pub fn collect_dynamic_metrics(state: &AppState) {
    if let Ok(count) = state.catalog().count() {
        CATALOG_ENTRIES.set(count as i64);
    }
}

/// Axum middleware recording per-request counters and durations.
pub async fn track_metrics(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method.as_str(), &status])
        .inc();
    HTTP_REQUEST_DURATION
        .with_label_values(&[method.as_str()])
        .observe(started.elapsed().as_secs_f64());

    response
}
