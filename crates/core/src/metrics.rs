//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Search (local catalog and external providers)
//! - External provider calls and failures
//! - Recommendation scoring and persistence

use once_cell::sync::Lazy;
use prometheus::{
    core::Collector, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts,
};

// =============================================================================
// Search
// =============================================================================

/// Searches executed, by source ("local" or "external").
pub static SEARCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("bookmood_searches_total", "Total searches executed"),
        &["source"],
    )
    .unwrap()
});

/// Combined search duration in seconds.
pub static SEARCH_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "bookmood_search_duration_seconds",
            "Duration of combined searches",
        )
        .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0]),
    )
    .unwrap()
});

// =============================================================================
// External providers
// =============================================================================

/// Provider search requests by provider name.
pub static PROVIDER_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "bookmood_provider_requests_total",
            "Total external provider search requests",
        ),
        &["provider"],
    )
    .unwrap()
});

/// Provider failures (transport, status, parse) by provider name.
///
/// Failures are swallowed into empty result sets, so this counter is the
/// only place they remain visible.
pub static PROVIDER_ERRORS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "bookmood_provider_errors_total",
            "Total external provider failures (degraded to empty results)",
        ),
        &["provider"],
    )
    .unwrap()
});

// =============================================================================
// Recommendations
// =============================================================================

/// Mood recommendation requests.
pub static RECOMMENDATION_REQUESTS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "bookmood_recommendation_requests_total",
        "Total mood recommendation requests",
    )
    .unwrap()
});

/// Candidates retrieved per recommendation request (after fallback).
pub static CANDIDATES_FOUND: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "bookmood_candidates_found",
            "Number of candidates retrieved per recommendation request",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0]),
        &[],
    )
    .unwrap()
});

/// Recommendations persisted (upserted) successfully.
pub static RECOMMENDATIONS_PERSISTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "bookmood_recommendations_persisted_total",
        "Total recommendation rows upserted",
    )
    .unwrap()
});

/// Recommendation upsert failures (best-effort loop continues past these).
pub static RECOMMENDATION_UPSERT_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "bookmood_recommendation_upsert_failures_total",
        "Total failed recommendation upserts",
    )
    .unwrap()
});

/// All core metrics, for registration into a server-side registry.
pub fn all_metrics() -> Vec<Box<dyn Collector>> {
    vec![
        Box::new(SEARCHES_TOTAL.clone()),
        Box::new(SEARCH_DURATION.clone()),
        Box::new(PROVIDER_REQUESTS.clone()),
        Box::new(PROVIDER_ERRORS.clone()),
        Box::new(RECOMMENDATION_REQUESTS.clone()),
        Box::new(CANDIDATES_FOUND.clone()),
        Box::new(RECOMMENDATIONS_PERSISTED.clone()),
        Box::new(RECOMMENDATION_UPSERT_FAILURES.clone()),
    ]
}
