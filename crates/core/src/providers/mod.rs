//! External book-metadata providers (Google Books and Open Library).
//!
//! Providers are fire-and-degrade: a transport failure, a non-success
//! status or a malformed payload becomes an empty result set plus a log
//! event, never an error for the caller. Individual records that fail
//! normalization are dropped without aborting the batch.

mod google_books;
mod open_library;
mod types;

pub use google_books::GoogleBooksClient;
pub use open_library::OpenLibraryClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors inside a provider client. These never cross the `BookProvider`
/// boundary; the trait impls degrade them to empty results.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned an error status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Trait for external book search providers.
#[async_trait]
pub trait BookProvider: Send + Sync {
    /// Provider name for logging and metrics.
    fn name(&self) -> &str;

    /// Search the provider for books matching the query.
    ///
    /// Must never fail: any transport or parse error is logged and an
    /// empty vec is returned instead.
    async fn search(&self, query: &str, max_results: u32) -> Vec<ExternalBook>;
}
