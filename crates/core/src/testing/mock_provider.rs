//! Mock book provider for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::providers::{BookProvider, ExternalBook};

/// A recorded provider search for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedProviderSearch {
    /// The query string that was searched.
    pub query: String,
    /// The budget the provider was invoked with.
    pub max_results: u32,
}

/// Mock implementation of the `BookProvider` trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable search results
/// - Track searches for assertions
/// - Simulate a failed provider (empty results, like the real contract)
///
/// # Example
///
/// ```rust,ignore
/// use bookmood_core::testing::{fixtures, MockProvider};
///
/// let provider = MockProvider::new("google_books");
/// provider.set_results(vec![
///     fixtures::external_book("Dune", "Frank Herbert"),
/// ]).await;
///
/// let results = provider.search("dune", 10).await;
/// assert_eq!(results.len(), 1);
/// assert_eq!(provider.search_count().await, 1);
/// ```
pub struct MockProvider {
    name: String,
    /// Configured results to return.
    results: Arc<RwLock<Vec<ExternalBook>>>,
    /// Recorded searches.
    searches: Arc<RwLock<Vec<RecordedProviderSearch>>>,
    /// If set, the next search behaves like a failed provider.
    fail_next: Arc<RwLock<bool>>,
}

impl MockProvider {
    /// Create a new mock provider with empty results.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            results: Arc::new(RwLock::new(Vec::new())),
            searches: Arc::new(RwLock::new(Vec::new())),
            fail_next: Arc::new(RwLock::new(false)),
        }
    }

    /// Set the results to return for subsequent searches.
    pub async fn set_results(&self, results: Vec<ExternalBook>) {
        *self.results.write().await = results;
    }

    /// Add a single result.
    pub async fn add_result(&self, result: ExternalBook) {
        self.results.write().await.push(result);
    }

    /// Get recorded searches.
    pub async fn recorded_searches(&self) -> Vec<RecordedProviderSearch> {
        self.searches.read().await.clone()
    }

    /// Number of searches performed.
    pub async fn search_count(&self) -> usize {
        self.searches.read().await.len()
    }

    /// Make the next search behave like a failed provider: it returns an
    /// empty result set, matching the real never-raise contract.
    pub async fn fail_next(&self) {
        *self.fail_next.write().await = true;
    }
}

#[async_trait]
impl BookProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &str, max_results: u32) -> Vec<ExternalBook> {
        self.searches.write().await.push(RecordedProviderSearch {
            query: query.to_string(),
            max_results,
        });

        let mut fail = self.fail_next.write().await;
        if *fail {
            *fail = false;
            return Vec::new();
        }
        drop(fail);

        self.results
            .read()
            .await
            .iter()
            .take(max_results as usize)
            .cloned()
            .collect()
    }
}
