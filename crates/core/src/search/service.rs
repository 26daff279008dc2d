//! Combined local + external book search.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tracing::debug;

use crate::catalog::{BookCatalog, CatalogEntry, CatalogField};
use crate::metrics;
use crate::providers::{BookProvider, ExternalBook};

use super::dedup::dedup_external;
use super::relevance::rank;
use super::{CombinedSearchResult, SearchError, SearchFilters, MIN_QUERY_LEN};

const TITLE_SUGGESTIONS: u32 = 3;
const AUTHOR_SUGGESTIONS: u32 = 3;
const GENRE_SUGGESTIONS: u32 = 2;
const MAX_SUGGESTIONS: usize = 8;

/// Book search orchestrator.
///
/// Local catalog results come first; external providers are only consulted
/// when the local results leave budget unfilled.
pub struct BookSearchService {
    catalog: Arc<dyn BookCatalog>,
    providers: Vec<Arc<dyn BookProvider>>,
}

impl BookSearchService {
    /// Create a new search service. Provider order matters: earlier
    /// providers win deduplication ties.
    pub fn new(catalog: Arc<dyn BookCatalog>, providers: Vec<Arc<dyn BookProvider>>) -> Self {
        Self { catalog, providers }
    }

    /// Search the local catalog, ranked per the filter's sort mode and
    /// truncated to its limit.
    ///
    /// A trimmed query shorter than 2 characters yields an empty result,
    /// not an error.
    pub fn search_local(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<Vec<CatalogEntry>, SearchError> {
        let query = query.trim();
        if query.len() < MIN_QUERY_LEN {
            return Ok(Vec::new());
        }

        metrics::SEARCHES_TOTAL.with_label_values(&["local"]).inc();

        let matches = self.catalog.search_text(query, &filters.as_book_filter())?;
        let ranked = rank(matches, query, filters.sort);
        Ok(ranked
            .into_iter()
            .take(filters.effective_limit() as usize)
            .collect())
    }

    /// Search all configured providers and pool the results.
    ///
    /// Each provider gets an equal share of the budget (for the usual two
    /// providers, `max_results / 2` each); no rebalancing happens when one
    /// provider under-returns. The pooled list is deduplicated by
    /// case-insensitive (title, author) and truncated to `max_results`.
    pub async fn search_external(&self, query: &str, max_results: u32) -> Vec<ExternalBook> {
        if self.providers.is_empty() || max_results == 0 {
            return Vec::new();
        }

        metrics::SEARCHES_TOTAL
            .with_label_values(&["external"])
            .inc();

        let share = max_results / self.providers.len() as u32;
        let searches = self
            .providers
            .iter()
            .map(|provider| provider.search(query, share));

        // The provider calls are independent; join_all keeps provider order
        // in the pooled output, which drives dedup precedence.
        let pooled: Vec<ExternalBook> = join_all(searches).await.into_iter().flatten().collect();

        debug!(
            query = query,
            pooled = pooled.len(),
            budget = max_results,
            "External search pooled"
        );

        dedup_external(pooled)
            .into_iter()
            .take(max_results as usize)
            .collect()
    }

    /// Combined local + external search.
    ///
    /// External providers are only queried when `include_external` is set
    /// AND the local results did not fill the limit; their budget is
    /// exactly the unfilled remainder.
    pub async fn combined_search(
        &self,
        query: &str,
        filters: &SearchFilters,
        include_external: bool,
    ) -> Result<CombinedSearchResult, SearchError> {
        let started = Instant::now();
        let limit = filters.effective_limit() as usize;

        let local_books = self.search_local(query, filters)?;
        let mut total_count = local_books.len();

        let external_books = if include_external && total_count < limit {
            let budget = (limit - total_count) as u32;
            let external = self.search_external(query.trim(), budget).await;
            total_count += external.len();
            external
        } else {
            Vec::new()
        };

        metrics::SEARCH_DURATION.observe(started.elapsed().as_secs_f64());

        Ok(CombinedSearchResult {
            local_books,
            external_books,
            total_count,
        })
    }

    /// Search suggestions: up to 3 title matches, 3 author matches and
    /// 2 genre matches, deduplicated in that order, capped at 8.
    pub fn suggestions(&self, query: &str) -> Result<Vec<String>, SearchError> {
        let query = query.trim();
        if query.len() < MIN_QUERY_LEN {
            return Ok(Vec::new());
        }

        let mut suggestions = Vec::new();
        suggestions.extend(self.catalog.distinct_values(
            CatalogField::Title,
            Some(query),
            TITLE_SUGGESTIONS,
        )?);
        suggestions.extend(self.catalog.distinct_values(
            CatalogField::Author,
            Some(query),
            AUTHOR_SUGGESTIONS,
        )?);
        suggestions.extend(self.catalog.distinct_values(
            CatalogField::Genre,
            Some(query),
            GENRE_SUGGESTIONS,
        )?);

        let mut seen = std::collections::HashSet::new();
        Ok(suggestions
            .into_iter()
            .filter(|s| seen.insert(s.clone()))
            .take(MAX_SUGGESTIONS)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{NewBook, SqliteCatalog};
    use crate::search::SortMode;
    use crate::testing::{fixtures, MockProvider};

    fn seeded_catalog(books: &[NewBook]) -> Arc<SqliteCatalog> {
        let catalog = SqliteCatalog::in_memory().unwrap();
        for book in books {
            catalog.insert(book).unwrap();
        }
        Arc::new(catalog)
    }

    fn book(title: &str, author: &str, genre: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: author.to_string(),
            genre: genre.to_string(),
            published_year: 2000,
            average_rating: 4.0,
            rating_count: 100,
            popularity_score: 10.0,
            ..NewBook::default()
        }
    }

    #[tokio::test]
    async fn test_short_query_returns_empty() {
        let service = BookSearchService::new(seeded_catalog(&[book("Dune", "H", "SF")]), vec![]);
        let result = service
            .combined_search("d", &SearchFilters::default(), true)
            .await
            .unwrap();
        assert!(result.local_books.is_empty());
        assert_eq!(result.total_count, 0);
    }

    #[tokio::test]
    async fn test_local_results_fill_limit_skips_external() {
        let books: Vec<NewBook> = (0..3)
            .map(|i| book(&format!("Dune {}", i), "Frank Herbert", "SF"))
            .collect();
        let provider = Arc::new(MockProvider::new("google_books"));
        provider
            .set_results(vec![fixtures::external_book("Dune Online", "Someone")])
            .await;

        let service =
            BookSearchService::new(seeded_catalog(&books), vec![provider.clone()]);

        let filters = SearchFilters {
            limit: 3,
            ..SearchFilters::default()
        };
        let result = service.combined_search("dune", &filters, true).await.unwrap();

        assert_eq!(result.local_books.len(), 3);
        assert!(result.external_books.is_empty());
        // External providers were never consulted
        assert_eq!(provider.search_count().await, 0);
    }

    #[tokio::test]
    async fn test_external_budget_is_remainder() {
        let provider_a = Arc::new(MockProvider::new("google_books"));
        let provider_b = Arc::new(MockProvider::new("open_library"));
        let service = BookSearchService::new(
            seeded_catalog(&[book("Dune", "Frank Herbert", "SF")]),
            vec![provider_a.clone(), provider_b.clone()],
        );

        let filters = SearchFilters {
            limit: 11,
            ..SearchFilters::default()
        };
        service.combined_search("dune", &filters, true).await.unwrap();

        // 1 local result, budget 10, two providers -> 5 each
        let searches = provider_a.recorded_searches().await;
        assert_eq!(searches.len(), 1);
        assert_eq!(searches[0].max_results, 5);
        let searches = provider_b.recorded_searches().await;
        assert_eq!(searches[0].max_results, 5);
    }

    #[tokio::test]
    async fn test_include_external_false_skips_providers() {
        let provider = Arc::new(MockProvider::new("google_books"));
        let service =
            BookSearchService::new(seeded_catalog(&[]), vec![provider.clone()]);

        let result = service
            .combined_search("dune", &SearchFilters::default(), false)
            .await
            .unwrap();

        assert_eq!(result.total_count, 0);
        assert_eq!(provider.search_count().await, 0);
    }

    #[tokio::test]
    async fn test_external_dedup_prefers_first_provider() {
        let provider_a = Arc::new(MockProvider::new("google_books"));
        provider_a
            .set_results(vec![fixtures::external_book_from(
                "Dune",
                "Frank Herbert",
                "google_books",
            )])
            .await;
        let provider_b = Arc::new(MockProvider::new("open_library"));
        provider_b
            .set_results(vec![
                fixtures::external_book_from("DUNE", "frank herbert", "open_library"),
                fixtures::external_book_from("Dune Messiah", "Frank Herbert", "open_library"),
            ])
            .await;

        let service = BookSearchService::new(
            seeded_catalog(&[]),
            vec![provider_a, provider_b],
        );

        let results = service.search_external("dune", 10).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].source, "google_books");
        assert_eq!(results[1].title, "Dune Messiah");
    }

    #[tokio::test]
    async fn test_provider_failure_degrades_to_local_results() {
        let provider = Arc::new(MockProvider::new("google_books"));
        provider.fail_next().await;

        let service = BookSearchService::new(
            seeded_catalog(&[book("Dune", "Frank Herbert", "SF")]),
            vec![provider],
        );

        let result = service
            .combined_search("dune", &SearchFilters::default(), true)
            .await
            .unwrap();

        assert_eq!(result.local_books.len(), 1);
        assert!(result.external_books.is_empty());
        assert_eq!(result.total_count, 1);
    }

    #[tokio::test]
    async fn test_local_ranking_respects_sort_mode() {
        let mut a = book("Alpha", "X", "Fiction");
        a.popularity_score = 1.0;
        let mut b = book("Beta", "Y", "Fiction");
        b.popularity_score = 99.0;

        let service = BookSearchService::new(seeded_catalog(&[a, b]), vec![]);

        let filters = SearchFilters {
            sort: SortMode::Popularity,
            ..SearchFilters::default()
        };
        let results = service.search_local("fiction", &filters).unwrap();
        assert_eq!(results[0].title, "Beta");
    }

    #[tokio::test]
    async fn test_suggestions() {
        let service = BookSearchService::new(
            seeded_catalog(&[
                book("Dune", "Frank Herbert", "Science Fiction"),
                book("Dune Messiah", "Frank Herbert", "Science Fiction"),
            ]),
            vec![],
        );

        let suggestions = service.suggestions("dune").unwrap();
        assert!(suggestions.contains(&"Dune".to_string()));
        assert!(suggestions.contains(&"Dune Messiah".to_string()));
        assert!(suggestions.len() <= 8);

        // Short query yields nothing
        assert!(service.suggestions("d").unwrap().is_empty());
    }
}
