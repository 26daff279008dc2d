use std::sync::Arc;

use bookmood_core::{
    BookCatalog, BookSearchService, Config, MoodRecommender, RecommendationStore, SanitizedConfig,
};

/// Shared application state
pub struct AppState {
    config: Config,
    catalog: Arc<dyn BookCatalog>,
    search: Arc<BookSearchService>,
    recommender: Arc<MoodRecommender>,
    recommendations: Arc<dyn RecommendationStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: Arc<dyn BookCatalog>,
        search: Arc<BookSearchService>,
        recommender: Arc<MoodRecommender>,
        recommendations: Arc<dyn RecommendationStore>,
    ) -> Self {
        Self {
            config,
            catalog,
            search,
            recommender,
            recommendations,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn catalog(&self) -> &dyn BookCatalog {
        self.catalog.as_ref()
    }

    pub fn search(&self) -> &BookSearchService {
        self.search.as_ref()
    }

    pub fn recommender(&self) -> &MoodRecommender {
        self.recommender.as_ref()
    }

    pub fn recommendations(&self) -> &dyn RecommendationStore {
        self.recommendations.as_ref()
    }
}
