pub mod catalog;
pub mod config;
pub mod metrics;
pub mod providers;
pub mod recommend;
pub mod search;
pub mod testing;

pub use catalog::{
    BookCatalog, BookFilter, CandidateQuery, CatalogEntry, CatalogError, CatalogField, DepthBias,
    EnergyBias, EnergyLevel, NewBook, ReadingDepth, ReadingPace, SqliteCatalog,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DatabaseConfig,
    GoogleBooksConfig, OpenLibraryConfig, ProvidersConfig, SanitizedConfig, ServerConfig,
};
pub use providers::{
    BookProvider, ExternalBook, GoogleBooksClient, OpenLibraryClient, ProviderError,
};
pub use recommend::{
    MatchResult, MoodDepth, MoodEnergy, MoodQuery, MoodRecommendations, MoodRecommender,
    MoodSummary, MoodTag, NewRecommendation, RecommendationError, RecommendationFilter,
    RecommendationStore, SqliteRecommendationStore, UserRecommendation,
};
pub use search::{
    BookSearchService, CombinedSearchResult, SearchError, SearchFilters, SortMode,
};
