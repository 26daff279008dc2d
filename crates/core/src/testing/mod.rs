//! Testing utilities and mock implementations.
//!
//! Provides a mock provider and fixture builders so search and
//! recommendation behavior can be tested without real infrastructure.
//! The SQLite stores have `in_memory()` constructors and need no mocks.

mod mock_provider;

pub use mock_provider::{MockProvider, RecordedProviderSearch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::NewBook;
    use crate::providers::ExternalBook;

    /// Create a catalog book with reasonable defaults.
    pub fn catalog_book(title: &str, author: &str, genre: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: author.to_string(),
            genre: genre.to_string(),
            published_year: 2010,
            description: String::new(),
            average_rating: 4.0,
            rating_count: 500,
            popularity_score: 50.0,
            ..NewBook::default()
        }
    }

    /// Create an external book record attributed to Google Books.
    pub fn external_book(title: &str, author: &str) -> ExternalBook {
        external_book_from(title, author, "google_books")
    }

    /// Create an external book record from a specific provider.
    pub fn external_book_from(title: &str, author: &str, source: &str) -> ExternalBook {
        ExternalBook {
            title: title.to_string(),
            author: author.to_string(),
            authors: vec![author.to_string()],
            description: String::new(),
            year: Some(2010),
            genre: "Fiction".to_string(),
            categories: vec!["Fiction".to_string()],
            page_count: Some(320),
            average_rating: Some(4.1),
            ratings_count: Some(800),
            cover_image_url: None,
            isbn: None,
            google_books_id: None,
            open_library_id: None,
            source: source.to_string(),
        }
    }
}
