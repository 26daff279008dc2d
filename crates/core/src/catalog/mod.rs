//! Book catalog - the system of record for locally known books.
//!
//! The catalog answers structured queries (text predicate, mood candidate
//! predicate, distinct values); ranking and scoring happen in the search
//! and recommendation modules on top of it.

mod sqlite;
mod types;

pub use sqlite::SqliteCatalog;
pub use types::*;

/// Trait for book catalog storage.
pub trait BookCatalog: Send + Sync {
    /// Insert a book into the catalog.
    ///
    /// Deduplicates on ingest: if a row with the same ISBN or the same
    /// Google Books id already exists, that row is returned instead of
    /// creating a duplicate.
    fn insert(&self, book: &NewBook) -> Result<CatalogEntry, CatalogError>;

    /// Get a book by id.
    fn get(&self, id: i64) -> Result<CatalogEntry, CatalogError>;

    /// Text search: rows where title, author, description or genre contains
    /// the query (case-insensitive), intersected with the filter.
    ///
    /// Returns at most one row per book, in stable id order. No ranking.
    fn search_text(
        &self,
        query: &str,
        filter: &BookFilter,
    ) -> Result<Vec<CatalogEntry>, CatalogError>;

    /// Mood candidate retrieval: conjunctive genre/energy/depth predicate,
    /// ordered by average_rating DESC then rating_count DESC, capped at
    /// `query.limit`.
    fn find_candidates(&self, query: &CandidateQuery) -> Result<Vec<CatalogEntry>, CatalogError>;

    /// Most popular books (popularity_score DESC, average_rating DESC).
    fn list_popular(&self, limit: u32) -> Result<Vec<CatalogEntry>, CatalogError>;

    /// Books whose genre contains the given value, popularity_score DESC.
    fn list_by_genre(&self, genre: &str, limit: u32) -> Result<Vec<CatalogEntry>, CatalogError>;

    /// Distinct values of a field, optionally narrowed to values containing
    /// a substring (case-insensitive). Used for suggestion lookups.
    fn distinct_values(
        &self,
        field: CatalogField,
        contains: Option<&str>,
        limit: u32,
    ) -> Result<Vec<String>, CatalogError>;

    /// Total number of catalog rows.
    fn count(&self) -> Result<u64, CatalogError>;
}
