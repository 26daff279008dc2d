//! Book search: local relevance ranking plus combined external search.
//!
//! `BookSearchService` is the orchestrator; it takes the catalog and the
//! provider list as constructor arguments so tests can substitute both.

mod dedup;
mod relevance;
mod service;
mod types;

pub use dedup::dedup_external;
pub use relevance::{rank, relevance_score};
pub use service::BookSearchService;
pub use types::*;
