//! Deduplication of external search results by (title, author).
//!
//! External providers have no shared identifier, so the case-insensitive
//! (title, author) pair is the dedup key. First occurrence wins, which
//! combined with pooling order gives earlier providers precedence.

use std::collections::HashSet;

use crate::providers::ExternalBook;

/// Remove duplicate external records, keeping the first occurrence of each
/// case-insensitive (title, author) pair. Input order is preserved.
pub fn dedup_external(books: Vec<ExternalBook>) -> Vec<ExternalBook> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    books
        .into_iter()
        .filter(|book| seen.insert((book.title.to_lowercase(), book.author.to_lowercase())))
        .collect()
}
