//! Relevance scoring and ordering for local search results.
//!
//! The catalog returns matching rows in stable id order; this module turns
//! them into a ranked list for the requested sort mode. Equal keys keep
//! their retrieval order (all sorts here are stable).

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::catalog::CatalogEntry;

use super::SortMode;

/// Composite relevance score for a catalog entry against a lowercased query.
///
/// Base tier by match strength (exact title 100, title 80, author 60,
/// genre 40, description-only 20) plus a popularity/rating bonus.
pub fn relevance_score(entry: &CatalogEntry, query_lower: &str) -> f64 {
    let title = entry.title.to_lowercase();
    let author = entry.author.to_lowercase();
    let genre = entry.genre.to_lowercase();

    let base = if title == query_lower {
        100.0
    } else if title.contains(query_lower) {
        80.0
    } else if author.contains(query_lower) {
        60.0
    } else if genre.contains(query_lower) {
        40.0
    } else {
        // Matched via description only
        20.0
    };

    base + entry.popularity_score * 0.1 + entry.average_rating * 2.0
}

/// Order entries for the given sort mode.
///
/// Dedups by catalog id first (first occurrence wins), so the output has at
/// most one row per book regardless of how many predicate clauses matched.
pub fn rank(entries: Vec<CatalogEntry>, query: &str, sort: SortMode) -> Vec<CatalogEntry> {
    let mut seen = HashSet::new();
    let mut unique: Vec<CatalogEntry> = entries
        .into_iter()
        .filter(|e| seen.insert(e.id))
        .collect();

    match sort {
        SortMode::Relevance => {
            let query_lower = query.trim().to_lowercase();
            let mut scored: Vec<(f64, CatalogEntry)> = unique
                .into_iter()
                .map(|e| (relevance_score(&e, &query_lower), e))
                .collect();
            scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
            scored.into_iter().map(|(_, e)| e).collect()
        }
        SortMode::Popularity => {
            unique.sort_by(|a, b| {
                b.popularity_score
                    .partial_cmp(&a.popularity_score)
                    .unwrap_or(Ordering::Equal)
                    .then(
                        b.average_rating
                            .partial_cmp(&a.average_rating)
                            .unwrap_or(Ordering::Equal),
                    )
            });
            unique
        }
        SortMode::Rating => {
            unique.sort_by(|a, b| {
                b.average_rating
                    .partial_cmp(&a.average_rating)
                    .unwrap_or(Ordering::Equal)
                    .then(b.rating_count.cmp(&a.rating_count))
            });
            unique
        }
        SortMode::Newest => {
            unique.sort_by(|a, b| b.published_year.cmp(&a.published_year));
            unique
        }
        SortMode::Oldest => {
            unique.sort_by(|a, b| a.published_year.cmp(&b.published_year));
            unique
        }
        SortMode::Title => {
            unique.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
            unique
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(id: i64, title: &str, author: &str, genre: &str) -> CatalogEntry {
        CatalogEntry {
            id,
            title: title.to_string(),
            author: author.to_string(),
            isbn: None,
            description: String::new(),
            genre: genre.to_string(),
            published_year: 2000,
            page_count: None,
            cover_image_url: None,
            google_books_id: None,
            open_library_id: None,
            average_rating: 0.0,
            rating_count: 0,
            popularity_score: 0.0,
            energy_level: None,
            reading_depth: None,
            reading_pace: None,
            theme_tags: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_relevance_tiers() {
        let exact = entry(1, "Dune", "Frank Herbert", "Science Fiction");
        let title_contains = entry(2, "Dune Messiah", "Frank Herbert", "Science Fiction");
        let author_match = entry(3, "Other", "Mr Dunewalker", "Fiction");
        let genre_match = entry(4, "Other", "Other", "dune fiction");
        let description_only = entry(5, "Other", "Other", "Fiction");

        assert_eq!(relevance_score(&exact, "dune"), 100.0);
        assert_eq!(relevance_score(&title_contains, "dune"), 80.0);
        assert_eq!(relevance_score(&author_match, "dune"), 60.0);
        assert_eq!(relevance_score(&genre_match, "dune"), 40.0);
        assert_eq!(relevance_score(&description_only, "dune"), 20.0);
    }

    #[test]
    fn test_relevance_popularity_and_rating_bonus() {
        // Exact title, popularity 87, rating 4.6: 100 + 8.7 + 9.2 = 117.9
        let mut dune = entry(1, "Dune", "Frank Herbert", "Science Fiction");
        dune.popularity_score = 87.0;
        dune.average_rating = 4.6;
        let score = relevance_score(&dune, "dune");
        assert!((score - 117.9).abs() < 1e-9);
    }

    #[test]
    fn test_exact_title_outranks_author_match() {
        let mut dune = entry(1, "Dune", "Frank Herbert", "Science Fiction");
        dune.popularity_score = 87.0;
        dune.average_rating = 4.6;
        let mut author_only = entry(2, "Sand Planet", "Duncan Dune", "Fiction");
        author_only.popularity_score = 100.0;
        author_only.average_rating = 5.0;

        let ranked = rank(vec![author_only, dune], "dune", SortMode::Relevance);
        assert_eq!(ranked[0].title, "Dune");
    }

    #[test]
    fn test_rank_dedups_by_id() {
        let a = entry(1, "Dune", "Frank Herbert", "Science Fiction");
        let duplicate = a.clone();
        let ranked = rank(vec![a, duplicate], "dune", SortMode::Relevance);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_rank_by_popularity() {
        let mut a = entry(1, "A", "X", "Fiction");
        a.popularity_score = 10.0;
        let mut b = entry(2, "B", "Y", "Fiction");
        b.popularity_score = 90.0;

        let ranked = rank(vec![a, b], "", SortMode::Popularity);
        assert_eq!(ranked[0].title, "B");
    }

    #[test]
    fn test_rank_by_rating_breaks_ties_with_count() {
        let mut a = entry(1, "A", "X", "Fiction");
        a.average_rating = 4.5;
        a.rating_count = 10;
        let mut b = entry(2, "B", "Y", "Fiction");
        b.average_rating = 4.5;
        b.rating_count = 1000;

        let ranked = rank(vec![a, b], "", SortMode::Rating);
        assert_eq!(ranked[0].title, "B");
    }

    #[test]
    fn test_rank_by_year() {
        let mut old = entry(1, "Old", "X", "Fiction");
        old.published_year = 1950;
        let mut new = entry(2, "New", "Y", "Fiction");
        new.published_year = 2020;

        let newest = rank(vec![old.clone(), new.clone()], "", SortMode::Newest);
        assert_eq!(newest[0].title, "New");

        let oldest = rank(vec![old, new], "", SortMode::Oldest);
        assert_eq!(oldest[0].title, "Old");
    }

    #[test]
    fn test_rank_by_title_case_insensitive() {
        let a = entry(1, "zebra", "X", "Fiction");
        let b = entry(2, "Apple", "Y", "Fiction");

        let ranked = rank(vec![a, b], "", SortMode::Title);
        assert_eq!(ranked[0].title, "Apple");
    }

    #[test]
    fn test_rank_ties_keep_retrieval_order() {
        let a = entry(1, "Same Score A", "X", "Fiction");
        let b = entry(2, "Same Score B", "Y", "Fiction");

        let ranked = rank(vec![a, b], "nomatch", SortMode::Relevance);
        assert_eq!(ranked[0].id, 1);
        assert_eq!(ranked[1].id, 2);
    }
}
