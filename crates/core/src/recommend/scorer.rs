//! Mood match scoring and recommendation assembly.
//!
//! The rubric is a pure function over a catalog entry and the quiz; the
//! recommender wires it to candidate retrieval, ranking and persistence.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::{
    BookCatalog, CandidateQuery, CatalogEntry, DepthBias, EnergyBias, EnergyLevel, ReadingDepth,
    ReadingPace,
};
use crate::metrics;

use super::mappings::{build_mood_summary, category_terms, genre_label};
use super::store::RecommendationStore;
use super::types::{
    MatchResult, MoodDepth, MoodEnergy, MoodQuery, MoodRecommendations, NewRecommendation,
    RecommendationError,
};

/// Default number of recommendations returned.
pub const DEFAULT_LIMIT: u32 = 15;

/// Display percentage bounds; the raw score stays unbounded for ranking.
const MIN_PERCENTAGE: i64 = 60;
const MAX_PERCENTAGE: i64 = 95;

/// Light reads are under this page count, for both the depth match and the
/// alignment bonus.
const LIGHT_PAGE_LIMIT: u32 = 300;
/// Deep reads are above this page count.
const DEEP_PAGE_LIMIT: u32 = 400;
/// Tag thresholds.
const QUICK_READ_PAGES: u32 = 250;
const EPIC_PAGES: u32 = 500;

/// Score a candidate against the quiz.
///
/// Returns the accumulated score and at most two reasons, in accumulation
/// order (the order decides which reasons survive truncation).
pub fn score_book(entry: &CatalogEntry, query: &MoodQuery) -> (i64, Vec<String>) {
    let mut score = 0i64;
    let mut reasons: Vec<String> = Vec::new();

    if entry.average_rating >= 4.0 {
        score += 15;
        reasons.push("Highly rated".to_string());
    } else if entry.average_rating >= 3.5 {
        score += 10;
    }

    match query.energy {
        MoodEnergy::High => {
            if entry.energy_level == Some(EnergyLevel::High)
                || entry.reading_pace == Some(ReadingPace::Fast)
            {
                score += 20;
                reasons.push("High-energy adventure".to_string());
            }
        }
        MoodEnergy::Low => {
            if entry.energy_level == Some(EnergyLevel::Low)
                || entry.reading_pace == Some(ReadingPace::Slow)
            {
                score += 20;
                reasons.push("Calm and relaxing".to_string());
            }
        }
        MoodEnergy::Medium => {
            score += 15;
        }
    }

    match query.depth {
        MoodDepth::Light => {
            if entry.reading_depth == Some(ReadingDepth::Light)
                || entry.page_count.is_some_and(|p| p < LIGHT_PAGE_LIMIT)
            {
                score += 15;
                reasons.push("Quick, easy read".to_string());
            }
        }
        MoodDepth::Deep => {
            if entry.reading_depth == Some(ReadingDepth::Deep)
                || entry.page_count.is_some_and(|p| p > DEEP_PAGE_LIMIT)
            {
                score += 15;
                reasons.push("Deep and complex".to_string());
            }
        }
        MoodDepth::Medium => {
            score += 10;
        }
    }

    if entry.rating_count > 1000 {
        score += 10;
        reasons.push("Popular choice".to_string());
    } else if entry.rating_count > 100 {
        score += 5;
    }

    // Page-count alignment bonus stacks with the depth match above.
    if let Some(pages) = entry.page_count {
        match query.depth {
            MoodDepth::Light if pages < LIGHT_PAGE_LIMIT => score += 5,
            MoodDepth::Deep if pages > DEEP_PAGE_LIMIT => score += 5,
            _ => {}
        }
    }

    if entry.description.len() > 200 {
        score += 5;
    }

    reasons.truncate(2);
    (score, reasons)
}

/// Display tags for a scored candidate, in fixed priority order:
/// genre, energy, depth, page-count. Capped at three, so lower-priority
/// tags drop off when the earlier ones fill the quota.
pub fn mood_tags(entry: &CatalogEntry, query: &MoodQuery) -> Vec<String> {
    let mut tags = vec![genre_label(&query.genre)];

    match query.energy {
        MoodEnergy::High => tags.push("Fast-paced".to_string()),
        MoodEnergy::Low => tags.push("Relaxing".to_string()),
        MoodEnergy::Medium => {}
    }

    match query.depth {
        MoodDepth::Light => tags.push("Easy Read".to_string()),
        MoodDepth::Deep => tags.push("Complex".to_string()),
        MoodDepth::Medium => {}
    }

    if let Some(pages) = entry.page_count {
        if pages < QUICK_READ_PAGES {
            tags.push("Quick Read".to_string());
        } else if pages > EPIC_PAGES {
            tags.push("Epic".to_string());
        }
    }

    tags.truncate(3);
    tags
}

/// Clamp a raw score into the display percentage range.
pub fn clamp_percentage(score: i64) -> i64 {
    score.clamp(MIN_PERCENTAGE, MAX_PERCENTAGE)
}

/// Mood-based recommendation engine.
///
/// Stateless between requests; the catalog and store come in as constructor
/// arguments so tests can substitute them.
pub struct MoodRecommender {
    catalog: Arc<dyn BookCatalog>,
    store: Arc<dyn RecommendationStore>,
}

impl MoodRecommender {
    pub fn new(catalog: Arc<dyn BookCatalog>, store: Arc<dyn RecommendationStore>) -> Self {
        Self { catalog, store }
    }

    /// Run the full quiz pipeline: retrieve candidates, score, rank,
    /// persist, and assemble the response.
    pub fn recommend(
        &self,
        user_id: &str,
        query: &MoodQuery,
        limit: u32,
    ) -> Result<MoodRecommendations, RecommendationError> {
        metrics::RECOMMENDATION_REQUESTS.inc();

        let genre_terms = category_terms(&query.genre);
        let energy = match query.energy {
            MoodEnergy::High => Some(EnergyBias::High),
            MoodEnergy::Low => Some(EnergyBias::Low),
            MoodEnergy::Medium => None,
        };
        let depth = match query.depth {
            MoodDepth::Light => Some(DepthBias::Light),
            MoodDepth::Deep => Some(DepthBias::Deep),
            MoodDepth::Medium => None,
        };
        let retrieval_cap = limit * 2;

        let mut candidates = self.catalog.find_candidates(&CandidateQuery {
            genre_terms: genre_terms.clone(),
            energy,
            depth,
            limit: retrieval_cap,
        })?;

        // Single widening attempt: drop the energy/depth predicates and keep
        // only the genre when the strict query comes up short.
        if (candidates.len() as u32) < limit {
            debug!(
                found = candidates.len(),
                limit, "Falling back to genre-only candidate query"
            );
            candidates = self.catalog.find_candidates(&CandidateQuery {
                genre_terms,
                energy: None,
                depth: None,
                limit: retrieval_cap,
            })?;
        }

        metrics::CANDIDATES_FOUND
            .with_label_values(&[])
            .observe(candidates.len() as f64);

        let mut scored: Vec<MatchResult> = candidates
            .into_iter()
            .map(|entry| {
                let (match_score, match_reasons) = score_book(&entry, query);
                let tags = mood_tags(&entry, query);
                MatchResult {
                    match_score,
                    match_percentage: clamp_percentage(match_score),
                    match_reasons,
                    mood_tags: tags,
                    entry,
                }
            })
            .collect();

        let total_found = scored.len();
        // Stable sort: ties keep retrieval order.
        scored.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        scored.truncate(limit as usize);

        let mut failed_upserts = 0usize;
        for result in &scored {
            let rec = NewRecommendation {
                user_id: user_id.to_string(),
                book_id: result.entry.id,
                mood_energy: query.energy,
                mood_genre: query.genre.clone(),
                mood_depth: query.depth,
                match_score: result.match_score,
                match_percentage: result.match_percentage,
                match_reasons: result.match_reasons.clone(),
            };
            match self.store.upsert(&rec) {
                Ok(_) => metrics::RECOMMENDATIONS_PERSISTED.inc(),
                Err(e) => {
                    failed_upserts += 1;
                    metrics::RECOMMENDATION_UPSERT_FAILURES.inc();
                    warn!(user_id, book_id = result.entry.id, error = %e, "Recommendation upsert failed");
                }
            }
        }

        // Best-effort persistence: only a complete write-out failure fails
        // the request.
        if !scored.is_empty() && failed_upserts == scored.len() {
            return Err(RecommendationError::Storage(format!(
                "all {} upserts failed",
                failed_upserts
            )));
        }

        Ok(MoodRecommendations {
            recommendations: scored,
            mood_summary: build_mood_summary(query),
            total_found,
        })
    }
}
