//! Static mood mapping tables.
//!
//! Immutable lookup tables initialized once at process start: quiz genre to
//! catalog category terms, display labels, and the per-axis styling used to
//! assemble mood summaries. Unknown genre keys fall back to a generic entry
//! built from the title-cased raw input.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::types::{MoodDepth, MoodEnergy, MoodQuery, MoodSummary, MoodTag};

/// Display style for one mood-axis value.
#[derive(Debug, Clone)]
pub struct AxisStyle {
    pub label: &'static str,
    pub emoji: &'static str,
    pub color: &'static str,
}

/// Quiz genre key -> catalog category search terms.
static GENRE_CATEGORY_TERMS: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    HashMap::from([
        ("fiction", vec!["Fiction", "Literary Fiction", "Contemporary"]),
        ("mystery", vec!["Mystery", "Crime", "Detective", "Thriller"]),
        ("romance", vec!["Romance", "Contemporary Romance", "Love"]),
        ("scifi", vec!["Science Fiction", "Dystopian", "Space Opera"]),
        (
            "nonfiction",
            vec!["Nonfiction", "Biography", "Self-Help", "History"],
        ),
        (
            "fantasy",
            vec!["Fantasy", "Epic Fantasy", "Urban Fantasy", "Magic"],
        ),
    ])
});

/// Quiz genre key -> display style.
static GENRE_STYLES: Lazy<HashMap<&'static str, AxisStyle>> = Lazy::new(|| {
    HashMap::from([
        (
            "fiction",
            AxisStyle {
                label: "Fiction",
                emoji: "📚",
                color: "#7F9BEB",
            },
        ),
        (
            "mystery",
            AxisStyle {
                label: "Mystery",
                emoji: "🔍",
                color: "#4A5568",
            },
        ),
        (
            "romance",
            AxisStyle {
                label: "Romance",
                emoji: "💕",
                color: "#FFB3BA",
            },
        ),
        (
            "scifi",
            AxisStyle {
                label: "Sci-Fi",
                emoji: "🚀",
                color: "#FF6B35",
            },
        ),
        (
            "nonfiction",
            AxisStyle {
                label: "Non-Fiction",
                emoji: "🧠",
                color: "#98FB98",
            },
        ),
        (
            "fantasy",
            AxisStyle {
                label: "Fantasy",
                emoji: "🔮",
                color: "#A78BFA",
            },
        ),
    ])
});

const GENERIC_GENRE_EMOJI: &str = "📖";
const GENERIC_GENRE_COLOR: &str = "#71727A";

fn energy_style(energy: MoodEnergy) -> AxisStyle {
    match energy {
        MoodEnergy::High => AxisStyle {
            label: "High Energy",
            emoji: "⚡",
            color: "#FF6B6B",
        },
        MoodEnergy::Medium => AxisStyle {
            label: "Steady Pace",
            emoji: "📖",
            color: "#7B68EE",
        },
        MoodEnergy::Low => AxisStyle {
            label: "Calm & Cozy",
            emoji: "☕",
            color: "#8B5A3C",
        },
    }
}

fn depth_style(depth: MoodDepth) -> AxisStyle {
    match depth {
        MoodDepth::Light => AxisStyle {
            label: "Easy Read",
            emoji: "🌸",
            color: "#FFE066",
        },
        MoodDepth::Medium => AxisStyle {
            label: "Balanced Depth",
            emoji: "📔",
            color: "#87CEEB",
        },
        MoodDepth::Deep => AxisStyle {
            label: "Deep Dive",
            emoji: "🌊",
            color: "#228B22",
        },
    }
}

/// Category terms for a quiz genre key. Empty for unknown keys, which means
/// no genre narrowing during candidate retrieval.
pub fn category_terms(genre: &str) -> Vec<String> {
    GENRE_CATEGORY_TERMS
        .get(genre)
        .map(|terms| terms.iter().map(|t| t.to_string()).collect())
        .unwrap_or_default()
}

/// Display label for a quiz genre key; unknown keys are title-cased.
pub fn genre_label(genre: &str) -> String {
    GENRE_STYLES
        .get(genre)
        .map(|style| style.label.to_string())
        .unwrap_or_else(|| title_case(genre))
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Assemble the mood summary for a quiz from the static tables.
pub fn build_mood_summary(query: &MoodQuery) -> MoodSummary {
    let energy = energy_style(query.energy);
    let depth = depth_style(query.depth);
    let (genre_label, genre_emoji, genre_color) = match GENRE_STYLES.get(query.genre.as_str()) {
        Some(style) => (style.label.to_string(), style.emoji, style.color),
        None => (
            title_case(&query.genre),
            GENERIC_GENRE_EMOJI,
            GENERIC_GENRE_COLOR,
        ),
    };

    MoodSummary {
        title: format!("Your {} Reading Match", energy.label),
        description: format!("Curated {} picks that match your current vibe", genre_label),
        emoji: format!("{} {} {}", energy.emoji, genre_emoji, depth.emoji),
        tags: vec![
            MoodTag {
                label: energy.label.to_string(),
                color: energy.color.to_string(),
            },
            MoodTag {
                label: genre_label,
                color: genre_color.to_string(),
            },
            MoodTag {
                label: depth.label.to_string(),
                color: depth.color.to_string(),
            },
        ],
    }
}
