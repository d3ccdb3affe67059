//! Keyword tagger — fixed research vocabulary matched against crawled text.
//!
//! Plain case-insensitive substring matching: no stemming, no word boundaries.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::AppError;
use crate::models::professor::InterestTag;
use crate::scraping::scoring::{ensure_percentage, AffinityScorer};

/// Research vocabulary. Alternation order matters where terms share a prefix.
pub const RESEARCH_VOCABULARY: [&str; 20] = [
    "research",
    "interests",
    "projects",
    "publications",
    "areas",
    "machine learning",
    "artificial intelligence",
    "deep learning",
    "neural networks",
    "computer vision",
    "natural language processing",
    "robotics",
    "security",
    "systems",
    "networks",
    "databases",
    "algorithms",
    "theory",
    "software engineering",
    "distributed systems",
];

static VOCABULARY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = RESEARCH_VOCABULARY
        .iter()
        .map(|term| regex::escape(term))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i)(?:{alternation})")).expect("vocabulary pattern should compile")
});

/// Unique lowercased vocabulary hits, in order of first occurrence.
pub fn find_keywords(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    VOCABULARY_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|kw| seen.insert(kw.clone()))
        .collect()
}

/// `machine learning` → `Machine learning`.
pub fn capitalize(keyword: &str) -> String {
    let mut chars = keyword.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// One tag per unique keyword, scored by `scorer` against the full `text`.
pub async fn tag_interests(
    keywords: &[String],
    text: &str,
    scorer: &dyn AffinityScorer,
) -> Result<Vec<InterestTag>, AppError> {
    let mut tags = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let raw = scorer.keyword_affinity(keyword, text).await?;
        let match_percentage = ensure_percentage(scorer, raw)?;
        tags.push(InterestTag {
            area: capitalize(keyword),
            match_percentage,
            description: format!("Research focus on {keyword}"),
        });
    }
    Ok(tags)
}
