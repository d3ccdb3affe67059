//! Affinity scoring — pluggable, trait-based scorer for detected research interests.
//!
//! Default: `RandomAffinityScorer` (placeholder scores in a fixed range).
//! Alternative: `FrequencyAffinityScorer` (deterministic, occurrence-based).
//!
//! `AppState` holds an `Arc<dyn AffinityScorer>`, chosen at startup via `AFFINITY_SCORER`.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use thiserror::Error;

use crate::errors::AppError;
use crate::models::professor::{InterestTag, MatchDetail, OverallMatch};

/// Categories reported under `overallMatch.details`, in output order.
pub const MATCH_CATEGORIES: [&str; 3] = [
    "Research Alignment",
    "Technical Skills",
    "Academic Background",
];

/// Category used for the headline `overallMatch.score`.
pub const OVERALL_CATEGORY: &str = "Overall";

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching the pipeline or handlers.
#[async_trait]
pub trait AffinityScorer: Send + Sync {
    /// Short label for logs, e.g. "random" or "frequency".
    fn backend(&self) -> &'static str;

    /// Affinity in [0, 100] between one detected keyword and the crawled text.
    async fn keyword_affinity(&self, keyword: &str, text: &str) -> Result<u32, AppError>;

    /// Affinity in [0, 100] for a summary category, given the scored interests.
    async fn category_affinity(
        &self,
        category: &str,
        interests: &[InterestTag],
    ) -> Result<u32, AppError>;
}

/// Builds the `overallMatch` block using `scorer`.
pub async fn score_overall(
    scorer: &dyn AffinityScorer,
    interests: &[InterestTag],
) -> Result<OverallMatch, AppError> {
    let score = ensure_percentage(
        scorer,
        scorer.category_affinity(OVERALL_CATEGORY, interests).await?,
    )?;
    let mut details = Vec::with_capacity(MATCH_CATEGORIES.len());
    for category in MATCH_CATEGORIES {
        let raw = scorer.category_affinity(category, interests).await?;
        details.push(MatchDetail {
            category: category.to_string(),
            score: ensure_percentage(scorer, raw)?,
        });
    }
    Ok(OverallMatch { score, details })
}

/// Rejects scores a backend reports outside [0, 100].
pub fn ensure_percentage(scorer: &dyn AffinityScorer, score: u32) -> Result<u32, AppError> {
    if score > 100 {
        return Err(AppError::Scoring(format!(
            "{} scorer returned {score}, expected a percentage",
            scorer.backend()
        )));
    }
    Ok(score)
}

// ────────────────────────────────────────────────────────────────────────────
// Backend selection
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerKind {
    Random,
    Frequency,
}

#[derive(Debug, Error)]
#[error("unknown affinity scorer '{0}' (expected 'random' or 'frequency')")]
pub struct UnknownScorer(String);

impl FromStr for ScorerKind {
    type Err = UnknownScorer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(ScorerKind::Random),
            "frequency" => Ok(ScorerKind::Frequency),
            other => Err(UnknownScorer(other.to_string())),
        }
    }
}

impl fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScorerKind::Random => write!(f, "random"),
            ScorerKind::Frequency => write!(f, "frequency"),
        }
    }
}

pub fn build_scorer(kind: ScorerKind) -> Arc<dyn AffinityScorer> {
    match kind {
        ScorerKind::Random => Arc::new(RandomAffinityScorer::default()),
        ScorerKind::Frequency => Arc::new(FrequencyAffinityScorer),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// RandomAffinityScorer — placeholder scores
// ────────────────────────────────────────────────────────────────────────────

/// Uniform random scores: interests in [60, 100), categories in [80, 100).
pub struct RandomAffinityScorer {
    pub keyword_range: Range<u32>,
    pub category_range: Range<u32>,
}

impl Default for RandomAffinityScorer {
    fn default() -> Self {
        Self {
            keyword_range: 60..100,
            category_range: 80..100,
        }
    }
}

#[async_trait]
impl AffinityScorer for RandomAffinityScorer {
    fn backend(&self) -> &'static str {
        "random"
    }

    async fn keyword_affinity(&self, _keyword: &str, _text: &str) -> Result<u32, AppError> {
        Ok(rand::thread_rng().gen_range(self.keyword_range.clone()))
    }

    async fn category_affinity(
        &self,
        _category: &str,
        _interests: &[InterestTag],
    ) -> Result<u32, AppError> {
        Ok(rand::thread_rng().gen_range(self.category_range.clone()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// FrequencyAffinityScorer — deterministic relevance
// ────────────────────────────────────────────────────────────────────────────

const FREQUENCY_BASE: u32 = 60;
const FREQUENCY_STEP: u32 = 8;
const FREQUENCY_CAP: u32 = 99;

/// Scores a keyword by how often it recurs in the crawled text.
///
/// keyword: 60 + 8 per occurrence beyond the first, capped at 99.
/// category: mean of interest scores (0 with no interests).
pub struct FrequencyAffinityScorer;

#[async_trait]
impl AffinityScorer for FrequencyAffinityScorer {
    fn backend(&self) -> &'static str {
        "frequency"
    }

    async fn keyword_affinity(&self, keyword: &str, text: &str) -> Result<u32, AppError> {
        let occurrences = count_occurrences(&text.to_lowercase(), &keyword.to_lowercase());
        if occurrences == 0 {
            return Ok(0);
        }
        let extra = u32::try_from(occurrences - 1).unwrap_or(u32::MAX);
        Ok(FREQUENCY_BASE
            .saturating_add(extra.saturating_mul(FREQUENCY_STEP))
            .min(FREQUENCY_CAP))
    }

    async fn category_affinity(
        &self,
        _category: &str,
        interests: &[InterestTag],
    ) -> Result<u32, AppError> {
        if interests.is_empty() {
            return Ok(0);
        }
        let total: u64 = interests.iter().map(|i| u64::from(i.match_percentage)).sum();
        let mean = (total as f64 / interests.len() as f64).round() as u32;
        Ok(mean.min(FREQUENCY_CAP))
    }
}

fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}
