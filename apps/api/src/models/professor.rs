use serde::{Deserialize, Serialize};

/// Structured fields pulled from a professor's homepage.
/// A field nobody could locate is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessorInfo {
    pub name: String,
    pub title: String,
    pub department: String,
    pub email: String,
    pub research: String,
    pub publications: String,
}

/// Canonical emails (primary first) plus an optional LinkedIn profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub additional_emails: Vec<String>,
    pub linkedin_url: Option<String>,
}

/// One research area detected in the crawled text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestTag {
    pub area: String,
    pub match_percentage: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDetail {
    pub category: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallMatch {
    pub score: u32,
    pub details: Vec<MatchDetail>,
}

/// Everything one pipeline run produces.
#[derive(Debug, Clone)]
pub struct AggregateResult {
    pub source_url: String,
    pub profile: ProfessorInfo,
    pub aggregate_text: String,
    pub pages_crawled: usize,
    pub contacts: ContactInfo,
    /// Unique keywords in order of first occurrence.
    pub keywords: Vec<String>,
    pub interests: Vec<InterestTag>,
    pub overall_match: OverallMatch,
    pub email_draft: String,
}
