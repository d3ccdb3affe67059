//! Axum route handlers for the professor scraping API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::professor::{InterestTag, OverallMatch, ProfessorInfo};
use crate::scraping::draft::{summarize, MATCHING_POINTS};
use crate::scraping::pipeline::{run_pipeline, scrape_profile};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteRequest {
    #[serde(default)]
    pub website_url: String,
}

impl WebsiteRequest {
    fn validated_url(&self) -> Result<&str, AppError> {
        let url = self.website_url.trim();
        if url.is_empty() {
            return Err(AppError::Validation("websiteUrl cannot be empty".to_string()));
        }
        Ok(url)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfoBody {
    pub email: Option<String>,
    pub additional_emails: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    pub professor_info: String,
    pub email_draft: String,
    pub matching_points: Vec<String>,
    pub contact_info: ContactInfoBody,
    pub linkedin_url: Option<String>,
    pub research_interests: Vec<InterestTag>,
    pub overall_match: OverallMatch,
    pub profile: ProfessorInfo,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate-professor-content
///
/// Crawls the homepage plus a few same-origin pages and returns contacts,
/// tagged interests, match scores and an outreach draft.
pub async fn handle_generate_professor_content(
    State(state): State<AppState>,
    Json(request): Json<WebsiteRequest>,
) -> Result<Json<GenerateContentResponse>, AppError> {
    let url = request.validated_url()?;

    let result = run_pipeline(
        &state.fetcher,
        state.scorer.as_ref(),
        url,
        state.config.max_secondary_pages,
    )
    .await?;

    info!(
        "Generated content for {} from {} page(s)",
        result.source_url, result.pages_crawled
    );

    Ok(Json(GenerateContentResponse {
        professor_info: summarize(&result.aggregate_text),
        email_draft: result.email_draft,
        matching_points: MATCHING_POINTS.iter().map(|p| p.to_string()).collect(),
        contact_info: ContactInfoBody {
            email: result.contacts.email,
            additional_emails: result.contacts.additional_emails,
        },
        linkedin_url: result.contacts.linkedin_url,
        research_interests: result.interests,
        overall_match: result.overall_match,
        profile: result.profile,
    }))
}

/// POST /api/scrape-professor
///
/// Structured profile fields from a single page. No secondary crawl.
pub async fn handle_scrape_professor(
    State(state): State<AppState>,
    Json(request): Json<WebsiteRequest>,
) -> Result<Json<ProfessorInfo>, AppError> {
    let url = request.validated_url()?;
    let profile = scrape_profile(&state.fetcher, url).await?;
    Ok(Json(profile))
}
