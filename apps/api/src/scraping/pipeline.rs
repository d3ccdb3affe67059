//! Professor content pipeline — orchestrates the crawl-and-extract flow.
//!
//! Flow: fetch primary → normalize → extract profile + contacts → collect same-origin
//!       links → fetch up to N secondary pages concurrently → aggregate text →
//!       resolve contacts + tag interests over the aggregate → score → draft email.
//!
//! Only a primary fetch failure aborts the run. Secondary failures contribute nothing.

use futures::future::join_all;
use tracing::{debug, info, warn, Instrument};
use url::Url;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::professor::{AggregateResult, ProfessorInfo};
use crate::scraping::contacts::{contact_hrefs, resolve_contacts};
use crate::scraping::document::PageDocument;
use crate::scraping::draft::compose_email_draft;
use crate::scraping::extract::extract_profile;
use crate::scraping::fetcher::{FetchedPage, Fetcher};
use crate::scraping::interests::{find_keywords, tag_interests};
use crate::scraping::links::collect_same_origin_links;
use crate::scraping::scoring::{score_overall, AffinityScorer};

/// Owned digest of the primary page. The parsed document is dropped before any await.
#[derive(Debug, Clone)]
pub struct PrimaryDigest {
    pub url: Url,
    pub text: String,
    pub profile: ProfessorInfo,
    pub secondary_links: Vec<Url>,
    /// `mailto:` targets and LinkedIn hrefs found on anchors.
    pub contact_hrefs: Vec<String>,
}

pub fn digest_primary(page: &FetchedPage) -> PrimaryDigest {
    let doc = PageDocument::parse(page.final_url.clone(), &page.body);
    let hrefs = doc.hrefs();
    PrimaryDigest {
        url: doc.url.clone(),
        text: doc.text(),
        profile: extract_profile(&doc),
        secondary_links: collect_same_origin_links(&doc.url, &hrefs),
        contact_hrefs: contact_hrefs(&hrefs),
    }
}

pub fn page_text(page: &FetchedPage) -> String {
    PageDocument::parse(page.final_url.clone(), &page.body).text()
}

/// Fetches and extracts a single page without crawling further.
pub async fn scrape_profile(fetcher: &Fetcher, url: &str) -> Result<ProfessorInfo, AppError> {
    let page = fetcher.fetch(url).await?;
    let digest = digest_primary(&page);
    info!(
        "Scraped profile from {}: name={:?}, email={:?}",
        digest.url, digest.profile.name, digest.profile.email
    );
    Ok(digest.profile)
}

/// Runs the full pipeline for `url`, crawling at most `max_secondary` same-origin pages.
pub async fn run_pipeline(
    fetcher: &Fetcher,
    scorer: &dyn AffinityScorer,
    url: &str,
    max_secondary: usize,
) -> Result<AggregateResult, AppError> {
    let span = tracing::info_span!("pipeline", request_id = %Uuid::new_v4(), url = %url);
    run_pipeline_inner(fetcher, scorer, url, max_secondary)
        .instrument(span)
        .await
}

async fn run_pipeline_inner(
    fetcher: &Fetcher,
    scorer: &dyn AffinityScorer,
    url: &str,
    max_secondary: usize,
) -> Result<AggregateResult, AppError> {
    // Step 1–3: primary page is mandatory
    let primary_page = fetcher.fetch(url).await?;
    let primary = digest_primary(&primary_page);
    drop(primary_page);
    info!(
        "Primary page {}: {} chars, {} same-origin links",
        primary.url,
        primary.text.len(),
        primary.secondary_links.len()
    );

    // Step 4–5: bounded secondary crawl, failures skipped
    let targets: Vec<&Url> = primary.secondary_links.iter().take(max_secondary).collect();
    let secondary_texts =
        join_all(targets.iter().map(|link| fetch_secondary_text(fetcher, link))).await;
    let pages_crawled = 1 + secondary_texts.iter().filter(|t| t.is_some()).count();
    let secondary_texts: Vec<String> = secondary_texts.into_iter().flatten().collect();

    // Step 6: aggregate text in link order
    let mut aggregate_text = primary.text.clone();
    for text in &secondary_texts {
        aggregate_text.push(' ');
        aggregate_text.push_str(text);
    }

    // Step 7: primary page contacts (text, then anchors) rank ahead of secondary pages
    let mut contact_text = primary.text.clone();
    for chunk in primary.contact_hrefs.iter().chain(&secondary_texts) {
        contact_text.push(' ');
        contact_text.push_str(chunk);
    }
    let contacts = resolve_contacts(&contact_text);

    let keywords = find_keywords(&aggregate_text);
    let interests = tag_interests(&keywords, &aggregate_text, scorer).await?;
    let overall_match = score_overall(scorer, &interests).await?;

    // Step 8: outreach draft
    let email_draft = compose_email_draft(&primary.profile.name, &keywords);

    info!(
        "Pipeline complete: {} pages, {} emails, linkedin={}, {} interests (scorer={})",
        pages_crawled,
        usize::from(contacts.email.is_some()) + contacts.additional_emails.len(),
        contacts.linkedin_url.is_some(),
        interests.len(),
        scorer.backend()
    );

    Ok(AggregateResult {
        source_url: primary.url.to_string(),
        profile: primary.profile,
        aggregate_text,
        pages_crawled,
        contacts,
        keywords,
        interests,
        overall_match,
        email_draft,
    })
}

async fn fetch_secondary_text(fetcher: &Fetcher, link: &Url) -> Option<String> {
    match fetcher.fetch(link.as_str()).await {
        Ok(page) => {
            let text = page_text(&page);
            debug!("Secondary page {link}: {} chars", text.len());
            Some(text)
        }
        Err(e) => {
            warn!("Skipping secondary page {link}: {e}");
            None
        }
    }
}
