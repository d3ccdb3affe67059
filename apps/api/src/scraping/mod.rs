//! Professor homepage scraping.
//!
//! Implements: fetch, normalize, field extraction, contact resolution, bounded
//! same-origin crawl, interest tagging and scoring, outreach draft.
//! All HTTP goes through `fetcher::Fetcher`; HTML parsing stays in `document`.

pub mod contacts;
pub mod document;
pub mod draft;
pub mod extract;
pub mod fetcher;
pub mod handlers;
pub mod interests;
pub mod links;
pub mod pipeline;
pub mod scoring;
