use std::sync::Arc;

use crate::config::Config;
use crate::scraping::fetcher::Fetcher;
use crate::scraping::scoring::AffinityScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// HTTP client for primary and secondary page fetches.
    pub fetcher: Fetcher,
    /// Pluggable affinity scorer. Default: RandomAffinityScorer. Swap via AFFINITY_SCORER env.
    pub scorer: Arc<dyn AffinityScorer>,
}
