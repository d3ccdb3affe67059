mod config;
mod errors;
mod models;
mod routes;
mod scraping;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::scraping::fetcher::Fetcher;
use crate::scraping::scoring::build_scorer;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Scout API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize page fetcher
    let fetcher = Fetcher::new(&config.fetcher_config())?;
    info!(
        "Fetcher initialized (timeout: {}s, proxy: {})",
        config.fetch_timeout_secs,
        config.fetch_proxy.is_some()
    );

    // Initialize affinity scorer (random by default, swap via AFFINITY_SCORER)
    let scorer = build_scorer(config.affinity_scorer);
    info!(
        "Affinity scorer: {}, secondary pages per run: {}",
        scorer.backend(),
        config.max_secondary_pages
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        fetcher,
        scorer,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
