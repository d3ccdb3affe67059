use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::scraping::fetcher::{FetcherConfig, DEFAULT_MAX_BODY_BYTES};
use crate::scraping::scoring::ScorerKind;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub fetch_timeout_secs: u64,
    pub fetch_connect_timeout_secs: u64,
    pub fetch_user_agent: String,
    pub fetch_proxy: Option<String>,
    pub fetch_max_body_bytes: usize,
    pub max_secondary_pages: usize,
    pub affinity_scorer: ScorerKind,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 3007)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            fetch_timeout_secs: parse_env("FETCH_TIMEOUT_SECS", 10)?,
            fetch_connect_timeout_secs: parse_env("FETCH_CONNECT_TIMEOUT_SECS", 5)?,
            fetch_user_agent: std::env::var("FETCH_USER_AGENT")
                .unwrap_or_else(|_| default_user_agent()),
            fetch_proxy: std::env::var("FETCH_PROXY")
                .ok()
                .filter(|p| !p.trim().is_empty()),
            fetch_max_body_bytes: parse_env("FETCH_MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
            max_secondary_pages: parse_env("MAX_SECONDARY_PAGES", 3)?,
            affinity_scorer: parse_env("AFFINITY_SCORER", ScorerKind::Random)?,
        })
    }

    /// HTTP client settings handed to the fetcher.
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            timeout: Duration::from_secs(self.fetch_timeout_secs),
            connect_timeout: Duration::from_secs(self.fetch_connect_timeout_secs),
            user_agent: self.fetch_user_agent.clone(),
            proxy: self.fetch_proxy.clone(),
            max_body_bytes: self.fetch_max_body_bytes,
        }
    }
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
