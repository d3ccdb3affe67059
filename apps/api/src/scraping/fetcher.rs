//! Fetcher — retrieves raw HTML for a URL with a single attempt and a hard timeout.
//!
//! All HTTP client settings (timeouts, user agent, proxy) come from an explicit
//! `FetcherConfig`; nothing here reads process-wide state.

use std::time::{Duration, Instant};

use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Timed out fetching {0}")]
    Timeout(String),

    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Unsupported content type '{content_type}' from {url}")]
    UnsupportedContent { content_type: String, url: String },

    #[error("Body of {url} exceeds {limit} bytes")]
    TooLarge { limit: usize, url: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub const DEFAULT_MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Media types parsed as pages. A response without `Content-Type` is accepted.
const PAGE_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml+xml", "text/plain"];

/// Settings for the outbound HTTP client.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
    pub proxy: Option<String>,
    /// Larger bodies are rejected rather than parsed.
    pub max_body_bytes: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            proxy: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// A successfully fetched page body.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after redirects; used as the base for link resolution.
    pub final_url: Url,
    pub body: String,
}

#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    max_body_bytes: usize,
}

impl Fetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(10));

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }

        Ok(Self {
            client: builder.build()?,
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Fetches `raw_url` once. Non-2xx responses, timeouts, non-page content types
    /// and oversized bodies are errors.
    pub async fn fetch(&self, raw_url: &str) -> Result<FetchedPage, FetchError> {
        let url = normalize_url(raw_url)?;
        let start = Instant::now();
        debug!("Fetching {url}");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| classify(e, &url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        if let Some(content_type) = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            let essence = content_type
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            if !PAGE_CONTENT_TYPES.contains(&essence.as_str()) {
                return Err(FetchError::UnsupportedContent {
                    content_type: essence,
                    url: url.to_string(),
                });
            }
        }

        let too_large = || FetchError::TooLarge {
            limit: self.max_body_bytes,
            url: url.to_string(),
        };
        if response
            .content_length()
            .is_some_and(|len| len > self.max_body_bytes as u64)
        {
            return Err(too_large());
        }

        let final_url = response.url().clone();
        let body = response.text().await.map_err(|e| classify(e, &url))?;
        if body.len() > self.max_body_bytes {
            return Err(too_large());
        }

        debug!(
            "Fetched {final_url} ({} bytes) in {}ms",
            body.len(),
            start.elapsed().as_millis()
        );

        Ok(FetchedPage { final_url, body })
    }
}

/// Prepends `https://` when the input has no http(s) scheme, then parses it.
pub fn normalize_url(raw: &str) -> Result<Url, FetchError> {
    let trimmed = raw.trim();
    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(&candidate).map_err(|_| FetchError::InvalidUrl(raw.to_string()))?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(FetchError::InvalidUrl(raw.to_string()));
    }
    Ok(url)
}

fn classify(err: reqwest::Error, url: &Url) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(url.to_string())
    } else {
        FetchError::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{header, StatusCode},
        routing::get,
        Router,
    };

    async fn spawn_fixture(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn fast_config() -> FetcherConfig {
        FetcherConfig {
            timeout: Duration::from_millis(500),
            connect_timeout: Duration::from_millis(500),
            ..FetcherConfig::default()
        }
    }

    #[test]
    fn test_normalize_prepends_https() {
        let url = normalize_url("cs.example.edu/~jane").unwrap();
        assert_eq!(url.as_str(), "https://cs.example.edu/~jane");
    }

    #[test]
    fn test_normalize_keeps_http_scheme() {
        let url = normalize_url("http://example.edu/").unwrap();
        assert_eq!(url.scheme(), "http");
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        let url = normalize_url("  https://example.edu  ").unwrap();
        assert_eq!(url.host_str(), Some("example.edu"));
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert!(matches!(normalize_url(""), Err(FetchError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let base = spawn_fixture(Router::new().route(
            "/",
            get(|| async { "<html><body><h1>Hi</h1></body></html>" }),
        ))
        .await;

        let fetcher = Fetcher::new(&fast_config()).unwrap();
        let page = fetcher.fetch(&base).await.unwrap();
        assert!(page.body.contains("<h1>Hi</h1>"));
    }

    #[tokio::test]
    async fn test_fetch_non_2xx_is_error() {
        let base = spawn_fixture(Router::new().route(
            "/missing",
            get(|| async { (StatusCode::NOT_FOUND, "gone") }),
        ))
        .await;

        let fetcher = Fetcher::new(&fast_config()).unwrap();
        let err = fetcher.fetch(&format!("{base}/missing")).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_slow_page_times_out() {
        let base = spawn_fixture(Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                "late"
            }),
        ))
        .await;

        let fetcher = Fetcher::new(&fast_config()).unwrap();
        let err = fetcher.fetch(&format!("{base}/slow")).await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_fetch_rejects_pdf() {
        let base = spawn_fixture(Router::new().route(
            "/cv.pdf",
            get(|| async { ([(header::CONTENT_TYPE, "application/pdf")], "%PDF-1.7 binary") }),
        ))
        .await;

        let fetcher = Fetcher::new(&fast_config()).unwrap();
        let err = fetcher.fetch(&format!("{base}/cv.pdf")).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::UnsupportedContent { ref content_type, .. } if content_type == "application/pdf"
        ));
    }

    #[tokio::test]
    async fn test_fetch_accepts_html_with_charset() {
        let base = spawn_fixture(Router::new().route(
            "/",
            get(|| async { ([(header::CONTENT_TYPE, "Text/HTML; charset=utf-8")], "<p>ok</p>") }),
        ))
        .await;

        let fetcher = Fetcher::new(&fast_config()).unwrap();
        assert_eq!(fetcher.fetch(&base).await.unwrap().body, "<p>ok</p>");
    }

    #[tokio::test]
    async fn test_fetch_rejects_oversized_body() {
        let base = spawn_fixture(Router::new().route(
            "/big",
            get(|| async { "x".repeat(4096) }),
        ))
        .await;

        let fetcher = Fetcher::new(&FetcherConfig {
            max_body_bytes: 1024,
            ..fast_config()
        })
        .unwrap();
        let err = fetcher.fetch(&format!("{base}/big")).await.unwrap_err();
        assert!(matches!(err, FetchError::TooLarge { limit: 1024, .. }));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_error() {
        let fetcher = Fetcher::new(&fast_config()).unwrap();
        assert!(fetcher.fetch("http://127.0.0.1:1/").await.is_err());
    }
}
