//! Retrieval layer: one HTTP GET per call, with a browser identity header and
//! a bounded timeout.
//!
//! When the rendering proxy is enabled the request is sent to the proxy
//! instead, which loads the target in a headless browser and returns the
//! rendered HTML. No retries happen here; the pipeline decides whether a
//! failure is fatal.

use crate::config::ScrapeConfig;
use crate::error::RetrievalError;
use crate::models::{PageVariant, RawDocument};
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Source of raw HTML for the pipeline.
///
/// The pipeline is generic over this trait so runs can be driven from
/// in-memory fixtures as well as the network.
// Runs are awaited in place and never spawned, so no `Send` bound is needed.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    async fn fetch(&self, url: &str, variant: PageVariant) -> Result<RawDocument, RetrievalError>;
}

/// reqwest-backed [`Fetcher`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: ScrapeConfig,
}

impl HttpFetcher {
    pub fn new(config: &ScrapeConfig) -> Result<Self, RetrievalError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .build()
            .map_err(|e| RetrievalError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// The URL actually requested for `target`, routed through the rendering
    /// proxy when it is enabled.
    pub fn request_url(&self, target: &Url) -> String {
        let proxy = &self.config.render_proxy;
        match proxy.api_key.as_deref() {
            Some(api_key) if proxy.enabled => format!(
                "{}?api_key={}&url={}&render=true",
                proxy.endpoint,
                urlencoding::encode(api_key),
                urlencoding::encode(target.as_str())
            ),
            _ => target.to_string(),
        }
    }
}

const REDACTED: &str = "REDACTED";

/// `request_url` with the proxy `api_key` value masked, for logging.
pub fn redact_api_key(request_url: &str) -> String {
    let Ok(mut url) = Url::parse(request_url) else {
        return REDACTED.to_string();
    };
    if !url.query_pairs().any(|(key, _)| key == "api_key") {
        return url.to_string();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == "api_key" {
                REDACTED.to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();
    url.query_pairs_mut().clear().extend_pairs(pairs);
    url.to_string()
}

impl Fetcher for HttpFetcher {
    #[instrument(level = "info", skip(self, variant), fields(%variant))]
    async fn fetch(&self, url: &str, variant: PageVariant) -> Result<RawDocument, RetrievalError> {
        let target = Url::parse(url).map_err(|e| RetrievalError::InvalidUrl(format!("{url}: {e}")))?;
        let request_url = self.request_url(&target);
        let t0 = Instant::now();

        let response = self.client.get(&request_url).send().await.map_err(|e| {
            if e.is_timeout() {
                RetrievalError::Timeout(url.to_string())
            } else {
                RetrievalError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Fetch returned error status");
            return Err(RetrievalError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let html = response.text().await.map_err(|e| {
            if e.is_timeout() {
                RetrievalError::Timeout(url.to_string())
            } else {
                RetrievalError::Transport(format!("failed to read body: {e}"))
            }
        })?;

        let elapsed = t0.elapsed();
        info!(
            bytes = html.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            proxied = self.config.render_proxy.enabled,
            "Fetched page"
        );
        debug!(request_url = %redact_api_key(&request_url), "Request URL");

        Ok(RawDocument::new(url, variant, html))
    }
}
