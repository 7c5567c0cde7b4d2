//! Page fetcher backed by reqwest.
//!
//! One GET per URL with a browser-like User-Agent and a hard timeout. No
//! retries; a failed fetch only costs its own row.

use thiserror::Error;
use tracing::debug;

use crate::config::FetchConfig;

/// User-Agent sent with every request. Some finance portals return a
/// stripped-down page to unknown clients.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Failure of a single page fetch. Carries the URL so a skipped row can be
/// reported without extra context.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// HTTP fetcher shared across the whole batch.
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client })
    }

    /// Fetch one page and return its body. Non-2xx statuses are errors.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!(url, "fetching page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?
            .error_for_status()
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        debug!(url, bytes = body.len(), "page fetched");
        Ok(body)
    }
}
