//! HTTP fetching of record and metadata feeds.
//!
//! Both feeds are plain JSON documents: the records endpoint returns an
//! array of session records, the metadata endpoint an object keyed by
//! map id. Failed requests are reported, never retried.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::models::{MapIndex, SessionRecord};

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("gltp-leaderboard/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// JSON fetcher.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("gltp-leaderboard")),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    /// Create a fetcher with default configuration.
    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(FetcherConfig::default())
    }

    /// GET a URL and decode the body as JSON.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let url = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;
        debug!("Fetching {}", url);

        let response = self.client.get(url.as_str()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetch the record array.
    pub async fn fetch_records(&self, url: &str) -> Result<Vec<SessionRecord>, FetchError> {
        let records: Vec<SessionRecord> = self.fetch_json(url).await?;
        info!("Fetched {} records from {}", records.len(), url);
        Ok(records)
    }

    /// Fetch the map metadata object.
    pub async fn fetch_metadata(&self, url: &str) -> Result<MapIndex, FetchError> {
        let metadata: MapIndex = self.fetch_json(url).await?;
        info!("Fetched metadata for {} maps from {}", metadata.len(), url);
        Ok(metadata)
    }
}
