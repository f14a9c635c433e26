//! Display-name enrichment from player profile pages.
//!
//! Lookups are best effort: a failed lookup is logged and skipped, and
//! never affects aggregation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ProfileConfig;
use crate::models::PlayerSummary;

/// Errors that can occur during a profile lookup.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for profile {user_id}")]
    HttpStatus { status: u16, user_id: String },

    #[error("Invalid name selector: {0}")]
    InvalidSelector(String),
}

/// Source of canonical display names.
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    /// Lookup name for logging.
    fn name(&self) -> &'static str;

    /// Canonical display name for a user id, if the profile shows one.
    async fn canonical_name(&self, user_id: &str) -> Result<Option<String>, EnrichmentError>;
}

/// Scrapes the display name off a public profile page.
pub struct HttpProfileLookup {
    client: Client,
    base_url: String,
    name_selector: String,
}

impl HttpProfileLookup {
    pub fn new(config: &ProfileConfig) -> Result<Self, EnrichmentError> {
        // Fail early on a bad selector rather than on every lookup.
        Selector::parse(&config.name_selector)
            .map_err(|e| EnrichmentError::InvalidSelector(e.to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            name_selector: config.name_selector.clone(),
        })
    }

    fn profile_url(&self, user_id: &str) -> String {
        format!("{}/profile/{}", self.base_url, user_id)
    }
}

#[async_trait]
impl ProfileLookup for HttpProfileLookup {
    fn name(&self) -> &'static str {
        "http_profile"
    }

    async fn canonical_name(&self, user_id: &str) -> Result<Option<String>, EnrichmentError> {
        let url = self.profile_url(user_id);
        debug!("Fetching profile {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::HttpStatus {
                status: status.as_u16(),
                user_id: user_id.to_string(),
            });
        }

        let body = response.text().await?;
        extract_name(&body, &self.name_selector)
    }
}

/// First non-empty text matching `selector` in an HTML page.
pub fn extract_name(html: &str, selector: &str) -> Result<Option<String>, EnrichmentError> {
    let selector =
        Selector::parse(selector).map_err(|e| EnrichmentError::InvalidSelector(e.to_string()))?;
    let document = Html::parse_document(html);

    Ok(document
        .select(&selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .find(|text| !text.is_empty()))
}

/// Look up canonical names for every user id on a summary, one at a
/// time and in order, and fold them into the display name and aliases.
pub async fn enrich_summary(summary: &mut PlayerSummary, lookup: &dyn ProfileLookup) {
    let mut canonical: Vec<String> = Vec::new();

    for user_id in &summary.user_ids {
        match lookup.canonical_name(user_id).await {
            Ok(Some(name)) => {
                debug!("{} resolved {} to {:?}", lookup.name(), user_id, name);
                canonical.push(name);
            }
            Ok(None) => debug!("{} found no name for {}", lookup.name(), user_id),
            Err(e) => warn!("Profile lookup failed for {}: {}", user_id, e),
        }
    }

    if canonical.is_empty() {
        return;
    }

    summary.display_name = canonical[0].clone();
    summary.aliases = merge_aliases(canonical, std::mem::take(&mut summary.aliases));
    info!(
        "Enriched {:?} with {} alias(es)",
        summary.display_name,
        summary.aliases.len()
    );
}

/// Canonical names first, then configured aliases, dropping
/// case-insensitive duplicates.
pub fn merge_aliases(canonical: Vec<String>, configured: Vec<String>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for name in canonical.into_iter().chain(configured) {
        if !merged.iter().any(|m| m.to_lowercase() == name.to_lowercase()) {
            merged.push(name);
        }
    }
    merged
}
