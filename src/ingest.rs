//! Snapshot assembly from configured sources.
//!
//! A local path takes precedence over a URL for each source. A missing
//! metadata source yields empty metadata, which only disables jump
//! eligibility.

use thiserror::Error;
use tracing::{info, warn};

use crate::config::SourceConfig;
use crate::fetch::{FetchError, Fetcher};
use crate::models::{MapIndex, RecordSnapshot, SessionRecord};
use crate::storage::{self, StorageError};

/// Errors that can occur while loading a snapshot.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("No record source configured")]
    NoRecordSource,
}

/// Load records from the configured source.
pub async fn load_records(
    sources: &SourceConfig,
    fetcher: &Fetcher,
) -> Result<Vec<SessionRecord>, IngestError> {
    if let Some(path) = &sources.records_path {
        return Ok(storage::load_records(path)?);
    }
    if let Some(url) = &sources.records_url {
        return Ok(fetcher.fetch_records(url).await?);
    }
    Err(IngestError::NoRecordSource)
}

/// Load map metadata from the configured source, or empty metadata if
/// none is configured.
pub async fn load_metadata(sources: &SourceConfig, fetcher: &Fetcher) -> Result<MapIndex, IngestError> {
    if let Some(path) = &sources.metadata_path {
        return Ok(storage::load_metadata(path)?);
    }
    if let Some(url) = &sources.metadata_url {
        return Ok(fetcher.fetch_metadata(url).await?);
    }

    warn!("No map metadata source configured; jump boards will be empty");
    Ok(MapIndex::new())
}

/// Build a fresh snapshot from the configured sources.
pub async fn load_snapshot(sources: &SourceConfig, fetcher: &Fetcher) -> Result<RecordSnapshot, IngestError> {
    let records = load_records(sources, fetcher).await?;
    let metadata = load_metadata(sources, fetcher).await?;

    let snapshot = RecordSnapshot::new(records, metadata);
    info!(
        "Loaded snapshot: {} records ({} completed), {} maps",
        snapshot.records.len(),
        snapshot.completed_count(),
        snapshot.metadata.len()
    );
    Ok(snapshot)
}
