use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::ingest::{load_snapshot, IngestError};

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub records: usize,
    pub completed: usize,
    pub maps: usize,
    pub loaded_at: DateTime<Utc>,
}

impl From<IngestError> for ApiError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::NoRecordSource => ApiError::Internal(e.to_string()),
            IngestError::Storage(_) | IngestError::Fetch(_) => ApiError::Upstream(e.to_string()),
        }
    }
}

/// Reload the snapshot from the configured sources.
///
/// On failure the previous snapshot stays in place.
pub async fn refresh(State(state): State<AppState>) -> Result<Json<RefreshResponse>, ApiError> {
    let snapshot = load_snapshot(&state.config.sources, &state.fetcher)
        .await
        .map_err(|e| {
            error!("Refresh failed: {}", e);
            ApiError::from(e)
        })?;

    let snapshot = state.replace(snapshot).await;
    info!("Snapshot refreshed: {} records", snapshot.records.len());

    Ok(Json(RefreshResponse {
        records: snapshot.records.len(),
        completed: snapshot.completed_count(),
        maps: snapshot.metadata.len(),
        loaded_at: snapshot.loaded_at,
    }))
}
