use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{summarize, SummaryError};
use crate::enrich::enrich_summary;
use crate::models::PlayerSummary;

#[derive(Debug, Deserialize)]
pub struct PlayerParams {
    /// Look up canonical names on the profile site
    #[serde(default)]
    pub enrich: bool,
}

#[derive(Debug, Serialize)]
pub struct PlayerResponse {
    #[serde(flatten)]
    pub summary: PlayerSummary,
    pub profile_url: Option<String>,
}

impl From<SummaryError> for ApiError {
    fn from(e: SummaryError) -> Self {
        match e {
            SummaryError::NoMatch(_) => ApiError::NotFound(e.to_string()),
        }
    }
}

/// Profile for a name, user id, or merge-group member.
pub async fn player_summary(
    State(state): State<AppState>,
    Path(query): Path<String>,
    Query(params): Query<PlayerParams>,
) -> Result<Json<PlayerResponse>, ApiError> {
    if query.trim().is_empty() {
        return Err(ApiError::BadRequest("empty player query".to_string()));
    }

    let snapshot = state.current().await;
    let mut summary = summarize(
        &query,
        &snapshot.records,
        &snapshot.metadata,
        &state.config.merge_groups,
    )?;

    match (&state.profile_lookup, params.enrich) {
        (Some(lookup), true) => enrich_summary(&mut summary, lookup.as_ref()).await,
        (None, true) => debug!("Enrichment requested but profile lookup is disabled"),
        _ => {}
    }

    let profile_url = summary.user_id.as_deref().map(|id| state.profile_url(id));
    Ok(Json(PlayerResponse {
        summary,
        profile_url,
    }))
}
