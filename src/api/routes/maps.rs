use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{map_podium, podium::PODIUM_RANK};
use crate::identity::resolve_display_name;
use crate::models::{SessionRecord, StatKind};

/// Upper bound on `n` for a podium request.
const MAX_PODIUM: usize = 50;

#[derive(Debug, Deserialize)]
pub struct PodiumParams {
    pub stat: Option<String>,
    pub n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PodiumRow {
    pub rank: u32,
    pub uuid: String,
    pub record_time: Option<u64>,
    pub total_jumps: Option<u32>,
    pub timestamp: DateTime<Utc>,
    pub is_solo: bool,
    pub players: Vec<String>,
    pub capping_player: Option<String>,
}

impl PodiumRow {
    fn new(position: usize, record: &SessionRecord) -> Self {
        Self {
            rank: position as u32 + 1,
            uuid: record.uuid.clone(),
            record_time: record.record_time,
            total_jumps: record.total_jumps,
            timestamp: record.timestamp,
            is_solo: record.is_solo,
            players: record
                .players
                .iter()
                .map(|p| resolve_display_name(p).to_string())
                .collect(),
            capping_player: record
                .capping_ref()
                .map(|c| resolve_display_name(&c).to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PodiumResponse {
    pub map_id: String,
    pub map_name: String,
    pub stat: StatKind,
    pub entries: Vec<PodiumRow>,
}

/// Top records of one map for a stat.
pub async fn podium(
    State(state): State<AppState>,
    Path(map_id): Path<String>,
    Query(params): Query<PodiumParams>,
) -> Result<Json<PodiumResponse>, ApiError> {
    let stat: StatKind = match params.stat.as_deref() {
        Some(s) => s.parse().map_err(ApiError::BadRequest)?,
        None => StatKind::Speed,
    };
    let n = params.n.unwrap_or(PODIUM_RANK).clamp(1, MAX_PODIUM);

    let snapshot = state.current().await;
    let known_map = snapshot.metadata.get(&map_id).map(|m| m.map_name.clone());
    let first_record = snapshot.records.iter().find(|r| r.map_id == map_id);

    let map_name = match (known_map, first_record) {
        (Some(name), _) => name,
        (None, Some(record)) => record.map_name.clone(),
        (None, None) => return Err(ApiError::NotFound(format!("map {}", map_id))),
    };

    let entries = map_podium(&snapshot, &map_id, stat, n)
        .into_iter()
        .enumerate()
        .map(|(i, r)| PodiumRow::new(i, r))
        .collect();

    Ok(Json(PodiumResponse {
        map_id,
        map_name,
        stat,
        entries,
    }))
}
