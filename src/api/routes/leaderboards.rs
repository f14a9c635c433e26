use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{ApiError, Pagination, PaginationMeta};
use crate::calculate::compute_leaderboards;
use crate::models::{BoardId, Leaderboard, LeaderboardEntry};

const DEFAULT_PREVIEW: usize = 10;

#[derive(Debug, Serialize)]
pub struct RankedRow {
    pub rank: u32,
    pub name: String,
    pub score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

impl RankedRow {
    fn new(state: &AppState, position: usize, entry: &LeaderboardEntry) -> Self {
        Self {
            rank: position as u32 + 1,
            name: entry.name.clone(),
            score: entry.score,
            user_id: entry.user_id.clone(),
            profile_url: entry.user_id.as_deref().map(|id| state.profile_url(id)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BoardPreview {
    pub id: String,
    pub title: String,
    pub total_entries: usize,
    pub top: Vec<RankedRow>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardsResponse {
    pub loaded_at: DateTime<Utc>,
    pub records: usize,
    pub boards: Vec<BoardPreview>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewParams {
    pub limit: Option<usize>,
}

/// Every board, trimmed to its top rows.
pub async fn list_boards(
    State(state): State<AppState>,
    Query(params): Query<PreviewParams>,
) -> Result<Json<LeaderboardsResponse>, ApiError> {
    let snapshot = state.current().await;
    let set = compute_leaderboards(&snapshot.records, &snapshot.metadata);
    let limit = params.limit.unwrap_or(DEFAULT_PREVIEW);

    let boards = BoardId::ALL
        .into_iter()
        .map(|id| {
            let board = set.board(id);
            BoardPreview {
                id: id.to_string(),
                title: id.title().to_string(),
                total_entries: board.len(),
                top: board
                    .ranked()
                    .into_iter()
                    .take(limit)
                    .enumerate()
                    .map(|(i, e)| RankedRow::new(&state, i, e))
                    .collect(),
            }
        })
        .collect();

    Ok(Json(LeaderboardsResponse {
        loaded_at: snapshot.loaded_at,
        records: snapshot.records.len(),
        boards,
    }))
}

#[derive(Debug, Deserialize)]
pub struct BoardParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub id: String,
    pub title: String,
    pub total_score: u32,
    pub entries: Vec<RankedRow>,
    pub pagination: PaginationMeta,
}

/// One board, paginated.
pub async fn get_board(
    State(state): State<AppState>,
    Path(board): Path<String>,
    Query(params): Query<BoardParams>,
) -> Result<Json<BoardResponse>, ApiError> {
    let id: BoardId = board.parse().map_err(ApiError::NotFound)?;
    let pagination = Pagination::new(params.page, params.page_size);

    let snapshot = state.current().await;
    let set = compute_leaderboards(&snapshot.records, &snapshot.metadata);
    let leaderboard: &Leaderboard = set.board(id);
    let ranked = leaderboard.ranked();

    let offset = pagination.offset();
    let entries = pagination
        .slice(&ranked)
        .iter()
        .enumerate()
        .map(|(i, e)| RankedRow::new(&state, offset + i, e))
        .collect();

    Ok(Json(BoardResponse {
        id: id.to_string(),
        title: id.title().to_string(),
        total_score: leaderboard.total(),
        entries,
        pagination: PaginationMeta::new(&pagination, ranked.len() as u32),
    }))
}
