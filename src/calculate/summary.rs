//! Player profile aggregation.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::{debug, info};

use crate::identity::{normalize, EffectiveIdentity, MergeGroups};
use crate::models::{MapCompletion, MapIndex, PlayerSummary, SessionRecord, StatKind};

use super::best::rank_by_map;
use super::podium::badge_counts;

/// Errors from profile aggregation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SummaryError {
    #[error("No records found for player: {0}")]
    NoMatch(String),
}

/// Records touching an identity, de-duplicated by uuid, in input order.
pub fn find_records<'a>(identity: &EffectiveIdentity, records: &'a [SessionRecord]) -> Vec<&'a SessionRecord> {
    let mut seen: BTreeSet<&'a str> = BTreeSet::new();
    let mut out = Vec::new();
    for record in records {
        if identity.touches(record) && seen.insert(record.uuid.as_str()) {
            out.push(record);
        }
    }
    out
}

/// Build a profile for a query (a name, a user id, or any member of a merge group).
pub fn summarize(
    query: &str,
    records: &[SessionRecord],
    metadata: &MapIndex,
    groups: &MergeGroups,
) -> Result<PlayerSummary, SummaryError> {
    let identity = EffectiveIdentity::resolve(query, groups);
    let touched = find_records(&identity, records);
    // Unfinished rounds only show up as completion attempts.
    let relevant: Vec<&SessionRecord> = touched.iter().copied().filter(|r| r.is_completed()).collect();

    let (Some(first_seen), Some(last_seen)) = (
        relevant.iter().map(|r| r.timestamp).min(),
        relevant.iter().map(|r| r.timestamp).max(),
    ) else {
        debug!("No records matched query {:?}", query);
        return Err(SummaryError::NoMatch(query.trim().to_string()));
    };

    let distinct_maps: BTreeSet<&str> = relevant.iter().map(|r| r.map_id.as_str()).collect();

    let speed = rank_by_map(records, StatKind::Speed, metadata);
    let jump = rank_by_map(records, StatKind::Jump, metadata);
    let speed_badges = badge_counts(&speed, &identity);
    let jump_badges = badge_counts(&jump, &identity);

    let naming = Naming::resolve(query, &identity, &relevant);

    info!(
        "Summarized {:?}: {} runs on {} maps",
        naming.display_name,
        relevant.len(),
        distinct_maps.len()
    );

    Ok(PlayerSummary {
        query: query.trim().to_string(),
        display_name: naming.display_name,
        user_id: naming.user_ids.first().cloned(),
        user_ids: naming.user_ids,
        merge_group: identity.group.clone(),
        aliases: naming.aliases,
        first_seen,
        last_seen,
        distinct_maps: distinct_maps.len() as u32,
        total_runs: relevant.len() as u32,
        speed_badges,
        jump_badges,
        completion: completion_rows(&touched, metadata),
    })
}

/// Names and ids shown on a profile.
struct Naming {
    display_name: String,
    user_ids: Vec<String>,
    aliases: Vec<String>,
}

impl Naming {
    fn resolve(query: &str, identity: &EffectiveIdentity, relevant: &[&SessionRecord]) -> Self {
        if let Some(group) = &identity.group {
            return Self {
                display_name: identity.names.first().cloned().unwrap_or_else(|| group.clone()),
                user_ids: identity.user_ids.clone(),
                aliases: identity.names.clone(),
            };
        }

        let q = normalize(query);
        let mut user_ids: Vec<String> = Vec::new();
        let mut aliases: Vec<String> = Vec::new();

        for record in relevant {
            for slot in record.all_slots() {
                if !identity.matches(&slot) {
                    continue;
                }
                if let Some(id) = slot.user_id() {
                    if !user_ids.iter().any(|known| known == id) {
                        user_ids.push(id.to_string());
                    }
                }
                if !aliases.iter().any(|a| a.eq_ignore_ascii_case(&slot.name)) {
                    aliases.push(slot.name);
                }
            }
        }

        // Prefer the slot spelling of the queried name; fall back to the query itself.
        let display_name = aliases
            .iter()
            .find(|a| normalize(a) == q)
            .cloned()
            .or_else(|| aliases.first().cloned())
            .unwrap_or_else(|| query.trim().to_string());

        Self {
            display_name,
            user_ids,
            aliases,
        }
    }
}

/// One completion row per known map plus every map the player touched.
fn completion_rows(relevant: &[&SessionRecord], metadata: &MapIndex) -> Vec<MapCompletion> {
    let mut rows: BTreeMap<&str, MapCompletion> = metadata
        .iter()
        .map(|(map_id, meta)| {
            (
                map_id.as_str(),
                MapCompletion {
                    map_id: map_id.clone(),
                    map_name: meta.map_name.clone(),
                    attempts: 0,
                    best_time: None,
                    min_jumps: None,
                    difficulty: meta.difficulty.clone(),
                    balls_req: meta.balls_req.clone(),
                },
            )
        })
        .collect();

    for record in relevant {
        let row = rows.entry(record.map_id.as_str()).or_insert_with(|| MapCompletion {
            map_id: record.map_id.clone(),
            map_name: record.map_name.clone(),
            attempts: 0,
            best_time: None,
            min_jumps: None,
            difficulty: None,
            balls_req: None,
        });
        row.attempts += 1;
        row.best_time = min_option(row.best_time, record.record_time);
        row.min_jumps = min_option(row.min_jumps, record.total_jumps);
    }

    rows.into_values().collect()
}

fn min_option<T: Ord>(a: Option<T>, b: Option<T>) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}
