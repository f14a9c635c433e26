//! Merge groups: manually curated sets of ids and names that belong to
//! one person.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::normalize;
use crate::models::{PlayerRef, SessionRecord};

/// One person's known user ids and in-game names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeGroup {
    #[serde(default)]
    pub user_ids: Vec<String>,

    #[serde(default)]
    pub names: Vec<String>,
}

impl MergeGroup {
    pub fn is_empty(&self) -> bool {
        self.user_ids.is_empty() && self.names.is_empty()
    }

    /// Whether a normalized query names this group.
    fn matches_query(&self, query: &str) -> bool {
        self.user_ids
            .iter()
            .chain(self.names.iter())
            .any(|member| normalize(member) == query)
    }
}

/// Merge groups keyed by group name.
pub type MergeGroups = BTreeMap<String, MergeGroup>;

/// Find the group a query belongs to. Groups are checked in name order.
pub fn resolve_merge_group<'g>(
    query: &str,
    groups: &'g MergeGroups,
) -> Option<(&'g str, &'g MergeGroup)> {
    let q = normalize(query);
    if q.is_empty() {
        return None;
    }
    groups
        .iter()
        .find(|(_, group)| group.matches_query(&q))
        .map(|(name, group)| (name.as_str(), group))
}

/// The set of ids and names a profile query stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveIdentity {
    /// Matched group name, if the query hit a merge group
    pub group: Option<String>,

    /// Configured ids, original casing
    pub user_ids: Vec<String>,

    /// Configured aliases, original casing
    pub names: Vec<String>,

    ids_normalized: BTreeSet<String>,
    names_normalized: BTreeSet<String>,
}

impl EffectiveIdentity {
    /// Resolve a query against the configured groups, falling back to
    /// an ad hoc identity.
    pub fn resolve(query: &str, groups: &MergeGroups) -> Self {
        match resolve_merge_group(query, groups) {
            Some((name, group)) => Self::from_group(name, group),
            None => Self::ad_hoc(query),
        }
    }

    pub fn from_group(name: &str, group: &MergeGroup) -> Self {
        Self {
            group: Some(name.to_string()),
            user_ids: group.user_ids.clone(),
            names: group.names.clone(),
            ids_normalized: group.user_ids.iter().map(|s| normalize(s)).collect(),
            names_normalized: group.names.iter().map(|s| normalize(s)).collect(),
        }
    }

    /// Treat the query as both a candidate name and a candidate id.
    pub fn ad_hoc(query: &str) -> Self {
        let q = normalize(query);
        let single = |s: &String| {
            if s.is_empty() {
                BTreeSet::new()
            } else {
                BTreeSet::from([s.clone()])
            }
        };
        Self {
            group: None,
            user_ids: Vec::new(),
            names: Vec::new(),
            ids_normalized: single(&q),
            names_normalized: single(&q),
        }
    }

    /// Whether a player slot belongs to this identity.
    pub fn matches(&self, player: &PlayerRef) -> bool {
        if self.names_normalized.contains(&normalize(&player.name)) {
            return true;
        }
        player
            .user_id()
            .is_some_and(|id| self.ids_normalized.contains(&normalize(id)))
    }

    /// Whether any slot on a record (players or capper) belongs to this identity.
    pub fn touches(&self, record: &SessionRecord) -> bool {
        record.players.iter().any(|p| self.matches(p))
            || record.capping_ref().is_some_and(|c| self.matches(&c))
    }
}
