//! Player profile models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Podium badge held on a single map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    /// Rank 1
    Gold,
    /// Rank 2 or 3
    Bronze,
}

/// Badge tallies across maps for one stat.
///
/// Gold and bronze never overlap on the same map, so `gold + bronze`
/// is the number of maps where the player is in the top three.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeCounts {
    pub gold: u32,
    pub bronze: u32,
}

impl BadgeCounts {
    pub fn add(&mut self, badge: Badge) {
        match badge {
            Badge::Gold => self.gold += 1,
            Badge::Bronze => self.bronze += 1,
        }
    }

    /// Maps where the player holds any top-three spot.
    pub fn top_3(&self) -> u32 {
        self.gold + self.bronze
    }
}

/// Per-map progress row on a player profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapCompletion {
    pub map_id: String,
    pub map_name: String,

    /// Rounds played on the map, finished or not
    pub attempts: u32,

    /// Fastest finished time in milliseconds
    pub best_time: Option<u64>,

    /// Fewest jumps recorded
    pub min_jumps: Option<u32>,

    pub difficulty: Option<serde_json::Value>,
    pub balls_req: Option<serde_json::Value>,
}

impl MapCompletion {
    pub fn is_completed(&self) -> bool {
        self.best_time.is_some()
    }
}

/// Aggregate profile for one identity (or merge group).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    /// The query as typed
    pub query: String,

    /// Name to show on the profile
    pub display_name: String,

    /// Primary user id, used for the profile link
    pub user_id: Option<String>,

    /// Every user id the identity is known by
    pub user_ids: Vec<String>,

    /// Matched merge group, if any
    pub merge_group: Option<String>,

    /// Known alternate names
    pub aliases: Vec<String>,

    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,

    /// Distinct map ids touched
    pub distinct_maps: u32,

    /// Rounds the identity took part in
    pub total_runs: u32,

    pub speed_badges: BadgeCounts,
    pub jump_badges: BadgeCounts,

    /// Progress per map
    pub completion: Vec<MapCompletion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_counts_add() {
        let mut counts = BadgeCounts::default();
        counts.add(Badge::Gold);
        counts.add(Badge::Bronze);
        counts.add(Badge::Bronze);

        assert_eq!(counts.gold, 1);
        assert_eq!(counts.bronze, 2);
        assert_eq!(counts.top_3(), 3);
    }

    #[test]
    fn test_map_completion_flag() {
        let row = MapCompletion {
            map_id: "m1".to_string(),
            map_name: "Up".to_string(),
            attempts: 2,
            best_time: None,
            min_jumps: Some(4),
            difficulty: None,
            balls_req: None,
        };
        assert!(!row.is_completed());
    }
}
