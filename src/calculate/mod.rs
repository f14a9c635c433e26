//! Leaderboard calculation engine.
//!
//! Computes derived structures from an immutable record snapshot:
//! - Best record per map for speed and jump
//! - Category leaderboards (overall/solo/capping, games, unique maps)
//! - Per-map podiums and badge counts
//! - Player profile summaries
//!
//! Everything here is a pure function of its inputs. Nothing is cached
//! between calls.

pub mod best;
pub mod podium;
pub mod summary;
pub mod tally;

use tracing::info;

use crate::models::{Category, LeaderboardSet, MapIndex, RecordSnapshot, SessionRecord, StatBoards, StatKind};

pub use best::{rank_by_map, select_best, RankedMaps};
pub use podium::{badge_counts, badge_for, count_across_maps, holds_rank, top_n, IdentityMatcher};
pub use summary::{find_records, summarize, SummaryError};
pub use tally::{dedup_credits, tally, Tally};

/// Overall, solo and capping boards over the best record of every map.
pub fn stat_boards(ranked: &RankedMaps<'_>) -> StatBoards {
    StatBoards {
        overall: tally(Category::Overall, ranked.best_records()),
        solo: tally(Category::Solo, ranked.best_records()),
        capping: tally(Category::Capping, ranked.best_records()),
    }
}

/// Run the full leaderboard pipeline over one snapshot.
pub fn compute_leaderboards(records: &[SessionRecord], metadata: &MapIndex) -> LeaderboardSet {
    let speed_ranked = rank_by_map(records, StatKind::Speed, metadata);
    let jump_ranked = rank_by_map(records, StatKind::Jump, metadata);

    let speed = stat_boards(&speed_ranked);
    let jump = stat_boards(&jump_ranked);
    let combined = StatBoards::combine(&speed, &jump);

    let set = LeaderboardSet {
        games_completed: tally(Category::GamesCompleted, records),
        unique_maps_completed: tally(Category::UniqueMapsCompleted, records),
        speed,
        jump,
        combined,
    };

    info!(
        "Computed leaderboards: {} records, {} speed maps, {} jump maps, {} players",
        records.len(),
        speed_ranked.map_count(),
        jump_ranked.map_count(),
        set.games_completed.len()
    );

    set
}

/// Top `n` records of one map for a stat.
pub fn map_podium<'a>(snapshot: &'a RecordSnapshot, map_id: &str, stat: StatKind, n: usize) -> Vec<&'a SessionRecord> {
    let ranked = rank_by_map(&snapshot.records, stat, &snapshot.metadata);
    top_n(ranked.records_for(map_id), n).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IdentityKey, MapKind, MapMetadata, PlayerRef};
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn bob_scenario() -> (Vec<SessionRecord>, MapIndex) {
        let records = vec![SessionRecord::new("a", "m1", Utc::now())
            .with_time(5000)
            .with_jumps(10)
            .solo()
            .with_capper(PlayerRef::new("Bob").with_user_id("u1"))
            .with_player(PlayerRef::new("Bob").with_user_id("u1"))];
        let mut metadata = MapIndex::new();
        metadata.insert("m1".into(), MapMetadata::new("One", MapKind::Grav));
        (records, metadata)
    }

    #[test]
    fn test_single_record_end_to_end() {
        let (records, metadata) = bob_scenario();
        let set = compute_leaderboards(&records, &metadata);
        let key = IdentityKey::user_id("u1");

        for board in [
            &set.speed.overall,
            &set.speed.solo,
            &set.speed.capping,
            &set.jump.overall,
        ] {
            assert_eq!(board.len(), 1);
            let entry = board.get(&key).unwrap();
            assert_eq!(entry.name, "Bob");
            assert_eq!(entry.score, 1);
        }
        assert_eq!(set.combined.overall.score(&key), 2);
        assert_eq!(set.games_completed.score(&key), 1);
        assert_eq!(set.unique_maps_completed.score(&key), 1);
    }

    #[test]
    fn test_recompute_is_identical() {
        let (mut records, metadata) = bob_scenario();
        records.push(
            SessionRecord::new("b", "m1", Utc::now())
                .with_time(4000)
                .with_player(PlayerRef::new("Some Ball 2"))
                .with_player(PlayerRef::new("Ann")),
        );

        let first = compute_leaderboards(&records, &metadata);
        let second = compute_leaderboards(&records, &metadata);
        assert_eq!(first, second);

        let render = |set: &LeaderboardSet| serde_json::to_string(&set.speed.overall.ranked()).unwrap();
        assert_eq!(render(&first), render(&second));
    }

    #[test]
    fn test_classic_map_never_scores_jumps() {
        let mut metadata = MapIndex::new();
        metadata.insert("c".into(), MapMetadata::new("Old", MapKind::Classic));
        let records = vec![SessionRecord::new("a", "c", Utc::now())
            .with_time(100)
            .with_jumps(2)
            .solo()
            .with_capper(PlayerRef::new("Ann"))
            .with_player(PlayerRef::new("Ann"))];

        let set = compute_leaderboards(&records, &metadata);
        assert!(set.jump.overall.is_empty());
        assert!(set.jump.solo.is_empty());
        assert!(set.jump.capping.is_empty());
        assert_eq!(set.speed.overall.len(), 1);
    }

    #[test]
    fn test_only_best_record_scores() {
        let records = vec![
            SessionRecord::new("slow", "m1", Utc::now())
                .with_time(9000)
                .with_player(PlayerRef::new("Ann")),
            SessionRecord::new("fast", "m1", Utc::now())
                .with_time(1000)
                .with_player(PlayerRef::new("Bob")),
        ];

        let set = compute_leaderboards(&records, &MapIndex::new());
        assert!(set.speed.overall.get(&IdentityKey::name("Ann")).is_none());
        assert_eq!(set.speed.overall.score(&IdentityKey::name("Bob")), 1);
        assert_eq!(set.games_completed.score(&IdentityKey::name("Ann")), 1);
    }

    #[test]
    fn test_map_podium() {
        let records = vec![
            SessionRecord::new("a", "m1", Utc::now()).with_time(300),
            SessionRecord::new("b", "m1", Utc::now()).with_time(100),
            SessionRecord::new("c", "m1", Utc::now()).with_time(200),
            SessionRecord::new("d", "m1", Utc::now()).with_time(400),
            SessionRecord::new("e", "m2", Utc::now()).with_time(50),
        ];
        let snapshot = RecordSnapshot::new(records, MapIndex::new());

        let podium = map_podium(&snapshot, "m1", StatKind::Speed, 3);
        let uuids: Vec<_> = podium.iter().map(|r| r.uuid.as_str()).collect();
        assert_eq!(uuids, vec!["b", "c", "a"]);

        assert!(map_podium(&snapshot, "m1", StatKind::Jump, 3).is_empty());
        assert!(map_podium(&snapshot, "nope", StatKind::Speed, 3).is_empty());
    }
}
