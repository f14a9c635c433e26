//! Leaderboard tallying.
//!
//! Every category is a fold over records. Within one record, player
//! slots are first resolved to identity keys and de-duplicated
//! ([`dedup_credits`]); each distinct key then scores exactly once.

use std::collections::{BTreeMap, BTreeSet};

use crate::identity::{has_stable_identity, resolve_display_name, resolve_key};
use crate::models::{Category, IdentityKey, Leaderboard, LeaderboardEntry, PlayerRef, SessionRecord};

/// One identity credited by a record, with the slot it was first seen in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credit<'p> {
    pub key: IdentityKey,
    pub player: &'p PlayerRef,
}

/// Resolve a record's slots to distinct identities, in encounter order.
///
/// Returns the credits together with the set of keys seen.
pub fn dedup_credits<'p, I>(players: I) -> (Vec<Credit<'p>>, BTreeSet<IdentityKey>)
where
    I: IntoIterator<Item = &'p PlayerRef>,
{
    let mut seen = BTreeSet::new();
    let mut credits = Vec::new();
    for player in players {
        let key = resolve_key(player);
        if seen.insert(key.clone()) {
            credits.push(Credit { key, player });
        }
    }
    (credits, seen)
}

/// Score accumulator for a single leaderboard.
#[derive(Debug, Default)]
pub struct Tally {
    entries: BTreeMap<IdentityKey, LeaderboardEntry>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit each distinct identity among `players` once.
    pub fn credit_record<'p, I>(&mut self, players: I) -> BTreeSet<IdentityKey>
    where
        I: IntoIterator<Item = &'p PlayerRef>,
    {
        let (credits, seen) = dedup_credits(players);
        for credit in credits {
            self.add(credit.key, credit.player, 1);
        }
        seen
    }

    fn add(&mut self, key: IdentityKey, player: &PlayerRef, points: u32) {
        self.entries
            .entry(key)
            .or_insert_with_key(|key| new_entry(key, player))
            .score += points;
    }

    pub fn finish(self) -> Leaderboard {
        Leaderboard::from_entries(self.entries)
    }
}

fn new_entry(key: &IdentityKey, player: &PlayerRef) -> LeaderboardEntry {
    let has_player_id = has_stable_identity(player);
    LeaderboardEntry {
        key: key.clone(),
        name: resolve_display_name(player).to_string(),
        score: 0,
        user_id: if has_player_id {
            player.user_id().map(str::to_string)
        } else {
            None
        },
        has_player_id,
    }
}

/// Tally one category over a record source.
///
/// `GamesCompleted` and `UniqueMapsCompleted` expect raw records and
/// skip unfinished ones; the other categories expect one best record
/// per map. `Solo` skips team records, `Capping` credits only the
/// capping player.
pub fn tally<'a, I>(category: Category, records: I) -> Leaderboard
where
    I: IntoIterator<Item = &'a SessionRecord>,
{
    match category {
        Category::UniqueMapsCompleted => tally_unique_maps(records),
        Category::GamesCompleted => fold_records(records, |r| r.is_completed()),
        Category::Overall => fold_records(records, |_| true),
        Category::Solo => fold_records(records, |r| r.is_solo),
        Category::Capping => {
            let mut tally = Tally::new();
            for record in records {
                if let Some(capper) = record.capping_ref() {
                    tally.credit_record(std::iter::once(&capper));
                }
            }
            tally.finish()
        }
    }
}

fn fold_records<'a, I, F>(records: I, include: F) -> Leaderboard
where
    I: IntoIterator<Item = &'a SessionRecord>,
    F: Fn(&SessionRecord) -> bool,
{
    let mut tally = Tally::new();
    for record in records.into_iter().filter(|r| include(r)) {
        tally.credit_record(&record.players);
    }
    tally.finish()
}

fn tally_unique_maps<'a, I>(records: I) -> Leaderboard
where
    I: IntoIterator<Item = &'a SessionRecord>,
{
    let mut maps: BTreeMap<IdentityKey, (LeaderboardEntry, BTreeSet<&'a str>)> = BTreeMap::new();

    for record in records.into_iter().filter(|r| r.is_completed()) {
        let (credits, _) = dedup_credits(&record.players);
        for credit in credits {
            let (_, touched) = maps
                .entry(credit.key)
                .or_insert_with_key(|key| (new_entry(key, credit.player), BTreeSet::new()));
            touched.insert(record.map_id.as_str());
        }
    }

    Leaderboard::from_entries(
        maps.into_iter()
            .map(|(key, (mut entry, touched))| {
                entry.score = touched.len() as u32;
                (key, entry)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn rec(uuid: &str, map: &str) -> SessionRecord {
        SessionRecord::new(uuid, map, Utc::now()).with_time(1000)
    }

    #[test]
    fn test_dedup_credits_within_record() {
        let players = vec![
            PlayerRef::new("Bob").with_user_id("u1"),
            PlayerRef::new("Bobby").with_user_id("u1"),
            PlayerRef::new("Ann"),
            PlayerRef::new("Some Ball 1"),
            PlayerRef::new("some ball 2"),
        ];

        let (credits, seen) = dedup_credits(&players);
        assert_eq!(credits.len(), 3);
        assert_eq!(seen.len(), 3);
        assert_eq!(credits[0].player.name, "Bob");
        assert!(seen.contains(&IdentityKey::Anonymous));
    }

    #[test]
    fn test_games_completed_once_per_record() {
        let records = vec![
            rec("a", "m1")
                .with_player(PlayerRef::new("Bob").with_user_id("u1"))
                .with_player(PlayerRef::new("Bob").with_user_id("u1")),
            rec("b", "m2").with_player(PlayerRef::new("Bob").with_user_id("u1")),
            SessionRecord::new("dnf", "m3", Utc::now())
                .with_player(PlayerRef::new("Bob").with_user_id("u1")),
        ];

        let lb = tally(Category::GamesCompleted, &records);
        assert_eq!(lb.score(&IdentityKey::user_id("u1")), 2);
    }

    #[test]
    fn test_anonymous_collapse_counts_records_not_slots() {
        let records = vec![
            rec("a", "m1")
                .with_player(PlayerRef::new("Some Ball"))
                .with_player(PlayerRef::new("some ball 2")),
            rec("b", "m1").with_player(PlayerRef::new("SOME BALL 10")),
            rec("c", "m2").with_player(PlayerRef::new("Ann")),
        ];

        let lb = tally(Category::GamesCompleted, &records);
        let anon = lb.get(&IdentityKey::Anonymous).unwrap();
        assert_eq!(anon.score, 2);
        assert_eq!(anon.name, "Some Balls");
        assert!(!anon.has_player_id);
    }

    #[test]
    fn test_unique_maps_counts_distinct_map_ids() {
        let records = vec![
            rec("a", "m1").with_player(PlayerRef::new("Ann")),
            rec("b", "m1").with_player(PlayerRef::new("Ann")),
            rec("c", "m2").with_player(PlayerRef::new("Ann")),
            SessionRecord::new("dnf", "m3", Utc::now()).with_player(PlayerRef::new("Ann")),
        ];

        let lb = tally(Category::UniqueMapsCompleted, &records);
        assert_eq!(lb.score(&IdentityKey::name("Ann")), 2);
    }

    #[test]
    fn test_solo_only_counts_solo_records() {
        let records = vec![
            rec("a", "m1").solo().with_player(PlayerRef::new("Ann")),
            rec("b", "m2")
                .with_player(PlayerRef::new("Ann"))
                .with_player(PlayerRef::new("Bob")),
        ];

        let lb = tally(Category::Solo, &records);
        assert_eq!(lb.score(&IdentityKey::name("Ann")), 1);
        assert!(lb.get(&IdentityKey::name("Bob")).is_none());
    }

    #[test]
    fn test_capping_credits_capper_once() {
        let records = vec![
            rec("a", "m1")
                .with_player(PlayerRef::new("Ann"))
                .with_player(PlayerRef::new("Bob").with_user_id("u1"))
                .with_capper(PlayerRef::new("Bob").with_user_id("u1")),
            rec("b", "m2").with_player(PlayerRef::new("Ann")),
        ];

        let lb = tally(Category::Capping, &records);
        assert_eq!(lb.len(), 1);
        let bob = lb.get(&IdentityKey::user_id("u1")).unwrap();
        assert_eq!(bob.score, 1);
        assert_eq!(bob.user_id.as_deref(), Some("u1"));
        assert!(bob.has_player_id);
    }

    #[test]
    fn test_entry_keeps_first_seen_name() {
        let records = vec![
            rec("a", "m1").with_player(PlayerRef::new("Bob").with_user_id("u1")),
            rec("b", "m2").with_player(PlayerRef::new("Robert").with_user_id("u1")),
        ];

        let lb = tally(Category::Overall, &records);
        let entry = lb.get(&IdentityKey::user_id("u1")).unwrap();
        assert_eq!(entry.name, "Bob");
        assert_eq!(entry.score, 2);
    }
}
