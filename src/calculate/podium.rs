//! Podium (top-N) lookups and badge counting.

use crate::identity::{resolve_key, EffectiveIdentity};
use crate::models::{Badge, BadgeCounts, IdentityKey, PlayerRef, SessionRecord};

use super::best::RankedMaps;

/// Slice size for the gold badge.
pub const GOLD_RANK: usize = 1;

/// Slice size for the podium (gold or bronze) badges.
pub const PODIUM_RANK: usize = 3;

/// Something a player slot can be tested against.
pub trait IdentityMatcher {
    fn matches_player(&self, player: &PlayerRef) -> bool;
}

impl IdentityMatcher for IdentityKey {
    fn matches_player(&self, player: &PlayerRef) -> bool {
        resolve_key(player) == *self
    }
}

impl IdentityMatcher for EffectiveIdentity {
    fn matches_player(&self, player: &PlayerRef) -> bool {
        self.matches(player)
    }
}

/// First `n` records of an ordered per-map list.
pub fn top_n<'r, 'a>(ordered: &'r [&'a SessionRecord], n: usize) -> &'r [&'a SessionRecord] {
    &ordered[..n.min(ordered.len())]
}

/// Whether any record in the slice has a player or capper matching `identity`.
pub fn holds_rank<M: IdentityMatcher + ?Sized>(slice: &[&SessionRecord], identity: &M) -> bool {
    slice.iter().any(|record| {
        record.players.iter().any(|p| identity.matches_player(p))
            || record
                .capping_ref()
                .is_some_and(|c| identity.matches_player(&c))
    })
}

/// Badge held on one map. Gold suppresses bronze.
pub fn badge_for<M: IdentityMatcher + ?Sized>(ordered: &[&SessionRecord], identity: &M) -> Option<Badge> {
    if holds_rank(top_n(ordered, GOLD_RANK), identity) {
        Some(Badge::Gold)
    } else if holds_rank(top_n(ordered, PODIUM_RANK), identity) {
        Some(Badge::Bronze)
    } else {
        None
    }
}

/// Number of distinct maps where `identity` appears in the top-`n` slice.
pub fn count_across_maps<M: IdentityMatcher + ?Sized>(ranked: &RankedMaps<'_>, identity: &M, n: usize) -> u32 {
    ranked
        .iter()
        .filter(|(_, ordered)| holds_rank(top_n(ordered, n), identity))
        .count() as u32
}

/// Gold and bronze badges across every ranked map.
pub fn badge_counts<M: IdentityMatcher + ?Sized>(ranked: &RankedMaps<'_>, identity: &M) -> BadgeCounts {
    let mut counts = BadgeCounts::default();
    for (_, ordered) in ranked.iter() {
        if let Some(badge) = badge_for(ordered, identity) {
            counts.add(badge);
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::best::rank_by_map;
    use crate::identity::MergeGroups;
    use crate::models::{MapIndex, MapKind, MapMetadata, StatKind};
    use chrono::Utc;

    fn rec(uuid: &str, map: &str, time: u64, player: PlayerRef) -> SessionRecord {
        SessionRecord::new(uuid, map, Utc::now())
            .with_time(time)
            .with_player(player)
    }

    fn bob() -> PlayerRef {
        PlayerRef::new("Bob").with_user_id("u1")
    }

    #[test]
    fn test_top_n_bounds() {
        let records = vec![rec("a", "m1", 1, bob()), rec("b", "m1", 2, bob())];
        let ordered: Vec<&SessionRecord> = records.iter().collect();

        assert_eq!(top_n(&ordered, 1).len(), 1);
        assert_eq!(top_n(&ordered, 3).len(), 2);
        assert!(top_n(&ordered, 0).is_empty());
    }

    #[test]
    fn test_holds_rank_via_capping_slot() {
        let record = rec("a", "m1", 1, PlayerRef::new("Ann"))
            .with_capper(PlayerRef::new("Cap").with_user_id("u5"));
        let slice = [&record];

        assert!(holds_rank(&slice, &IdentityKey::user_id("u5")));
        assert!(holds_rank(&slice, &IdentityKey::name("Ann")));
        assert!(!holds_rank(&slice, &IdentityKey::name("Cap")));
    }

    #[test]
    fn test_gold_suppresses_bronze() {
        let records = vec![
            rec("a", "m1", 100, bob()),
            rec("b", "m1", 200, bob()),
            rec("c", "m1", 300, PlayerRef::new("Ann")),
            rec("d", "m2", 100, PlayerRef::new("Ann")),
            rec("e", "m2", 150, bob()),
            rec("f", "m3", 100, PlayerRef::new("Ann")),
            rec("g", "m3", 110, PlayerRef::new("Ann")),
            rec("h", "m3", 120, PlayerRef::new("Ann")),
            rec("i", "m3", 130, bob()),
        ];
        let ranked = rank_by_map(&records, StatKind::Speed, &MapIndex::new());
        let key = IdentityKey::user_id("u1");

        assert_eq!(badge_for(ranked.records_for("m1"), &key), Some(Badge::Gold));
        assert_eq!(badge_for(ranked.records_for("m2"), &key), Some(Badge::Bronze));
        assert_eq!(badge_for(ranked.records_for("m3"), &key), None);

        let counts = badge_counts(&ranked, &key);
        assert_eq!(counts, BadgeCounts { gold: 1, bronze: 1 });
        assert_eq!(count_across_maps(&ranked, &key, GOLD_RANK), 1);
        assert_eq!(count_across_maps(&ranked, &key, PODIUM_RANK), counts.top_3());
    }

    #[test]
    fn test_jump_badges_skip_classic_maps() {
        let mut metadata = MapIndex::new();
        metadata.insert("grav".into(), MapMetadata::new("G", MapKind::Grav));
        metadata.insert("classic".into(), MapMetadata::new("C", MapKind::Classic));
        let records = vec![
            rec("a", "grav", 100, bob()).with_jumps(3),
            rec("b", "classic", 100, bob()).with_jumps(1),
        ];

        let speed = rank_by_map(&records, StatKind::Speed, &metadata);
        let jump = rank_by_map(&records, StatKind::Jump, &metadata);
        let key = IdentityKey::user_id("u1");

        assert_eq!(count_across_maps(&speed, &key, GOLD_RANK), 2);
        assert_eq!(count_across_maps(&jump, &key, GOLD_RANK), 1);
    }

    #[test]
    fn test_group_identity_matches_podium() {
        let groups = MergeGroups::from([(
            "bob".to_string(),
            crate::identity::MergeGroup {
                user_ids: vec!["u1".to_string(), "u2".to_string()],
                names: vec![],
            },
        )]);
        let records = vec![
            rec("a", "m1", 100, PlayerRef::new("Alt").with_user_id("u2")),
            rec("b", "m2", 100, bob()),
        ];
        let ranked = rank_by_map(&records, StatKind::Speed, &MapIndex::new());
        let identity = EffectiveIdentity::resolve("u1", &groups);

        assert_eq!(badge_counts(&ranked, &identity).gold, 2);
    }
}
