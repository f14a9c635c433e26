//! Per-map best record selection and ranking.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{MapIndex, SessionRecord, StatKind};

impl StatKind {
    /// Whether a record can be ranked for this stat.
    ///
    /// Jump records additionally need map metadata that tracks jumps;
    /// unknown maps are skipped rather than defaulted.
    pub fn qualifies(&self, record: &SessionRecord, metadata: &MapIndex) -> bool {
        match self {
            StatKind::Speed => record.record_time.is_some(),
            StatKind::Jump => {
                record.total_jumps.is_some()
                    && metadata
                        .get(&record.map_id)
                        .is_some_and(|meta| meta.tracks_jumps())
            }
        }
    }

    /// Ranking order between two qualifying records (better first).
    ///
    /// Speed: ascending time. Jump: ascending jumps, then ascending time.
    /// Remaining ties are left equal so stable sorts keep encounter order.
    pub fn compare(&self, a: &SessionRecord, b: &SessionRecord) -> Ordering {
        let time = |r: &SessionRecord| r.record_time.unwrap_or(u64::MAX);
        match self {
            StatKind::Speed => time(a).cmp(&time(b)),
            StatKind::Jump => {
                let jumps = |r: &SessionRecord| r.total_jumps.unwrap_or(u32::MAX);
                jumps(a)
                    .cmp(&jumps(b))
                    .then_with(|| time(a).cmp(&time(b)))
            }
        }
    }
}

/// Best record among one map's records, first encountered winning ties.
pub fn select_best<'a, I>(records: I, stat: StatKind, metadata: &MapIndex) -> Option<&'a SessionRecord>
where
    I: IntoIterator<Item = &'a SessionRecord>,
{
    records
        .into_iter()
        .filter(|r| stat.qualifies(r, metadata))
        .min_by(|a, b| stat.compare(a, b))
}

/// Qualifying records grouped by map and ordered best-first.
#[derive(Debug, Clone)]
pub struct RankedMaps<'a> {
    by_map: BTreeMap<&'a str, Vec<&'a SessionRecord>>,
}

impl<'a> RankedMaps<'a> {
    /// Ordered records for a map (empty for unknown maps).
    pub fn records_for(&self, map_id: &str) -> &[&'a SessionRecord] {
        self.by_map.get(map_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn best(&self, map_id: &str) -> Option<&'a SessionRecord> {
        self.records_for(map_id).first().copied()
    }

    /// Best record of every map, in map id order.
    pub fn best_records(&self) -> impl Iterator<Item = &'a SessionRecord> + '_ {
        self.by_map.values().filter_map(|list| list.first().copied())
    }

    /// Every map with its ordered records.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &[&'a SessionRecord])> + '_ {
        self.by_map.iter().map(|(map, list)| (*map, list.as_slice()))
    }

    pub fn map_count(&self) -> usize {
        self.by_map.len()
    }
}

/// Group qualifying records by map and sort each group best-first.
///
/// The sort is stable, so `records_for(map)[0]` is always the record
/// [`select_best`] picks for that map.
pub fn rank_by_map<'a>(records: &'a [SessionRecord], stat: StatKind, metadata: &MapIndex) -> RankedMaps<'a> {
    let mut by_map: BTreeMap<&'a str, Vec<&'a SessionRecord>> = BTreeMap::new();
    let mut missing_metadata = 0usize;

    for record in records {
        if stat == StatKind::Jump && !metadata.contains_key(&record.map_id) {
            missing_metadata += 1;
            continue;
        }
        if stat.qualifies(record, metadata) {
            by_map.entry(record.map_id.as_str()).or_default().push(record);
        }
    }

    for list in by_map.values_mut() {
        list.sort_by(|a, b| stat.compare(a, b));
    }

    if missing_metadata > 0 {
        debug!(
            "Skipped {} records without map metadata for {} ranking",
            missing_metadata, stat
        );
    }

    RankedMaps { by_map }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MapKind, MapMetadata};
    use chrono::Utc;

    fn rec(uuid: &str, map: &str) -> SessionRecord {
        SessionRecord::new(uuid, map, Utc::now())
    }

    fn grav_index(maps: &[&str]) -> MapIndex {
        maps.iter()
            .map(|m| (m.to_string(), MapMetadata::new(*m, MapKind::Grav)))
            .collect()
    }

    #[test]
    fn test_speed_best_is_fastest() {
        let records = vec![rec("slow", "m1").with_time(1200), rec("fast", "m1").with_time(1000)];
        let best = select_best(&records, StatKind::Speed, &MapIndex::new()).unwrap();
        assert_eq!(best.uuid, "fast");
    }

    #[test]
    fn test_speed_tie_keeps_first_encountered() {
        let records = vec![rec("first", "m1").with_time(1000), rec("second", "m1").with_time(1000)];
        let best = select_best(&records, StatKind::Speed, &MapIndex::new()).unwrap();
        assert_eq!(best.uuid, "first");

        let ranked = rank_by_map(&records, StatKind::Speed, &MapIndex::new());
        assert_eq!(ranked.best("m1").unwrap().uuid, "first");
    }

    #[test]
    fn test_speed_ignores_unfinished() {
        let records = vec![rec("dnf", "m1").with_jumps(1), rec("done", "m1").with_time(5000)];
        let best = select_best(&records, StatKind::Speed, &MapIndex::new()).unwrap();
        assert_eq!(best.uuid, "done");
        assert!(select_best(&records[..1], StatKind::Speed, &MapIndex::new()).is_none());
    }

    #[test]
    fn test_jump_tie_broken_by_time() {
        let records = vec![
            rec("a", "m1").with_jumps(5).with_time(900),
            rec("b", "m1").with_jumps(5).with_time(800),
        ];
        let best = select_best(&records, StatKind::Jump, &grav_index(&["m1"])).unwrap();
        assert_eq!(best.uuid, "b");
    }

    #[test]
    fn test_jump_requires_metadata() {
        let records = vec![rec("a", "unknown").with_jumps(3).with_time(100)];
        assert!(select_best(&records, StatKind::Jump, &MapIndex::new()).is_none());
        assert_eq!(rank_by_map(&records, StatKind::Jump, &MapIndex::new()).map_count(), 0);
    }

    #[test]
    fn test_jump_excludes_classic_and_zero_jump_maps() {
        let mut metadata = MapIndex::new();
        metadata.insert("classic".into(), MapMetadata::new("C", MapKind::Classic));
        metadata.insert(
            "flat".into(),
            MapMetadata::new("F", MapKind::Grav).with_category("0 jump"),
        );
        let records = vec![
            rec("a", "classic").with_jumps(3).with_time(100),
            rec("b", "flat").with_jumps(0).with_time(100),
        ];

        let ranked = rank_by_map(&records, StatKind::Jump, &metadata);
        assert_eq!(ranked.map_count(), 0);
    }

    #[test]
    fn test_ranked_list_head_matches_best() {
        let metadata = grav_index(&["m1", "m2"]);
        let records = vec![
            rec("a", "m1").with_jumps(7).with_time(3000),
            rec("b", "m2").with_jumps(2).with_time(9000),
            rec("c", "m1").with_jumps(4).with_time(5000),
            rec("d", "m1").with_jumps(4).with_time(4000),
            rec("e", "m2").with_time(1000),
        ];

        for stat in [StatKind::Speed, StatKind::Jump] {
            let ranked = rank_by_map(&records, stat, &metadata);
            for (map, list) in ranked.iter() {
                let on_map = records.iter().filter(|r| r.map_id == map);
                let best = select_best(on_map, stat, &metadata).unwrap();
                assert_eq!(list[0].uuid, best.uuid);
            }
        }

        let jump = rank_by_map(&records, StatKind::Jump, &metadata);
        let order: Vec<_> = jump.records_for("m1").iter().map(|r| r.uuid.as_str()).collect();
        assert_eq!(order, vec!["d", "c", "a"]);
        assert_eq!(jump.records_for("m2").len(), 1);

        let speed = rank_by_map(&records, StatKind::Speed, &metadata);
        let best: Vec<_> = speed.best_records().map(|r| r.uuid.as_str()).collect();
        assert_eq!(best, vec!["a", "e"]);
    }
}
