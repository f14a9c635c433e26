//! Immutable input snapshot.

use chrono::{DateTime, Utc};

use super::{MapIndex, SessionRecord};

/// Records and metadata fetched together.
///
/// A snapshot is never mutated; a refresh builds a new one and every
/// derived structure is recomputed from it.
#[derive(Debug, Clone)]
pub struct RecordSnapshot {
    pub records: Vec<SessionRecord>,
    pub metadata: MapIndex,
    pub loaded_at: DateTime<Utc>,
}

impl RecordSnapshot {
    pub fn new(records: Vec<SessionRecord>, metadata: MapIndex) -> Self {
        Self {
            records,
            metadata,
            loaded_at: Utc::now(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), MapIndex::new())
    }

    /// Number of finished records.
    pub fn completed_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_completed()).count()
    }
}
