//! # GLTP Leaderboard
//!
//! Leaderboards and player profiles computed from gravity-map world
//! record sessions.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (records, map metadata, boards, summaries)
//! - **identity**: Player identity keys and merge groups
//! - **calculate**: Best-record selection, tallies, podiums and profiles
//! - **enrich**: Optional display-name lookups from profile pages
//! - **storage**: Local record and metadata files (JSON, JSONL)
//! - **fetch**: HTTP fetching of the record and metadata feeds
//! - **ingest**: Snapshot assembly from configured sources
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod enrich;
pub mod fetch;
pub mod identity;
pub mod ingest;
pub mod models;
pub mod storage;

pub use models::*;

/// Format a record time in milliseconds as `[h:]mm:ss.mmm`, dropping
/// leading zero units (e.g. `5.020`, `1:02.003`, `1:00:00.000`).
pub fn format_record_time(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let millis = ms % 1000;

    if hours > 0 {
        format!("{}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
    } else if minutes > 0 {
        format!("{}:{:02}.{:03}", minutes, seconds, millis)
    } else {
        format!("{}.{:03}", seconds, millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_record_time_seconds() {
        assert_eq!(format_record_time(5020), "5.020");
        assert_eq!(format_record_time(0), "0.000");
    }

    #[test]
    fn test_format_record_time_minutes() {
        assert_eq!(format_record_time(62_003), "1:02.003");
    }

    #[test]
    fn test_format_record_time_hours() {
        assert_eq!(format_record_time(3_600_000), "1:00:00.000");
        assert_eq!(format_record_time(3_725_450), "1:02:05.450");
    }
}
