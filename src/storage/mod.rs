//! Local record and metadata files.
//!
//! Records are stored either as a JSON array or as JSONL (one record per
//! line). Map metadata is a single JSON object keyed by map id.

pub mod jsonl;

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{MapIndex, SessionRecord};

pub use jsonl::{JsonlReader, JsonlWriter};

/// Filename used for snapshot record files.
pub const RECORDS_FILE: &str = "records.jsonl";

/// Filename used for snapshot metadata files.
pub const METADATA_FILE: &str = "map_metadata.json";

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

fn is_jsonl(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jsonl"))
}

/// Load session records from a `.jsonl` file or a JSON array file.
pub fn load_records(path: &Path) -> Result<Vec<SessionRecord>, StorageError> {
    if !path.exists() {
        return Err(StorageError::PathNotFound(path.to_path_buf()));
    }

    let records = if is_jsonl(path) {
        JsonlReader::new(path.to_path_buf()).read_all()?
    } else {
        let reader = BufReader::new(File::open(path)?);
        serde_json::from_reader::<_, Vec<SessionRecord>>(reader)?
    };

    info!("Loaded {} records from {:?}", records.len(), path);
    Ok(records)
}

/// Load the map metadata object.
pub fn load_metadata(path: &Path) -> Result<MapIndex, StorageError> {
    if !path.exists() {
        return Err(StorageError::PathNotFound(path.to_path_buf()));
    }

    let reader = BufReader::new(File::open(path)?);
    let metadata: MapIndex = serde_json::from_reader(reader)?;

    debug!("Loaded metadata for {} maps from {:?}", metadata.len(), path);
    Ok(metadata)
}

/// Write a value as pretty JSON, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Write records and metadata into `dir` in the layout `load_records`
/// and `load_metadata` read back.
pub fn write_snapshot(
    dir: &Path,
    records: &[SessionRecord],
    metadata: &MapIndex,
) -> Result<(PathBuf, PathBuf), StorageError> {
    let records_path = dir.join(RECORDS_FILE);
    let metadata_path = dir.join(METADATA_FILE);

    JsonlWriter::new(records_path.clone()).write_all(records)?;
    write_json(&metadata_path, metadata)?;

    info!(
        "Wrote snapshot of {} records and {} maps to {:?}",
        records.len(),
        metadata.len(),
        dir
    );
    Ok((records_path, metadata_path))
}
