//! JSONL (JSON Lines) storage.
//!
//! Each line is a valid JSON object representing one record.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::StorageError;

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Write items, replacing the entire file.
    pub fn write_all(&self, items: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;
        let file = File::create(&self.path)?;

        let count = write_lines(BufWriter::new(file), items)?;
        info!("Wrote {} items to {:?}", count, self.path);
        Ok(count)
    }
}

fn write_lines<T: Serialize, W: Write>(mut writer: W, items: &[T]) -> Result<usize, StorageError> {
    for item in items {
        let json = serde_json::to_string(item)?;
        writeln!(writer, "{}", json)?;
    }
    writer.flush()?;
    Ok(items.len())
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Read all items. Blank lines are ignored; unparseable lines are
    /// logged and skipped. A missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut items = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(item) => items.push(item),
                Err(e) => {
                    warn!("Failed to parse line {} in {:?}: {}", idx + 1, self.path, e);
                }
            }
        }

        debug!("Read {} items from {:?}", items.len(), self.path);
        Ok(items)
    }
}
