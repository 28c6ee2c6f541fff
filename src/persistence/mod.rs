//! Record persistence
//!
//! The leaderboard is stored as a JSON list of `{name, score, distance}`.
//! Loading never fails: a missing or corrupt file is an empty board.
//! Writes go to a temporary file first and are renamed into place.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::highscores::{Record, Records};

/// Default records file name
pub const DEFAULT_RECORDS_FILE: &str = "records.json";

/// Storage backend for the leaderboard
pub trait RecordStore {
    /// Load the leaderboard (empty on any failure)
    fn load(&self) -> Records;

    /// Persist the leaderboard
    fn save(&self, records: &Records) -> Result<()>;
}

/// Leaderboard stored in a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DEFAULT_RECORDS_FILE.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> Records {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("No records at {} ({}), starting fresh", self.path.display(), e);
                return Records::new();
            }
        };

        match serde_json::from_str::<Vec<Record>>(&json) {
            Ok(entries) => {
                log::info!("Loaded {} records", entries.len());
                Records::from_entries(entries)
            }
            Err(e) => {
                log::warn!("Ignoring corrupt records file {}: {}", self.path.display(), e);
                Records::new()
            }
        }
    }

    fn save(&self, records: &Records) -> Result<()> {
        let json = serde_json::to_string_pretty(records).context("encoding records")?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        log::info!("Records saved ({} entries)", records.len());
        Ok(())
    }
}

/// In-memory store (tests, or when no file should be touched)
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RefCell<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn load(&self) -> Records {
        self.records.borrow().clone()
    }

    fn save(&self, records: &Records) -> Result<()> {
        *self.records.borrow_mut() = records.clone();
        Ok(())
    }
}

/// Load, upsert and save a player's run
///
/// Returns the player's rank after the update. A failed write is logged
/// and otherwise ignored; the run is never lost to the caller.
pub fn save_record(store: &dyn RecordStore, name: &str, score: u64, distance: u64) -> Option<usize> {
    let mut records = store.load();
    let rank = records.upsert(name, score, distance);
    if let Err(e) = store.save(&records) {
        log::warn!("Could not save records: {:#}", e);
    }
    rank
}
