//! JSON file provider; the local fallback that is always available.

use std::fs;
use std::path::{Path, PathBuf};

use tetraj_core::ScoreRecord;

use crate::error::StoreError;
use crate::provider::{rank, with_entry, StorageProvider};

pub const LEADERBOARD_FILENAME: &str = "tetrajLeaderboard.json";

/// `$HOME/tetrajLeaderboard.json`, or the working directory without a home
pub fn default_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(LEADERBOARD_FILENAME)
}

pub struct JsonFileStorageProvider {
    path: PathBuf,
    entries: Vec<ScoreRecord>,
}

impl JsonFileStorageProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, entries: &[ScoreRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn load(&self) -> Result<Vec<ScoreRecord>, StoreError> {
        let raw = fs::read_to_string(&self.path)?;
        Ok(rank(serde_json::from_str(&raw)?))
    }
}

impl StorageProvider for JsonFileStorageProvider {
    fn name(&self) -> String {
        format!("JSON ({})", self.path.display())
    }

    fn initialize(&mut self) {
        if self.path.exists() {
            match self.load() {
                Ok(entries) => {
                    self.entries = entries;
                    return;
                }
                Err(e) => {
                    eprintln!("[Leaderboard] Failed to load {}: {}", self.name(), e);
                    eprintln!("[Leaderboard] Starting with empty leaderboard");
                }
            }
        }

        self.entries.clear();
        if let Err(e) = self.write(&[]) {
            eprintln!("[Leaderboard] Could not create {}: {}", self.name(), e);
        }
    }

    fn is_available(&self) -> bool {
        // The file system is assumed reachable; write errors surface on save
        true
    }

    fn save(&mut self, entry: &ScoreRecord) -> Result<(), StoreError> {
        let updated = with_entry(&self.entries, entry);
        self.write(&updated)?;
        self.entries = updated;
        Ok(())
    }

    fn top(&mut self) -> Result<Vec<ScoreRecord>, StoreError> {
        Ok(self.entries.clone())
    }
}
