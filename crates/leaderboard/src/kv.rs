//! Key-value store backed provider.
//!
//! The whole board is one JSON list stored under [`LEADERBOARD_KEY`]. Several
//! game instances may share the store, so every save re-reads the list first.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tetraj_core::ScoreRecord;

use crate::error::StoreError;
use crate::provider::{rank, with_entry, StorageProvider};

pub const LEADERBOARD_KEY: &str = "tetraj:leaderboard";

/// Minimal string key-value store
pub trait KeyValueStore: Send {
    /// Health check; a healthy store answers "PONG"
    fn ping(&mut self) -> Result<String, StoreError>;
    fn get(&mut self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-process store. Clones share the same map, like two clients of one server.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<HashMap<String, String>>>,
    offline: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails, for exercising fallbacks
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.offline {
            return Err(StoreError::Unavailable("memory store".into()));
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.data
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store (poisoned)".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn ping(&mut self) -> Result<String, StoreError> {
        self.check()?;
        Ok("PONG".into())
    }

    fn get(&mut self, key: &str) -> Result<Option<String>, StoreError> {
        self.check()?;
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check()?;
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub struct KvStorageProvider<S> {
    store: S,
    label: String,
    available: bool,
}

impl<S: KeyValueStore> KvStorageProvider<S> {
    /// `label` names the backend in logs, e.g. a masked connection string
    pub fn new(store: S, label: impl Into<String>) -> Self {
        Self {
            store,
            label: label.into(),
            available: false,
        }
    }

    fn load(&mut self) -> Result<Vec<ScoreRecord>, StoreError> {
        match self.store.get(LEADERBOARD_KEY)? {
            Some(json) if !json.trim().is_empty() => Ok(rank(serde_json::from_str(&json)?)),
            _ => Ok(Vec::new()),
        }
    }

    /// Connection failures take the provider offline; bad data does not.
    fn note_failure(&mut self, err: &StoreError) {
        if !matches!(err, StoreError::Json(_)) {
            self.available = false;
        }
    }
}

impl<S: KeyValueStore> StorageProvider for KvStorageProvider<S> {
    fn name(&self) -> String {
        format!("KeyValue ({})", self.label)
    }

    fn initialize(&mut self) {
        self.available = match self.store.ping() {
            Ok(reply) if reply == "PONG" => true,
            Ok(reply) => {
                eprintln!("[Leaderboard] Unexpected ping reply from {}: {}", self.name(), reply);
                false
            }
            Err(e) => {
                eprintln!("[Leaderboard] Failed to connect to {}: {}", self.name(), e);
                false
            }
        };
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn save(&mut self, entry: &ScoreRecord) -> Result<(), StoreError> {
        if !self.available {
            return Err(StoreError::Unavailable(self.name()));
        }

        // Entries may have been updated by another game instance
        let result = self.load().and_then(|current| {
            let json = serde_json::to_string(&with_entry(&current, entry))?;
            self.store.set(LEADERBOARD_KEY, &json)
        });
        if let Err(e) = &result {
            self.note_failure(e);
        }
        result
    }

    fn top(&mut self) -> Result<Vec<ScoreRecord>, StoreError> {
        if !self.available {
            return Err(StoreError::Unavailable(self.name()));
        }
        let result = self.load();
        if let Err(e) = &result {
            self.note_failure(e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(score: u64) -> ScoreRecord {
        ScoreRecord {
            player_id: "p".into(),
            nickname: "P".into(),
            score,
            level: 0,
            lines: 0,
            timestamp: Utc::now(),
            duration_ms: 0,
        }
    }

    #[test]
    fn unavailable_until_initialized() {
        let mut provider = KvStorageProvider::new(MemoryStore::new(), "mem");
        assert!(!provider.is_available());
        assert!(matches!(provider.save(&entry(1)), Err(StoreError::Unavailable(_))));

        provider.initialize();
        assert!(provider.is_available());
        provider.save(&entry(1)).unwrap();
        assert_eq!(provider.top().unwrap().len(), 1);
    }

    #[test]
    fn offline_store_fails_initialization() {
        let mut provider = KvStorageProvider::new(MemoryStore::offline(), "down");
        provider.initialize();
        assert!(!provider.is_available());
    }

    #[test]
    fn save_merges_entries_written_by_another_instance() {
        let shared = MemoryStore::new();
        let mut a = KvStorageProvider::new(shared.clone(), "a");
        let mut b = KvStorageProvider::new(shared, "b");
        a.initialize();
        b.initialize();

        a.save(&entry(100)).unwrap();
        b.save(&entry(300)).unwrap();
        a.save(&entry(200)).unwrap();

        let scores: Vec<u64> = a.top().unwrap().iter().map(|e| e.score).collect();
        assert_eq!(scores, [300, 200, 100]);
    }

    #[test]
    fn stores_json_under_the_leaderboard_key() {
        let mut store = MemoryStore::new();
        let mut provider = KvStorageProvider::new(store.clone(), "mem");
        provider.initialize();
        provider.save(&entry(42)).unwrap();

        let raw = store.get(LEADERBOARD_KEY).unwrap().unwrap();
        let parsed: Vec<ScoreRecord> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed[0].score, 42);
    }

    #[test]
    fn corrupt_value_is_an_error_but_keeps_provider_online() {
        let mut store = MemoryStore::new();
        store.set(LEADERBOARD_KEY, "{not json").unwrap();
        let mut provider = KvStorageProvider::new(store, "mem");
        provider.initialize();
        assert!(matches!(provider.top(), Err(StoreError::Json(_))));
        assert!(provider.is_available());
    }
}
