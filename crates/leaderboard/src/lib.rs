//! Leaderboard collaborator.
//!
//! Persists finalized [`ScoreRecord`](tetraj_core::ScoreRecord)s behind the
//! core's [`LeaderboardGateway`](tetraj_core::LeaderboardGateway) boundary.
//!
//! - [`provider`]: the `StorageProvider` contract and ranking rules
//! - [`kv`]: key-value store backed provider (plus an in-memory store)
//! - [`redis_store`]: Redis client behind the key-value store seam
//! - [`json_file`]: JSON file provider, the always-available fallback
//! - [`leaderboard`]: provider selection, qualifying check, save and top-N
//! - [`format`]: score, duration and date formatting for tables
//!
//! # Example
//!
//! ```
//! use tetraj_leaderboard::{KvStorageProvider, Leaderboard, MemoryStore};
//!
//! let mut board = Leaderboard::new(vec![Box::new(KvStorageProvider::new(
//!     MemoryStore::new(),
//!     "memory",
//! ))]);
//! assert!(board.is_qualifying_score(1));
//! assert!(board.top_entries().is_empty());
//! ```

pub mod error;
pub mod format;
pub mod json_file;
pub mod kv;
pub mod leaderboard;
pub mod provider;
pub mod redis_store;

use std::path::PathBuf;

pub use error::StoreError;
pub use format::{format_date, format_duration, format_score};
pub use json_file::JsonFileStorageProvider;
pub use kv::{KeyValueStore, KvStorageProvider, MemoryStore, LEADERBOARD_KEY};
pub use leaderboard::{Leaderboard, NO_PROVIDER};
pub use provider::{rank_order, StorageProvider, MAX_ENTRIES};
pub use redis_store::RedisStore;

/// Leaderboard that tries a key-value store first and falls back to the
/// JSON file.
pub fn leaderboard_with_store<S: KeyValueStore + 'static>(
    store: S,
    label: impl Into<String>,
    path: Option<PathBuf>,
) -> Leaderboard {
    let path = path.unwrap_or_else(json_file::default_path);
    Leaderboard::new(vec![
        Box::new(KvStorageProvider::new(store, label)),
        Box::new(JsonFileStorageProvider::new(path)),
    ])
}

/// Leaderboard for the binary: Redis at `redis_url` when one is configured,
/// then the JSON file (`$HOME/tetrajLeaderboard.json` unless a path is given).
pub fn local_leaderboard(path: Option<PathBuf>, redis_url: Option<&str>) -> Leaderboard {
    match redis_url.map(RedisStore::open) {
        Some(Ok(store)) => {
            let label = store.label().to_string();
            leaderboard_with_store(store, label, path)
        }
        Some(Err(e)) => {
            eprintln!("[Leaderboard] Ignoring Redis URL: {}", e);
            json_only(path)
        }
        None => json_only(path),
    }
}

fn json_only(path: Option<PathBuf>) -> Leaderboard {
    let path = path.unwrap_or_else(json_file::default_path);
    Leaderboard::new(vec![Box::new(JsonFileStorageProvider::new(path))])
}
