//! Storage provider contract and ranking rules shared by every backend.

use std::cmp::Ordering;

use tetraj_core::ScoreRecord;

use crate::error::StoreError;

/// Entries kept on the board
pub const MAX_ENTRIES: usize = 10;

/// A place the leaderboard can live
pub trait StorageProvider: Send {
    /// Human readable backend name, credentials masked
    fn name(&self) -> String;

    /// Connect or load. Called once before `is_available` is consulted.
    fn initialize(&mut self);

    fn is_available(&self) -> bool;

    /// Insert an entry, keeping only the top `MAX_ENTRIES`
    fn save(&mut self, entry: &ScoreRecord) -> Result<(), StoreError>;

    /// Ranked entries, best first
    fn top(&mut self) -> Result<Vec<ScoreRecord>, StoreError>;
}

/// Higher score first; on equal scores the older entry wins.
pub fn rank_order(a: &ScoreRecord, b: &ScoreRecord) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.timestamp.cmp(&b.timestamp))
}

/// Sort and truncate to the board size
pub fn rank(mut entries: Vec<ScoreRecord>) -> Vec<ScoreRecord> {
    entries.sort_by(rank_order);
    entries.truncate(MAX_ENTRIES);
    entries
}

/// `entries` plus `entry`, ranked and truncated
pub fn with_entry(entries: &[ScoreRecord], entry: &ScoreRecord) -> Vec<ScoreRecord> {
    let mut all = Vec::with_capacity(entries.len() + 1);
    all.extend_from_slice(entries);
    all.push(entry.clone());
    rank(all)
}
