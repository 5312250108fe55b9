//! Leaderboard front: picks a storage backend and ranks entries.

use tetraj_core::{GatewayError, LeaderboardGateway, ScoreRecord};

use crate::error::StoreError;
use crate::provider::{StorageProvider, MAX_ENTRIES};

/// Reported as the provider name when nothing is available
pub const NO_PROVIDER: &str = "None";

pub struct Leaderboard {
    providers: Vec<Box<dyn StorageProvider>>,
    active: Option<usize>,
}

impl Leaderboard {
    /// Initialize providers in order and keep the first available one.
    /// Providers after the winner are never initialized.
    pub fn new(providers: Vec<Box<dyn StorageProvider>>) -> Self {
        let mut board = Self {
            providers,
            active: None,
        };
        board.select_active_provider();
        board
    }

    fn select_active_provider(&mut self) {
        for (idx, provider) in self.providers.iter_mut().enumerate() {
            provider.initialize();
            if provider.is_available() {
                eprintln!("[Leaderboard] Initialized with {}", provider.name());
                self.active = Some(idx);
                return;
            }
            eprintln!("[Leaderboard] {} not available", provider.name());
        }
        eprintln!("[Leaderboard] No leaderboard provider available!");
    }

    fn active_provider(&mut self) -> Option<&mut Box<dyn StorageProvider>> {
        let idx = self.active?;
        self.providers.get_mut(idx)
    }

    pub fn active_provider_name(&self) -> String {
        self.active
            .and_then(|idx| self.providers.get(idx))
            .map_or_else(|| NO_PROVIDER.to_string(), |p| p.name())
    }

    /// Qualifies if the board is not full or the score beats the last entry
    pub fn is_qualifying_score(&mut self, score: u64) -> bool {
        if self.active.is_none() {
            return false;
        }
        let entries = self.top_entries();
        entries.len() < MAX_ENTRIES || entries.last().map_or(true, |last| score > last.score)
    }

    pub fn save(&mut self, entry: &ScoreRecord) -> Result<(), StoreError> {
        let Some(provider) = self.active_provider() else {
            eprintln!("[Leaderboard] No provider available to save score");
            return Err(StoreError::Unavailable(NO_PROVIDER.to_string()));
        };

        match provider.save(entry) {
            Ok(()) => {
                eprintln!(
                    "[Leaderboard] Score {} for {} saved by {}",
                    entry.score,
                    entry.nickname,
                    provider.name()
                );
                Ok(())
            }
            Err(e) => {
                eprintln!("[Leaderboard] Failed to save score with {}: {}", provider.name(), e);
                Err(e)
            }
        }
    }

    /// Ranked entries, best first; empty when storage is unreachable
    pub fn top_entries(&mut self) -> Vec<ScoreRecord> {
        let Some(provider) = self.active_provider() else {
            return Vec::new();
        };
        match provider.top() {
            Ok(entries) => entries,
            Err(e) => {
                eprintln!("[Leaderboard] Failed to load entries from {}: {}", provider.name(), e);
                Vec::new()
            }
        }
    }
}

impl LeaderboardGateway for Leaderboard {
    fn submit_score(&mut self, record: &ScoreRecord) -> Result<(), GatewayError> {
        self.save(record).map_err(GatewayError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{KvStorageProvider, MemoryStore};

    #[test]
    fn no_providers_means_none() {
        let mut board = Leaderboard::new(Vec::new());
        assert_eq!(board.active_provider_name(), NO_PROVIDER);
        assert!(!board.is_qualifying_score(1_000_000));
        assert!(board.top_entries().is_empty());
    }

    #[test]
    fn falls_back_past_unavailable_providers() {
        let board = Leaderboard::new(vec![
            Box::new(KvStorageProvider::new(MemoryStore::offline(), "primary")),
            Box::new(KvStorageProvider::new(MemoryStore::new(), "secondary")),
        ]);
        assert_eq!(board.active_provider_name(), "KeyValue (secondary)");
    }
}
