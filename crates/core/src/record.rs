//! Score records and the leaderboard boundary.
//!
//! A [`ScoreRecord`] is created exactly once, when a game ends, and handed to
//! a [`LeaderboardGateway`]. How the gateway stores it is its own business.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Who is playing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: String,
    pub nickname: String,
}

impl PlayerProfile {
    pub fn new(id: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nickname: nickname.into(),
        }
    }

    /// Anonymous local player
    pub fn guest() -> Self {
        Self::new("guest", "Guest")
    }
}

/// Final result of one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub player_id: String,
    pub nickname: String,
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    pub timestamp: DateTime<Utc>,
    /// Game length on the engine clock (pauses excluded)
    pub duration_ms: u64,
}

/// Leaderboard submission failed. Never fatal to the game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("no leaderboard storage is available")]
    Unavailable,

    #[error("leaderboard storage failed: {0}")]
    Storage(String),
}

/// Accepts finalized score records for persistence
pub trait LeaderboardGateway {
    fn submit_score(&mut self, record: &ScoreRecord) -> Result<(), GatewayError>;
}

/// Gateway that keeps everything in memory. Useful for tests and offline play.
#[derive(Debug, Default, Clone)]
pub struct RecordingGateway {
    pub records: Vec<ScoreRecord>,
}

impl LeaderboardGateway for RecordingGateway {
    fn submit_score(&mut self, record: &ScoreRecord) -> Result<(), GatewayError> {
        self.records.push(record.clone());
        Ok(())
    }
}
