//! Game configuration
//!
//! Every option has a default matching the standard ruleset. Configurations
//! coming from users (files, environment) must pass [`GameConfig::validate`]
//! before a game is built from them; [`GameLoop::new`](crate::GameLoop::new)
//! does this itself.

use serde::{Deserialize, Serialize};

use crate::board::{MAX_BOARD_HEIGHT, MAX_BOARD_WIDTH, MAX_TOTAL_ROWS};
use crate::error::ConfigError;
use crate::rng::Randomizer;
use crate::scoring::{GravityCurve, ScoringRules};
use crate::types::{
    DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH, DEFAULT_BUFFER_ROWS, DEFAULT_PREVIEW_LEN,
    LOCK_DELAY_MS, LOCK_RESET_LIMIT, MAX_PREVIEW_LEN, MIN_BUFFER_ROWS,
};

/// Narrowest and shortest playable board (one piece must fit)
pub const MIN_BOARD_SIZE: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_width: u8,
    /// Visible rows
    pub board_height: u8,
    /// Hidden spawn rows above the visible field
    pub buffer_rows: u8,
    pub gravity: GravityCurve,
    pub lock_delay_ms: u32,
    /// Lock deadline restarts allowed per piece
    pub lock_reset_limit: u8,
    /// Piece queue seed; equal seeds replay equal games
    pub seed: u64,
    pub randomizer: Randomizer,
    pub start_level: u32,
    pub preview_len: usize,
    pub hold_enabled: bool,
    pub scoring: ScoringRules,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: DEFAULT_BOARD_WIDTH,
            board_height: DEFAULT_BOARD_HEIGHT,
            buffer_rows: DEFAULT_BUFFER_ROWS,
            gravity: GravityCurve::default(),
            lock_delay_ms: LOCK_DELAY_MS,
            lock_reset_limit: LOCK_RESET_LIMIT,
            seed: 1,
            randomizer: Randomizer::Bag,
            start_level: 0,
            preview_len: DEFAULT_PREVIEW_LEN,
            hold_enabled: true,
            scoring: ScoringRules::default(),
        }
    }
}

impl GameConfig {
    /// Default configuration with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_WIDTH).contains(&self.board_width) {
            return Err(ConfigError::BoardWidth {
                got: self.board_width,
                max: MAX_BOARD_WIDTH,
            });
        }
        if !(MIN_BOARD_SIZE..=MAX_BOARD_HEIGHT).contains(&self.board_height) {
            return Err(ConfigError::BoardHeight {
                got: self.board_height,
                max: MAX_BOARD_HEIGHT,
            });
        }
        if self.buffer_rows < MIN_BUFFER_ROWS {
            return Err(ConfigError::BufferRows {
                got: self.buffer_rows,
                min: MIN_BUFFER_ROWS,
            });
        }
        let rows = self.board_height as u16 + self.buffer_rows as u16;
        if rows > MAX_TOTAL_ROWS {
            return Err(ConfigError::TooManyRows { rows });
        }
        if self.lock_delay_ms == 0 {
            return Err(ConfigError::LockDelay);
        }
        if !(1..=MAX_PREVIEW_LEN).contains(&self.preview_len) {
            return Err(ConfigError::PreviewLen {
                got: self.preview_len,
                max: MAX_PREVIEW_LEN,
            });
        }
        self.gravity.validate()?;
        self.scoring.validate()
    }

    /// Buffer plus visible rows
    pub fn total_rows(&self) -> u8 {
        self.board_height.saturating_add(self.buffer_rows)
    }
}
