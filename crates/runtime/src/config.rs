//! Environment-driven configuration.

use std::path::PathBuf;

use tetraj_core::{GameConfig, GravityCurve, Randomizer};

/// Inbound commands buffered before senders wait
pub const DEFAULT_MAX_PENDING: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub game: GameConfig,
    /// JSON-lines event log; disabled when unset
    pub log_path: Option<PathBuf>,
    /// Leaderboard file; the provider's default location when unset
    pub leaderboard_path: Option<PathBuf>,
    /// Redis server tried before the leaderboard file, e.g. `redis://localhost:6379`
    pub redis_url: Option<String>,
    pub max_pending_commands: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            log_path: None,
            leaderboard_path: None,
            redis_url: None,
            max_pending_commands: DEFAULT_MAX_PENDING,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .and_then(|s| if s.is_empty() { None } else { Some(s) })
}

impl RuntimeConfig {
    /// Create from `TETRAJ_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable source.
    /// Unparsable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::default().overlay(lookup)
    }

    /// Apply variables on top of an existing configuration
    pub fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parse = |key: &str| non_empty(lookup(key));
        let game = &mut self.game;

        if let Some(v) = parse("TETRAJ_BOARD_WIDTH").and_then(|s| s.parse().ok()) {
            game.board_width = v;
        }
        if let Some(v) = parse("TETRAJ_BOARD_HEIGHT").and_then(|s| s.parse().ok()) {
            game.board_height = v;
        }
        if let Some(v) = parse("TETRAJ_LOCK_DELAY_MS").and_then(|s| s.parse().ok()) {
            game.lock_delay_ms = v;
        }
        if let Some(v) = parse("TETRAJ_SEED").and_then(|s| s.parse().ok()) {
            game.seed = v;
        }
        if let Some(v) = parse("TETRAJ_GRAVITY").and_then(|s| GravityCurve::from_str(&s)) {
            game.gravity = v;
        }
        if let Some(v) = parse("TETRAJ_START_LEVEL").and_then(|s| s.parse().ok()) {
            game.start_level = v;
        }
        if let Some(v) = parse("TETRAJ_RANDOMIZER").and_then(|s| Randomizer::from_str(&s)) {
            game.randomizer = v;
        }
        if let Some(v) = parse("TETRAJ_MAX_PENDING").and_then(|s| s.parse().ok()) {
            self.max_pending_commands = v;
        }
        if let Some(v) = parse("TETRAJ_LOG_PATH") {
            self.log_path = Some(PathBuf::from(v));
        }
        if let Some(v) = parse("TETRAJ_LEADERBOARD_PATH") {
            self.leaderboard_path = Some(PathBuf::from(v));
        }
        if let Some(v) = parse("TETRAJ_REDIS_URL") {
            self.redis_url = Some(v);
        }

        self
    }
}
