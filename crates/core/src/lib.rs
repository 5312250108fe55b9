//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains all the game rules, state management, and simulation logic.
//! It has **zero dependencies** on rendering, input devices, storage or I/O:
//!
//! - **Deterministic**: Same seed and the same timed commands produce identical games
//! - **Testable**: Time is an explicit engine clock, never a wall clock
//! - **Portable**: Runs under any driver (async runtime, test harness, benchmark)
//!
//! # Module Structure
//!
//! - [`board`]: configurable grid with a hidden spawn buffer and line clearing
//! - [`pieces`]: tetromino shapes and SRS kick tables as static data
//! - [`resolver`]: collision checks, shifts, kicked rotations, drop distance
//! - [`scoring`]: line clear and drop points, level progression, gravity curves
//! - [`rng`]: seeded 7-bag (or uniform) piece queue
//! - [`game_state`]: the spawn / fall / lock / clear state machine
//! - [`snapshot`]: read-only render view
//! - [`record`]: final score record and the leaderboard boundary
//! - [`config`], [`error`]
//!
//! # Example
//!
//! ```
//! use tetraj_core::{GameConfig, GameLoop};
//! use tetraj_types::Command;
//!
//! let mut game = GameLoop::new(GameConfig::with_seed(12345)).unwrap();
//! game.start();
//!
//! game.apply(Command::MoveRight).unwrap();
//! game.apply(Command::RotateCw).unwrap();
//! game.apply(Command::HardDrop).unwrap();
//!
//! assert!(game.score() > 0); // Hard drop awards points
//! ```
//!
//! # Timing
//!
//! - **Gravity**: depends on level (1000ms at level 0 with the default table)
//! - **Lock Delay**: 450ms once a downward step is rejected, restarted by
//!   shifts and rotations at most 15 times per piece
//!
//! Call [`GameLoop::tick`] with elapsed milliseconds; use
//! [`GameLoop::next_deadline_ms`] to know how long a driver may sleep.

pub mod board;
pub mod config;
pub mod error;
pub mod game_state;
pub mod pieces;
pub mod record;
pub mod resolver;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tetraj_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::GameConfig;
pub use error::{ConfigError, EngineError};
pub use game_state::{GameLoop, LockEvent, Phase};
pub use pieces::{get_kicks, get_shape, spawn_origin, Piece};
pub use record::{GatewayError, LeaderboardGateway, PlayerProfile, RecordingGateway, ScoreRecord};
pub use rng::{PieceQueue, Randomizer};
pub use scoring::{GravityCurve, ScoringRules};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
