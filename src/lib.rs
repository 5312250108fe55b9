//! Tetraj (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so binaries, tests and
//! benches can use `tetraj::{core, engine, leaderboard, runtime, types}`.

pub use tetraj_core as core;
pub use tetraj_engine as engine;
pub use tetraj_leaderboard as leaderboard;
pub use tetraj_runtime as runtime;
pub use tetraj_types as types;
