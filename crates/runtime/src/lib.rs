//! Async session driver.
//!
//! Bridges the synchronous [`GameLoop`](tetraj_core::GameLoop) with tokio:
//! commands arrive over an mpsc channel, snapshots leave over a watch channel,
//! and the task sleeps until the engine's next deadline in between.
//!
//! - [`config`]: `TETRAJ_*` environment configuration
//! - [`event_log`]: JSON-lines event log written by a background task
//! - [`session`]: the session task and its report

pub mod config;
pub mod event_log;
pub mod session;

pub use config::RuntimeConfig;
pub use event_log::{EventLog, Level};
pub use session::{run_session, spawn_session, SessionHandle, SessionOutcome, SessionReport, Submission};
