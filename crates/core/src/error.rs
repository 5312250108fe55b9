//! Error types for the engine core.
//!
//! Rejected moves are not errors; they surface as `false`. The variants here
//! cover bad configuration and broken engine invariants only.

use thiserror::Error;

/// Structural violations. Any of these means the engine itself is wrong and
/// the session must stop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// `Board::place` was asked to write cells that are occupied or outside
    /// the grid.
    #[error("invalid placement of {kind} at {cells:?}\n{board}")]
    InvalidPlacement {
        kind: char,
        cells: Vec<(i8, i8)>,
        /// ASCII dump of the board at the moment of the failed write.
        board: String,
    },

    /// The loop was used after a structural violation aborted it.
    #[error("game session aborted after an engine fault")]
    Aborted,
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board width must be within 4..={max}, got {got}")]
    BoardWidth { got: u8, max: u8 },

    #[error("board height must be within 4..={max}, got {got}")]
    BoardHeight { got: u8, max: u8 },

    #[error("buffer must hold at least {min} rows, got {got}")]
    BufferRows { got: u8, min: u8 },

    #[error("board of {rows} total rows exceeds the coordinate range")]
    TooManyRows { rows: u16 },

    #[error("gravity table is empty")]
    EmptyGravityTable,

    #[error("gravity table must be positive and non-increasing (entry {index} = {value})")]
    GravityTableOrder { index: usize, value: u32 },

    #[error("preview length must be within 1..={max}, got {got}")]
    PreviewLen { got: usize, max: usize },

    #[error("lock delay must be positive")]
    LockDelay,

    #[error("lines per level must be positive")]
    LinesPerLevel,

    #[error("line score table must grow with cleared rows")]
    LineScores,

    #[error("board is {got_width}x{got_rows}, configuration expects {want_width}x{want_rows}")]
    BoardMismatch {
        got_width: u8,
        got_rows: u8,
        want_width: u8,
        want_rows: u8,
    },
}
