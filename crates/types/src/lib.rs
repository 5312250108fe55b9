//! Core types module - shared data structures and defaults
//!
//! This crate defines the fundamental vocabulary used throughout the workspace.
//! Everything here is plain data, usable from the engine, the leaderboard
//! collaborator and any front-end alike.
//!
//! # Board Dimensions
//!
//! Standard playfield dimensions (configurable per game):
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 visible rows
//! - **Buffer**: 4 hidden rows stacked above the visible field, used for spawning
//!
//! Row 0 is the top of the hidden buffer; the visible field starts at row
//! `DEFAULT_BUFFER_ROWS`.
//!
//! # Timing Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `LOCK_DELAY_MS` | 450 | Grace period once a downward step is rejected |
//! | `LOCK_RESET_LIMIT` | 15 | Max lock deadline restarts per piece |
//! | `DROP_INTERVALS` | 1000..120 | Gravity interval per level |
//!
//! # Examples
//!
//! ```
//! use tetraj_types::{Command, PieceKind, Rotation, DEFAULT_BOARD_WIDTH};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Command::from_str("hardDrop"), Some(Command::HardDrop));
//! assert_eq!(DEFAULT_BOARD_WIDTH, 10);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const DEFAULT_BOARD_WIDTH: u8 = 10;

/// Visible board height in cells (20 rows)
pub const DEFAULT_BOARD_HEIGHT: u8 = 20;

/// Hidden rows above the visible field
pub const DEFAULT_BUFFER_ROWS: u8 = 4;

/// Fewest hidden rows a board may be configured with
pub const MIN_BUFFER_ROWS: u8 = 4;

/// Lock delay once a piece can no longer fall (450ms)
pub const LOCK_DELAY_MS: u32 = 450;

/// Maximum number of lock deadline restarts per piece (15)
pub const LOCK_RESET_LIMIT: u8 = 15;

/// Gravity intervals by level (milliseconds per row).
///
/// Index 0 = level 0; the last entry applies to every higher level.
pub const DROP_INTERVALS: [u32; 10] = [1000, 800, 650, 500, 400, 320, 250, 200, 160, 120];

/// Line clear points for 0..=4 rows, multiplied by (level + 1)
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Points per row for a soft drop
pub const SOFT_DROP_POINTS: u32 = 1;

/// Points per row for a hard drop
pub const HARD_DROP_POINTS: u32 = 2;

/// Cumulative cleared lines needed per level step
pub const LINES_PER_LEVEL: u32 = 10;

/// Upcoming pieces shown in the preview by default
pub const DEFAULT_PREVIEW_LEN: usize = 5;

/// Upper bound on the preview length (one full bag)
pub const MAX_PREVIEW_LEN: usize = 7;

/// The seven tetromino piece kinds
///
/// The kind doubles as the color/render tag of a locked cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in canonical order; one bag's worth.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Position in [`PieceKind::ALL`], used to index the shape tables.
    pub fn index(self) -> usize {
        match self {
            PieceKind::I => 0,
            PieceKind::O => 1,
            PieceKind::T => 2,
            PieceKind::S => 3,
            PieceKind::Z => 4,
            PieceKind::J => 5,
            PieceKind::L => 6,
        }
    }

    /// Parse piece kind from string (case-insensitive)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Single-character glyph used by board dumps
    pub fn glyph(&self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }
}

/// Rotation states (North = spawn orientation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotation index 0..=3, clockwise from North
    pub fn index(self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Inverse of [`Rotation::index`]; wraps modulo 4.
    pub fn from_index(index: usize) -> Self {
        match index % 4 {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    /// Rotate clockwise
    pub fn rotate_cw(&self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Rotate counter-clockwise
    pub fn rotate_ccw(&self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// Rotate in the given direction
    pub fn rotate(&self, direction: RotateDirection) -> Self {
        match direction {
            RotateDirection::Clockwise => self.rotate_cw(),
            RotateDirection::CounterClockwise => self.rotate_ccw(),
        }
    }

    /// Parse from string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "north" | "n" => Some(Rotation::North),
            "east" | "e" => Some(Rotation::East),
            "south" | "s" => Some(Rotation::South),
            "west" | "w" => Some(Rotation::West),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

/// Direction of a rotation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotateDirection {
    Clockwise,
    CounterClockwise,
}

/// Abstract input commands delivered by a front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    MoveLeft,
    MoveRight,
    RotateCw,
    RotateCcw,
    SoftDrop,
    HardDrop,
    Hold,
    Pause,
}

impl Command {
    /// Parse command from string (case-insensitive)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Command::MoveLeft),
            "moveright" => Some(Command::MoveRight),
            "rotatecw" => Some(Command::RotateCw),
            "rotateccw" => Some(Command::RotateCcw),
            "softdrop" => Some(Command::SoftDrop),
            "harddrop" => Some(Command::HardDrop),
            "hold" => Some(Command::Hold),
            "pause" => Some(Command::Pause),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::RotateCw => "rotateCw",
            Command::RotateCcw => "rotateCcw",
            Command::SoftDrop => "softDrop",
            Command::HardDrop => "hardDrop",
            Command::Hold => "hold",
            Command::Pause => "pause",
        }
    }
}

/// Cell on the board (None = empty, Some = locked with piece kind)
pub type Cell = Option<PieceKind>;
