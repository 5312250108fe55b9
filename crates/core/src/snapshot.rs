//! Read-only render snapshot.
//!
//! Front-ends pull a [`GameSnapshot`] on demand; the engine never pushes.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::game_state::Phase;
use crate::pieces::{Piece, PieceShape};
use crate::types::{Cell, PieceKind, Rotation, MAX_PREVIEW_LEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    /// Absolute board cells covered by the piece
    pub cells: PieceShape,
}

impl From<Piece> for ActiveSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
            cells: value.cells(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub width: u8,
    /// Visible rows
    pub height: u8,
    /// Hidden rows stacked above the visible field
    pub buffer: u8,
    /// Locked cells, row-major, buffer rows first
    pub cells: Vec<Cell>,
    pub active: Option<ActiveSnapshot>,
    /// Origin row the active piece would land on
    pub ghost_y: Option<i8>,
    pub hold: Option<PieceKind>,
    pub can_hold: bool,
    pub next: ArrayVec<PieceKind, MAX_PREVIEW_LEN>,
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    pub phase: Phase,
    pub paused: bool,
    pub game_over: bool,
    pub piece_id: u32,
    pub gravity_ms: u32,
    pub clock_ms: u64,
}

impl GameSnapshot {
    /// Locked cell at (x, y); None when empty or out of range
    pub fn cell(&self, x: i8, y: i8) -> Cell {
        if x < 0 || y < 0 || x >= self.width as i8 {
            return None;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.cells.get(idx).copied().flatten()
    }

    /// Visible rows only, top to bottom
    pub fn visible_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells
            .chunks(self.width.max(1) as usize)
            .skip(self.buffer as usize)
    }

    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }
}
