//! Pieces module - Tetromino shapes and SRS rotation tables
//!
//! Shapes and wall kicks are static lookup data indexed by
//! `(kind, rotation)` and `(kind, from_rotation, direction)`; there is no
//! per-piece dispatch. Offsets are relative to the piece origin (top-left of
//! its bounding box), with y growing downward.
//! Reference: https://tetris.wiki/SRS

use crate::types::{PieceKind, RotateDirection, Rotation};

/// Offset of a single mino relative to piece origin
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece origin
pub type PieceShape = [MinoOffset; 4];

/// Kick candidates for one rotation transition, tried in order.
/// Entry 0 is always the unkicked rotation.
pub type KickList = [(i8, i8); 5];

/// `SHAPES[kind.index()][rotation.index()]`
static SHAPES: [[PieceShape; 4]; 7] = [
    // I
    [
        [(0, 1), (1, 1), (2, 1), (3, 1)],
        [(2, 0), (2, 1), (2, 2), (2, 3)],
        [(0, 2), (1, 2), (2, 2), (3, 2)],
        [(1, 0), (1, 1), (1, 2), (1, 3)],
    ],
    // O
    [
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
    ],
    // T
    [
        [(1, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (2, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (1, 2)],
        [(1, 0), (0, 1), (1, 1), (1, 2)],
    ],
    // S
    [
        [(1, 0), (2, 0), (0, 1), (1, 1)],
        [(1, 0), (1, 1), (2, 1), (2, 2)],
        [(1, 1), (2, 1), (0, 2), (1, 2)],
        [(0, 0), (0, 1), (1, 1), (1, 2)],
    ],
    // Z
    [
        [(0, 0), (1, 0), (1, 1), (2, 1)],
        [(2, 0), (1, 1), (2, 1), (1, 2)],
        [(0, 1), (1, 1), (1, 2), (2, 2)],
        [(1, 0), (0, 1), (1, 1), (0, 2)],
    ],
    // J
    [
        [(0, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (2, 2)],
        [(1, 0), (1, 1), (0, 2), (1, 2)],
    ],
    // L
    [
        [(2, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (1, 2), (2, 2)],
        [(0, 1), (1, 1), (2, 1), (0, 2)],
        [(0, 0), (1, 0), (1, 1), (1, 2)],
    ],
];

/// Kick tables are `[from_rotation][direction]`, direction 0 = clockwise,
/// 1 = counter-clockwise. The SRS data is published with y pointing up, so
/// the y components below are negated for the downward board axis.
type KickTable = [[KickList; 2]; 4];

/// O piece never kicks
const O_KICKS: KickTable = [[[(0, 0); 5]; 2]; 4];

/// JLSTZ kick table (shared by J, L, S, T, Z)
const JLSTZ_KICKS: KickTable = [
    [
        // 0->R
        [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
        // 0->L
        [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    ],
    [
        // R->2
        [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
        // R->0
        [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    ],
    [
        // 2->L
        [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
        // 2->R
        [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    ],
    [
        // L->0
        [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
        // L->2
        [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    ],
];

/// I piece kick table
const I_KICKS: KickTable = [
    [
        // 0->R
        [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
        // 0->L
        [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    ],
    [
        // R->2
        [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
        // R->0
        [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    ],
    [
        // 2->L
        [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
        // 2->R
        [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
    ],
    [
        // L->0
        [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
        // L->2
        [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    ],
];

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    SHAPES[kind.index()][rotation.index()]
}

/// Get the ordered kick candidates for rotating `kind` out of `from`
pub fn get_kicks(kind: PieceKind, from: Rotation, direction: RotateDirection) -> &'static KickList {
    let table = match kind {
        PieceKind::O => &O_KICKS,
        PieceKind::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    };
    let dir = match direction {
        RotateDirection::Clockwise => 0,
        RotateDirection::CounterClockwise => 1,
    };
    &table[from.index()][dir]
}

/// A tetromino placed somewhere on (or above) the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    /// Create a piece in spawn orientation at the given origin
    pub fn new(kind: PieceKind, x: i8, y: i8) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x,
            y,
        }
    }

    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute board cells covered by the piece
    pub fn cells(&self) -> PieceShape {
        let mut cells = self.shape();
        for cell in &mut cells {
            cell.0 += self.x;
            cell.1 += self.y;
        }
        cells
    }

    /// Candidate after a translation; no validity check
    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Candidate after an unkicked rotation; no validity check
    pub fn rotated(&self, direction: RotateDirection) -> Self {
        Self {
            rotation: self.rotation.rotate(direction),
            ..*self
        }
    }
}

/// Spawn origin for a board of the given width and buffer size.
///
/// Centers the 4-wide bounding box and puts the spawn-orientation minos in
/// the two lowest buffer rows, just above the visible field.
pub fn spawn_origin(board_width: u8, buffer_rows: u8) -> (i8, i8) {
    (((board_width as i16 - 4) / 2) as i8, buffer_rows as i8 - 2)
}
