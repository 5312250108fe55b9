//! Collision and placement resolver.
//!
//! Pure functions of a board and a candidate piece. Nothing here mutates the
//! board; the game loop decides what to do with a rejected candidate.

use crate::board::Board;
use crate::pieces::{get_kicks, Piece};
use crate::types::RotateDirection;

/// True iff every cell is inside the grid (buffer included) and empty.
pub fn can_place(board: &Board, cells: &[(i8, i8)]) -> bool {
    cells.iter().all(|&(x, y)| board.is_valid(x, y))
}

/// True iff the piece fits where it stands.
pub fn fits(board: &Board, piece: &Piece) -> bool {
    can_place(board, &piece.cells())
}

/// Translate a piece, or None if the target is blocked.
pub fn try_shift(board: &Board, piece: &Piece, dx: i8, dy: i8) -> Option<Piece> {
    let candidate = piece.shifted(dx, dy);
    fits(board, &candidate).then_some(candidate)
}

/// Rotate with wall kicks.
///
/// Tries the unkicked rotation first, then each kick offset in table order.
/// Returns the resolved piece and the index of the kick that succeeded.
pub fn try_rotate(board: &Board, piece: &Piece, direction: RotateDirection) -> Option<(Piece, usize)> {
    let rotated = piece.rotated(direction);
    get_kicks(piece.kind, piece.rotation, direction)
        .iter()
        .enumerate()
        .find_map(|(i, &(dx, dy))| {
            let candidate = rotated.shifted(dx, dy);
            fits(board, &candidate).then_some((candidate, i))
        })
}

/// True when a one-row downward step would be rejected.
pub fn is_grounded(board: &Board, piece: &Piece) -> bool {
    try_shift(board, piece, 0, 1).is_none()
}

/// How many rows the piece can fall before it rests.
pub fn drop_distance(board: &Board, piece: &Piece) -> u8 {
    let mut distance: i8 = 0;
    while fits(board, &piece.shifted(0, distance + 1)) {
        distance += 1;
    }
    distance as u8
}
