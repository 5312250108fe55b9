//! Greedy autoplayer.
//!
//! Enumerates every (rotation, column) the active piece can reach with a
//! rotate-shift-drop plan, locks it on a scratch board, and scores the result
//! with classic grid features. No lookahead.

use arrayvec::ArrayVec;
use tetraj_core::board::MAX_BOARD_WIDTH;
use tetraj_core::{Board, GameSnapshot, Piece};
use tetraj_types::Rotation;

use crate::place::{plan_place, Plan};

const MAX_COLUMNS: usize = MAX_BOARD_WIDTH as usize;

/// Grid features of a locked board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridFeatures {
    pub max_height: u32,
    pub aggregate_height: u32,
    pub holes: u32,
    pub bumpiness: u32,
}

/// Evaluation weights; lines are rewarded, the rest penalized
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub lines: f64,
    pub aggregate_height: f64,
    pub holes: f64,
    pub bumpiness: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            lines: 0.76,
            aggregate_height: -0.51,
            holes: -0.36,
            bumpiness: -0.18,
        }
    }
}

/// The chosen placement
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub target_x: i8,
    pub rotation: Rotation,
    pub plan: Plan,
    pub lines: usize,
    pub features: GridFeatures,
    pub score: f64,
}

fn column_heights(board: &Board) -> ArrayVec<u32, MAX_COLUMNS> {
    let rows = board.total_rows() as i8;
    (0..board.width() as i8)
        .map(|x| {
            (0..rows)
                .find(|&y| board.is_occupied(x, y))
                .map_or(0, |top| (rows - top) as u32)
        })
        .take(MAX_COLUMNS)
        .collect()
}

/// Compute classic Tetris grid features on a locked board.
pub fn grid_features(board: &Board) -> GridFeatures {
    let heights = column_heights(board);
    let rows = board.total_rows() as i8;

    let mut holes = 0;
    for (x, &h) in heights.iter().enumerate() {
        let top = rows - h as i8;
        holes += (top..rows).filter(|&y| !board.is_occupied(x as i8, y)).count() as u32;
    }

    GridFeatures {
        max_height: heights.iter().copied().max().unwrap_or(0),
        aggregate_height: heights.iter().sum(),
        holes,
        bumpiness: heights.windows(2).map(|w| w[0].abs_diff(w[1])).sum(),
    }
}

fn evaluate(lines: usize, features: &GridFeatures, weights: &Weights) -> f64 {
    weights.lines * lines as f64
        + weights.aggregate_height * f64::from(features.aggregate_height)
        + weights.holes * f64::from(features.holes)
        + weights.bumpiness * f64::from(features.bumpiness)
}

/// Pick the best reachable placement for `piece`, or None if nothing is
/// reachable (the piece is boxed in).
pub fn choose(board: &Board, piece: &Piece, weights: &Weights) -> Option<Choice> {
    let mut best: Option<Choice> = None;

    for rotation in [Rotation::North, Rotation::East, Rotation::South, Rotation::West] {
        for target_x in -3..board.width() as i8 {
            let Ok(plan) = plan_place(board, piece, target_x, rotation) else {
                continue;
            };

            let mut scratch = board.clone();
            if scratch.place(&plan.landing.cells(), plan.landing.kind).is_err() {
                continue;
            }
            let lines = scratch.clear_full_rows();
            let features = grid_features(&scratch);
            let score = evaluate(lines, &features, weights);

            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(Choice {
                    target_x,
                    rotation,
                    plan,
                    lines,
                    features,
                    score,
                });
            }
        }
    }

    best
}

/// [`choose`] from a render snapshot, the only view a remote player gets.
pub fn choose_from_snapshot(snapshot: &GameSnapshot, weights: &Weights) -> Option<Choice> {
    let active = snapshot.active?;
    let board = Board::from_cells(
        snapshot.width,
        snapshot.height,
        snapshot.buffer,
        snapshot.cells.clone(),
    )?;
    let piece = Piece {
        kind: active.kind,
        rotation: active.rotation,
        x: active.x,
        y: active.y,
    };
    choose(&board, &piece, weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetraj_core::{GameConfig, GameLoop};
    use tetraj_types::PieceKind;

    #[test]
    fn features_count_holes_and_bumps() {
        let mut board = Board::new(4, 4, 4);
        // Column 0 height 3 with a hole under its top, column 2 height 1
        board.set(0, 5, Some(PieceKind::T));
        board.set(0, 7, Some(PieceKind::T));
        board.set(2, 7, Some(PieceKind::T));

        let f = grid_features(&board);
        assert_eq!(f.max_height, 3);
        assert_eq!(f.aggregate_height, 4);
        assert_eq!(f.holes, 1);
        // |3-0| + |0-1| + |1-0|
        assert_eq!(f.bumpiness, 5);
    }

    #[test]
    fn fills_the_single_gap_with_a_vertical_i() {
        let mut board = Board::standard();
        for y in 20..24 {
            board.fill_row_except(y, &[9], PieceKind::O);
        }
        let piece = Piece::new(PieceKind::I, 3, 2);
        let choice = choose(&board, &piece, &Weights::default()).unwrap();
        assert_eq!(choice.lines, 4);
        assert!(choice.plan.landing.cells().iter().all(|&(x, _)| x == 9));
    }

    #[test]
    fn snapshot_choice_is_playable() {
        let mut game = GameLoop::new(GameConfig::with_seed(11)).unwrap();
        game.start();
        for _ in 0..20 {
            let choice = choose_from_snapshot(&game.snapshot(), &Weights::default()).unwrap();
            for command in choice.plan.commands {
                assert!(game.apply(command).unwrap(), "{command:?} rejected");
            }
        }
        assert!(!game.game_over());
        assert_eq!(game.piece_id(), 21);
    }

    #[test]
    fn no_choice_without_active_piece() {
        let game = GameLoop::new(GameConfig::default()).unwrap();
        assert!(choose_from_snapshot(&game.snapshot(), &Weights::default()).is_none());
    }
}
