//! Placement planning: turn "put this piece at column x, rotation r" into the
//! command sequence that gets it there, then hard-drops it.

use tetraj_core::resolver::{drop_distance, try_rotate, try_shift};
use tetraj_core::{Board, EngineError, GameLoop, Piece};
use tetraj_types::{Command, RotateDirection, Rotation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceError {
    HoldUnavailable,
    RotationBlocked,
    XOutOfBounds,
    XBlocked,
    NotPlayable,
    NoActive,
    Engine(EngineError),
}

impl PlaceError {
    pub fn code(&self) -> &'static str {
        match self {
            PlaceError::HoldUnavailable => "hold_unavailable",
            PlaceError::Engine(_) => "engine_fault",
            PlaceError::RotationBlocked
            | PlaceError::XOutOfBounds
            | PlaceError::XBlocked
            | PlaceError::NotPlayable
            | PlaceError::NoActive => "invalid_place",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PlaceError::HoldUnavailable => "hold requested when unavailable",
            PlaceError::RotationBlocked => "could not rotate to target rotation",
            PlaceError::XOutOfBounds => "target x would place piece out of bounds",
            PlaceError::XBlocked => "could not move to target x due to collision",
            PlaceError::NotPlayable => "game is not playable",
            PlaceError::NoActive => "no active piece",
            PlaceError::Engine(_) => "engine aborted during placement",
        }
    }
}

impl From<EngineError> for PlaceError {
    fn from(err: EngineError) -> Self {
        PlaceError::Engine(err)
    }
}

/// Commands for one placement, plus where the piece ends up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Rotations, then shifts, then a final `HardDrop`
    pub commands: Vec<Command>,
    /// The piece at rest, after the hard drop
    pub landing: Piece,
}

fn rotate_steps(piece: Piece, board: &Board, direction: RotateDirection, steps: u8) -> Option<Piece> {
    let mut piece = piece;
    for _ in 0..steps {
        piece = try_rotate(board, &piece, direction)?.0;
    }
    Some(piece)
}

/// Plan a placement without touching any game state.
///
/// Rotation is tried in the shorter direction first and falls back to the
/// other; kicks may move the piece, so the shift is computed afterwards.
pub fn plan_place(
    board: &Board,
    piece: &Piece,
    target_x: i8,
    target_rot: Rotation,
) -> Result<Plan, PlaceError> {
    let cur = piece.rotation.index() as i8;
    let tgt = target_rot.index() as i8;
    let cw = (tgt - cur).rem_euclid(4) as u8;
    let ccw = (cur - tgt).rem_euclid(4) as u8;

    // Always consider both directions; for 180 both will be 2.
    let mut plans = [
        (RotateDirection::Clockwise, Command::RotateCw, cw),
        (RotateDirection::CounterClockwise, Command::RotateCcw, ccw),
    ];
    if plans[1].2 < plans[0].2 {
        plans.swap(0, 1);
    }

    let (mut active, mut commands) = plans
        .iter()
        .find_map(|&(direction, command, steps)| {
            rotate_steps(*piece, board, direction, steps)
                .map(|rotated| (rotated, vec![command; steps as usize]))
        })
        .ok_or(PlaceError::RotationBlocked)?;

    // Validate x bounds based on current shape.
    let shape = active.shape();
    let min_dx = shape.iter().map(|&(dx, _)| dx).min().unwrap_or(0) as i16;
    let max_dx = shape.iter().map(|&(dx, _)| dx).max().unwrap_or(0) as i16;
    let x = target_x as i16;
    if x + min_dx < 0 || x + max_dx >= board.width() as i16 {
        return Err(PlaceError::XOutOfBounds);
    }

    let dx = target_x - active.x;
    let (step, command) = if dx > 0 {
        (1, Command::MoveRight)
    } else {
        (-1, Command::MoveLeft)
    };
    for _ in 0..dx.unsigned_abs() {
        active = try_shift(board, &active, step, 0).ok_or(PlaceError::XBlocked)?;
        commands.push(command);
    }

    commands.push(Command::HardDrop);
    let landing = active.shifted(0, drop_distance(board, &active) as i8);
    Ok(Plan { commands, landing })
}

/// Drive a live game through a placement.
///
/// The plan is computed against the current board and applied command by
/// command; nothing ticks in between, so the plan cannot go stale.
pub fn apply_place(
    game: &mut GameLoop,
    target_x: i8,
    target_rot: Rotation,
    use_hold: bool,
) -> Result<Plan, PlaceError> {
    if !game.started() || game.paused() || game.game_over() {
        return Err(PlaceError::NotPlayable);
    }

    // Hold first if requested.
    if use_hold && !game.apply(Command::Hold)? {
        return Err(PlaceError::HoldUnavailable);
    }

    let Some(active) = game.active() else {
        return Err(PlaceError::NoActive);
    };

    let plan = plan_place(game.board(), &active, target_x, target_rot)?;
    for &command in &plan.commands {
        if !game.apply(command)? {
            return Err(match command {
                Command::RotateCw | Command::RotateCcw => PlaceError::RotationBlocked,
                Command::MoveLeft | Command::MoveRight => PlaceError::XBlocked,
                _ => PlaceError::NotPlayable,
            });
        }
    }
    Ok(plan)
}
