//! Game loop module - the spawn / fall / lock / clear state machine
//!
//! [`GameLoop`] owns the board, the active piece and the piece queue. Time is
//! an explicit engine clock: the caller advances it with [`GameLoop::tick`]
//! and the loop fires the gravity and lock deadlines that fall inside the
//! elapsed window, in order. Nothing here sleeps or spawns tasks, so every
//! transition is synchronously testable.
//!
//! Commands are applied with [`GameLoop::apply`]. A rejected move is a normal
//! outcome and returns `Ok(false)`; `Err` is reserved for structural
//! violations, after which the loop refuses further use.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::GameConfig;
use crate::error::{ConfigError, EngineError};
use crate::pieces::{spawn_origin, Piece};
use crate::record::{PlayerProfile, ScoreRecord};
use crate::resolver::{drop_distance, fits, is_grounded, try_rotate, try_shift};
use crate::rng::PieceQueue;
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::{Command, PieceKind, RotateDirection};

/// Loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Phase {
    /// Waiting for the next piece (before `start`, or mid-transition)
    Spawning,
    /// Active piece is airborne or has not yet been pushed against the stack
    Falling,
    /// A downward step was rejected; the piece merges at `deadline_ms`
    Locking {
        #[serde(rename = "deadlineMs")]
        deadline_ms: u64,
    },
    /// Piece merged; full rows are being removed and scored
    Clearing,
    /// Terminal
    GameOver,
}

/// What happened at the most recent lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockEvent {
    pub kind: PieceKind,
    pub piece_id: u32,
    pub lines_cleared: u32,
    /// Line clear points only; drop points are awarded as the piece moves
    pub points: u32,
    pub level: u32,
    pub level_up: bool,
}

/// A single game session
#[derive(Debug, Clone)]
pub struct GameLoop {
    config: GameConfig,
    board: Board,
    queue: PieceQueue,
    active: Option<Piece>,
    hold: Option<PieceKind>,
    can_hold: bool,
    phase: Phase,
    spawn: (i8, i8),
    /// Engine time in milliseconds; frozen while paused
    clock_ms: u64,
    next_gravity_at: u64,
    lock_resets: u8,
    /// Lowest row the active piece has started a lock window on, and the
    /// latest lock deadline
    lock_window: Option<(i8, u64)>,
    score: u64,
    level: u32,
    lines: u32,
    /// Monotonic id for spawned pieces (hold swaps included)
    piece_id: u32,
    lock_events: Vec<LockEvent>,
    started: bool,
    paused: bool,
    aborted: bool,
    finalized: bool,
}

impl GameLoop {
    /// Create a game on an empty board
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::new(config.board_width, config.board_height, config.buffer_rows);
        Ok(Self::build(config, board))
    }

    /// Create a game on a prepared board, e.g. a test scenario
    pub fn with_board(config: GameConfig, board: Board) -> Result<Self, ConfigError> {
        config.validate()?;
        if board.width() != config.board_width || board.total_rows() != config.total_rows() {
            return Err(ConfigError::BoardMismatch {
                got_width: board.width(),
                got_rows: board.total_rows(),
                want_width: config.board_width,
                want_rows: config.total_rows(),
            });
        }
        Ok(Self::build(config, board))
    }

    fn build(config: GameConfig, board: Board) -> Self {
        let queue = PieceQueue::new(config.randomizer, config.seed);
        let spawn = spawn_origin(config.board_width, config.buffer_rows);
        let level = config.start_level;
        Self {
            config,
            board,
            queue,
            active: None,
            hold: None,
            can_hold: true,
            phase: Phase::Spawning,
            spawn,
            clock_ms: 0,
            next_gravity_at: 0,
            lock_resets: 0,
            lock_window: None,
            score: 0,
            level,
            lines: 0,
            piece_id: 0,
            lock_events: Vec::new(),
            started: false,
            paused: false,
            aborted: false,
            finalized: false,
        }
    }

    /// Start the game and spawn the first piece
    pub fn start(&mut self) {
        if self.started || self.aborted {
            return;
        }
        self.started = true;
        self.spawn_next();
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for building scenarios. Edits bypass the resolver.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn can_hold(&self) -> bool {
        self.config.hold_enabled && self.can_hold
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// True after a structural violation
    pub fn aborted(&self) -> bool {
        self.aborted
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Lock deadline restarts used by the active piece
    pub fn lock_resets(&self) -> u8 {
        self.lock_resets
    }

    /// Current gravity interval based on level
    pub fn gravity_interval_ms(&self) -> u32 {
        self.config.gravity.interval_ms(self.level)
    }

    /// Upcoming piece kinds, next first, `preview_len` long
    pub fn preview(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.upcoming().take(self.config.preview_len)
    }

    /// Milliseconds of engine time until the next gravity or lock deadline.
    /// None when no deadline is pending (not started, paused, or over).
    pub fn next_deadline_ms(&self) -> Option<u64> {
        if !self.started || self.paused || self.aborted {
            return None;
        }
        let at = match self.phase {
            Phase::Falling => self.next_gravity_at,
            Phase::Locking { deadline_ms } => deadline_ms,
            _ => return None,
        };
        Some(at.saturating_sub(self.clock_ms))
    }

    /// Calculate the ghost piece Y position (where piece would land)
    pub fn ghost_y(&self) -> Option<i8> {
        let active = self.active?;
        Some(active.y + drop_distance(&self.board, &active) as i8)
    }

    /// Drain the locks recorded since the last call, oldest first. A single
    /// catch-up tick may lock several pieces.
    pub fn take_lock_events(&mut self) -> Vec<LockEvent> {
        std::mem::take(&mut self.lock_events)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            width: self.board.width(),
            height: self.board.height(),
            buffer: self.board.buffer(),
            cells: self.board.cells().to_vec(),
            active: self.active.map(ActiveSnapshot::from),
            ghost_y: self.ghost_y(),
            hold: self.hold,
            can_hold: self.can_hold(),
            next: self.preview().collect(),
            score: self.score,
            level: self.level,
            lines: self.lines,
            phase: self.phase,
            paused: self.paused,
            game_over: self.game_over(),
            piece_id: self.piece_id,
            gravity_ms: self.gravity_interval_ms(),
            clock_ms: self.clock_ms,
        }
    }

    fn ensure_alive(&self) -> Result<(), EngineError> {
        if self.aborted {
            return Err(EngineError::Aborted);
        }
        Ok(())
    }

    fn gravity_deadline(&self) -> u64 {
        self.clock_ms + u64::from(self.gravity_interval_ms())
    }

    /// Advance the engine clock by `elapsed_ms`, firing every gravity and lock
    /// deadline inside the window in time order.
    ///
    /// Returns true if any piece or phase changed.
    pub fn tick(&mut self, elapsed_ms: u64) -> Result<bool, EngineError> {
        self.ensure_alive()?;
        if !self.started || self.paused || self.game_over() {
            return Ok(false);
        }

        let target = self.clock_ms.saturating_add(elapsed_ms);
        let mut changed = false;

        loop {
            let deadline = match self.phase {
                Phase::Falling => self.next_gravity_at,
                Phase::Locking { deadline_ms } => deadline_ms,
                _ => break,
            };
            if deadline > target {
                break;
            }
            self.clock_ms = self.clock_ms.max(deadline);
            self.fire_deadline()?;
            changed = true;
        }

        self.clock_ms = target;
        Ok(changed)
    }

    fn fire_deadline(&mut self) -> Result<(), EngineError> {
        match self.phase {
            Phase::Falling => {
                let Some(active) = self.active else {
                    return Ok(());
                };
                match try_shift(&self.board, &active, 0, 1) {
                    Some(moved) => {
                        self.active = Some(moved);
                        self.next_gravity_at = self.gravity_deadline();
                    }
                    None => self.enter_locking()?,
                }
                Ok(())
            }
            Phase::Locking { .. } => self.lock_active(),
            _ => Ok(()),
        }
    }

    /// Start the lock window for a piece that can no longer move down.
    ///
    /// Once the reset budget is spent, touching down again on the same row or
    /// higher resumes the earlier countdown instead of granting a new one, and
    /// locks at once if that countdown already ran out. Only reaching a lower
    /// row opens a fresh window.
    fn enter_locking(&mut self) -> Result<(), EngineError> {
        let resumed = match (self.lock_window, self.active) {
            (Some((row, deadline)), Some(active))
                if self.lock_resets >= self.config.lock_reset_limit && active.y <= row =>
            {
                Some(deadline)
            }
            _ => None,
        };
        match resumed {
            Some(deadline) if deadline <= self.clock_ms => self.lock_active(),
            Some(deadline) => {
                self.open_lock_window(deadline);
                Ok(())
            }
            None => {
                self.open_lock_window(self.clock_ms + u64::from(self.config.lock_delay_ms));
                Ok(())
            }
        }
    }

    fn open_lock_window(&mut self, deadline_ms: u64) {
        if let Some(active) = self.active {
            let row = self.lock_window.map_or(active.y, |(row, _)| row.max(active.y));
            self.lock_window = Some((row, deadline_ms));
        }
        self.phase = Phase::Locking { deadline_ms };
    }

    /// Apply a player command.
    ///
    /// Returns `Ok(true)` if the command was accepted, `Ok(false)` if it was
    /// rejected or ignored (no piece, paused, game over).
    pub fn apply(&mut self, command: Command) -> Result<bool, EngineError> {
        self.ensure_alive()?;
        if !self.started || self.game_over() {
            return Ok(false);
        }

        if command == Command::Pause {
            self.paused = !self.paused;
            return Ok(true);
        }
        if self.paused {
            return Ok(false);
        }

        match command {
            Command::MoveLeft => self.shift(-1),
            Command::MoveRight => self.shift(1),
            Command::RotateCw => self.rotate(RotateDirection::Clockwise),
            Command::RotateCcw => self.rotate(RotateDirection::CounterClockwise),
            Command::SoftDrop => self.soft_drop(),
            Command::HardDrop => self.hard_drop(),
            Command::Hold => Ok(self.hold()),
            Command::Pause => Ok(false),
        }
    }

    fn shift(&mut self, dx: i8) -> Result<bool, EngineError> {
        let Some(active) = self.active else {
            return Ok(false);
        };
        let Some(moved) = try_shift(&self.board, &active, dx, 0) else {
            return Ok(false);
        };
        self.active = Some(moved);
        self.after_lateral_move()?;
        Ok(true)
    }

    fn rotate(&mut self, direction: RotateDirection) -> Result<bool, EngineError> {
        let Some(active) = self.active else {
            return Ok(false);
        };
        let Some((rotated, _kick)) = try_rotate(&self.board, &active, direction) else {
            return Ok(false);
        };
        self.active = Some(rotated);
        self.after_lateral_move()?;
        Ok(true)
    }

    /// Touching down through a shift or rotate starts the lock window.
    ///
    /// During the window a successful move either lifts the piece off the
    /// stack (back to falling) or restarts the deadline. Both spend one
    /// reset from the per-piece budget while any is left.
    fn after_lateral_move(&mut self) -> Result<(), EngineError> {
        let Some(active) = self.active else {
            return Ok(());
        };
        let grounded = is_grounded(&self.board, &active);

        match self.phase {
            Phase::Falling if grounded => self.enter_locking(),
            Phase::Locking { .. } => {
                let budget_left = self.lock_resets < self.config.lock_reset_limit;
                if budget_left {
                    self.lock_resets += 1;
                }
                if !grounded {
                    self.phase = Phase::Falling;
                    self.next_gravity_at = self.gravity_deadline();
                } else if budget_left {
                    self.open_lock_window(self.clock_ms + u64::from(self.config.lock_delay_ms));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn soft_drop(&mut self) -> Result<bool, EngineError> {
        let Some(active) = self.active else {
            return Ok(false);
        };
        match try_shift(&self.board, &active, 0, 1) {
            Some(moved) => {
                self.active = Some(moved);
                self.score += u64::from(self.config.scoring.drop_points(1, false));
                self.next_gravity_at = self.gravity_deadline();
                Ok(true)
            }
            None => {
                if self.phase == Phase::Falling {
                    self.enter_locking()?;
                }
                Ok(false)
            }
        }
    }

    fn hard_drop(&mut self) -> Result<bool, EngineError> {
        let Some(active) = self.active else {
            return Ok(false);
        };
        let distance = drop_distance(&self.board, &active);
        self.active = Some(active.shifted(0, distance as i8));
        self.score += u64::from(self.config.scoring.drop_points(u32::from(distance), true));
        self.lock_active()?;
        Ok(true)
    }

    /// Swap active piece with hold piece
    fn hold(&mut self) -> bool {
        if !self.can_hold() {
            return false;
        }
        let Some(active) = self.active.take() else {
            return false;
        };

        let next = match self.hold.replace(active.kind) {
            Some(held) => held,
            None => self.queue.draw(),
        };
        self.spawn_piece(next);
        self.can_hold = false;
        true
    }

    /// Merge the active piece, clear rows, score, and spawn the next piece
    fn lock_active(&mut self) -> Result<(), EngineError> {
        let Some(piece) = self.active.take() else {
            return Ok(());
        };

        if let Err(err) = self.board.place(&piece.cells(), piece.kind) {
            self.aborted = true;
            return Err(err);
        }

        self.phase = Phase::Clearing;
        let cleared = self.board.clear_full_rows();
        let rules = &self.config.scoring;
        let points = rules.line_clear_points(cleared, self.level);
        let level_before = self.level;

        self.score += u64::from(points);
        self.lines += cleared as u32;
        self.level = rules.level_for(self.level, self.config.start_level, self.lines);

        self.lock_events.push(LockEvent {
            kind: piece.kind,
            piece_id: self.piece_id,
            lines_cleared: cleared as u32,
            points,
            level: self.level,
            level_up: self.level > level_before,
        });

        self.spawn_next();
        Ok(())
    }

    /// Spawn a new piece from the queue
    fn spawn_next(&mut self) {
        self.phase = Phase::Spawning;
        let kind = self.queue.draw();
        self.can_hold = true;
        self.spawn_piece(kind);
    }

    /// Place `kind` at the spawn origin, or end the game if it is occluded.
    /// The board is only read here.
    fn spawn_piece(&mut self, kind: PieceKind) {
        let piece = Piece::new(kind, self.spawn.0, self.spawn.1);
        if !fits(&self.board, &piece) {
            self.active = None;
            self.phase = Phase::GameOver;
            return;
        }

        self.active = Some(piece);
        self.piece_id = self.piece_id.wrapping_add(1);
        self.lock_resets = 0;
        self.lock_window = None;
        self.phase = Phase::Falling;
        self.next_gravity_at = self.gravity_deadline();
    }

    /// Build the final score record. Returns a record once, and only after
    /// the game has ended.
    pub fn finalize(&mut self, player: &PlayerProfile, ended_at: DateTime<Utc>) -> Option<ScoreRecord> {
        if !self.game_over() || self.finalized {
            return None;
        }
        self.finalized = true;
        Some(ScoreRecord {
            player_id: player.id.clone(),
            nickname: player.nickname.clone(),
            score: self.score,
            level: self.level,
            lines: self.lines,
            timestamp: ended_at,
            duration_ms: self.clock_ms,
        })
    }
}
