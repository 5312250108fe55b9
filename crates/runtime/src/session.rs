//! Session driver.
//!
//! One tokio task owns the [`GameLoop`]. It sleeps until the earlier of the
//! next engine deadline or an inbound command, advances the engine clock by
//! the real elapsed time, applies the command, and publishes a fresh
//! snapshot. At game over the score record is handed to the leaderboard on
//! the blocking pool; a failed submission is reported, never fatal.

use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use serde_json::json;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use tetraj_core::{EngineError, GameLoop, GameSnapshot, LeaderboardGateway, PlayerProfile, ScoreRecord};
use tetraj_types::Command;

use crate::event_log::EventLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The game reached its terminal state
    GameOver,
    /// The command channel closed first; no record is produced
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Saved,
    Failed(String),
    NotSubmitted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub outcome: SessionOutcome,
    pub record: Option<ScoreRecord>,
    pub submission: Submission,
    /// Pieces spawned, hold swaps included
    pub pieces: u32,
}

/// Handles returned by [`spawn_session`]
pub struct SessionHandle {
    pub commands: mpsc::Sender<Command>,
    pub snapshots: watch::Receiver<GameSnapshot>,
    pub task: JoinHandle<anyhow::Result<SessionReport>>,
}

/// Spawn [`run_session`] on the current runtime with fresh channels
pub fn spawn_session<G>(
    game: GameLoop,
    player: PlayerProfile,
    gateway: G,
    log: EventLog,
    max_pending_commands: usize,
) -> SessionHandle
where
    G: LeaderboardGateway + Send + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel(max_pending_commands.max(1));
    let (snap_tx, snap_rx) = watch::channel(game.snapshot());
    let task = tokio::spawn(run_session(game, player, gateway, cmd_rx, snap_tx, log));
    SessionHandle {
        commands: cmd_tx,
        snapshots: snap_rx,
        task,
    }
}

struct Driver {
    game: GameLoop,
    log: EventLog,
    snapshots: watch::Sender<GameSnapshot>,
    last_piece: u32,
    last_tick: Instant,
}

impl Driver {
    fn publish(&self) {
        self.snapshots.send_replace(self.game.snapshot());
    }

    /// Advance the engine clock to "now", keeping sub-millisecond remainders
    fn catch_up(&mut self) -> Result<(), EngineError> {
        let now = Instant::now();
        let elapsed_ms = now.duration_since(self.last_tick).as_millis() as u64;
        self.last_tick += Duration::from_millis(elapsed_ms);
        self.game.tick(elapsed_ms)?;
        Ok(())
    }

    fn apply(&mut self, command: Command) -> Result<(), EngineError> {
        let accepted = self.game.apply(command)?;
        if accepted && command == Command::Pause {
            let event = if self.game.paused() { "pause" } else { "resume" };
            self.log.info(event, json!({ "clock_ms": self.game.clock_ms() }));
        }
        Ok(())
    }

    /// Log lock and spawn events produced since the last call
    fn log_progress(&mut self) {
        for event in self.game.take_lock_events() {
            self.log.info(
                "lock",
                json!({
                    "piece_id": event.piece_id,
                    "kind": event.kind,
                    "lines": event.lines_cleared,
                    "points": event.points,
                    "level": event.level,
                    "level_up": event.level_up,
                    "score": self.game.score(),
                }),
            );
        }
        if self.game.piece_id() != self.last_piece {
            self.last_piece = self.game.piece_id();
            if let Some(active) = self.game.active() {
                self.log.info(
                    "spawn",
                    json!({ "piece_id": self.last_piece, "kind": active.kind }),
                );
            }
        }
    }

    fn fault(&self, err: &EngineError) {
        self.log.error("engine_fault", json!({ "error": err.to_string() }));
    }
}

/// Run one game to completion.
///
/// Returns `Err` only for a structural engine violation; the game is
/// abandoned and the diagnostic carried in the error.
pub async fn run_session<G>(
    mut game: GameLoop,
    player: PlayerProfile,
    gateway: G,
    mut commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<GameSnapshot>,
    log: EventLog,
) -> anyhow::Result<SessionReport>
where
    G: LeaderboardGateway + Send + 'static,
{
    game.start();
    let config = game.config();
    log.info(
        "session_start",
        json!({
            "player_id": player.id,
            "seed": config.seed,
            "width": config.board_width,
            "height": config.board_height,
            "randomizer": config.randomizer,
        }),
    );

    let mut driver = Driver {
        game,
        log,
        snapshots,
        last_piece: 0,
        last_tick: Instant::now(),
    };
    driver.log_progress();
    driver.publish();

    let mut outcome = SessionOutcome::GameOver;
    while !driver.game.game_over() {
        let wait = driver.game.next_deadline_ms();
        let command = tokio::select! {
            biased;
            received = commands.recv() => match received {
                Some(command) => Some(command),
                None => {
                    outcome = SessionOutcome::Abandoned;
                    break;
                }
            },
            _ = tokio::time::sleep(Duration::from_millis(wait.unwrap_or(0))), if wait.is_some() => None,
        };

        let mut step = driver.catch_up();
        if step.is_ok() {
            // Locks that fell due while waiting come before the command's own
            driver.log_progress();
            if let Some(command) = command {
                step = driver.apply(command);
            }
        }
        if let Err(err) = step {
            driver.fault(&err);
            driver.publish();
            driver.log.close().await;
            return Err(err).context("game session aborted");
        }

        driver.log_progress();
        driver.publish();
    }

    let Driver { mut game, log, .. } = driver;
    let pieces = game.piece_id();

    if outcome == SessionOutcome::Abandoned {
        log.info("abandoned", json!({ "score": game.score(), "pieces": pieces }));
        log.close().await;
        return Ok(SessionReport {
            outcome,
            record: None,
            submission: Submission::NotSubmitted,
            pieces,
        });
    }

    let record = game.finalize(&player, Utc::now());
    let submission = match &record {
        Some(record) => {
            log.info(
                "game_over",
                json!({
                    "score": record.score,
                    "level": record.level,
                    "lines": record.lines,
                    "duration_ms": record.duration_ms,
                }),
            );
            submit(gateway, record.clone(), &log).await
        }
        None => Submission::NotSubmitted,
    };

    log.close().await;
    Ok(SessionReport {
        outcome,
        record,
        submission,
        pieces,
    })
}

/// Hand the record to the gateway without blocking the runtime
async fn submit<G>(gateway: G, record: ScoreRecord, log: &EventLog) -> Submission
where
    G: LeaderboardGateway + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || {
        let mut gateway = gateway;
        gateway.submit_score(&record)
    })
    .await;

    match result {
        Ok(Ok(())) => {
            log.info("submission", json!({ "status": "saved" }));
            Submission::Saved
        }
        Ok(Err(e)) => {
            log.warn("submission", json!({ "status": "failed", "error": e.to_string() }));
            Submission::Failed(e.to_string())
        }
        Err(e) => {
            log.warn("submission", json!({ "status": "failed", "error": e.to_string() }));
            Submission::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use tetraj_core::{GameConfig, GatewayError, Phase};

    #[derive(Clone, Default)]
    struct SharedGateway(Arc<Mutex<Vec<ScoreRecord>>>);

    impl LeaderboardGateway for SharedGateway {
        fn submit_score(&mut self, record: &ScoreRecord) -> Result<(), GatewayError> {
            self.0.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    struct OfflineGateway;

    impl LeaderboardGateway for OfflineGateway {
        fn submit_score(&mut self, _record: &ScoreRecord) -> Result<(), GatewayError> {
            Err(GatewayError::Unavailable)
        }
    }

    fn session<G>(gateway: G, log: EventLog) -> SessionHandle
    where
        G: LeaderboardGateway + Send + 'static,
    {
        let game = GameLoop::new(GameConfig::default()).unwrap();
        spawn_session(game, PlayerProfile::new("p1", "Ada"), gateway, log, 4)
    }

    async fn drop_until_closed(commands: &mpsc::Sender<Command>) {
        while commands.send(Command::HardDrop).await.is_ok() {}
    }

    #[tokio::test(start_paused = true)]
    async fn closing_the_channel_abandons_the_game() {
        let handle = session(SharedGateway::default(), EventLog::disabled());
        drop(handle.commands);

        let report = handle.task.await.unwrap().unwrap();
        assert_eq!(report.outcome, SessionOutcome::Abandoned);
        assert_eq!(report.record, None);
        assert_eq!(report.submission, Submission::NotSubmitted);
        assert_eq!(report.pieces, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn gravity_follows_the_runtime_clock() {
        let handle = session(SharedGateway::default(), EventLog::disabled());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(handle.snapshots.borrow().active.unwrap().y, 2);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        let snapshot = handle.snapshots.borrow().clone();
        assert_eq!(snapshot.active.unwrap().y, 3);
        assert_eq!(snapshot.clock_ms, 1000);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_freezes_gravity() {
        let handle = session(SharedGateway::default(), EventLog::disabled());
        handle.commands.send(Command::Pause).await.unwrap();

        tokio::time::sleep(Duration::from_millis(5000)).await;
        let snapshot = handle.snapshots.borrow().clone();
        assert!(snapshot.paused);
        assert_eq!(snapshot.active.unwrap().y, 2);

        handle.commands.send(Command::Pause).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let snapshot = handle.snapshots.borrow().clone();
        assert!(!snapshot.paused);
        assert_eq!(snapshot.active.unwrap().y, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn game_over_submits_the_record_once() {
        let gateway = SharedGateway::default();
        let handle = session(gateway.clone(), EventLog::disabled());
        drop_until_closed(&handle.commands).await;

        let report = handle.task.await.unwrap().unwrap();
        assert_eq!(report.outcome, SessionOutcome::GameOver);
        assert_eq!(report.submission, Submission::Saved);

        let record = report.record.unwrap();
        assert_eq!(record.player_id, "p1");
        assert_eq!(record.nickname, "Ada");
        assert!(record.score > 0);

        let saved = gateway.0.lock().unwrap();
        assert_eq!(saved.as_slice(), &[record]);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_submission_keeps_the_record() {
        let handle = session(OfflineGateway, EventLog::disabled());
        drop_until_closed(&handle.commands).await;

        let report = handle.task.await.unwrap().unwrap();
        assert_eq!(report.outcome, SessionOutcome::GameOver);
        assert!(report.record.is_some());
        assert_eq!(
            report.submission,
            Submission::Failed(GatewayError::Unavailable.to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn lifecycle_is_logged() {
        let (log, mut rx) = EventLog::channel();
        let handle = session(SharedGateway::default(), log);
        drop_until_closed(&handle.commands).await;
        handle.task.await.unwrap().unwrap();

        let mut events = Vec::new();
        while let Some(record) = rx.recv().await {
            events.push(record["event"].as_str().unwrap_or_default().to_string());
        }
        assert_eq!(events.first().map(String::as_str), Some("session_start"));
        for name in ["spawn", "lock", "game_over", "submission"] {
            assert!(events.iter().any(|e| e == name), "missing {name}");
        }
        assert_eq!(events.last().map(String::as_str), Some("submission"));
    }

    #[tokio::test(start_paused = true)]
    async fn lock_due_in_the_same_wakeup_as_a_hard_drop_is_logged() {
        let (log, mut rx) = EventLog::channel();
        let mut handle = session(SharedGateway::default(), log);

        // Push the first piece onto the floor and wait for its lock window
        for _ in 0..30 {
            handle.commands.send(Command::SoftDrop).await.unwrap();
        }
        handle
            .snapshots
            .wait_for(|s| matches!(s.phase, Phase::Locking { .. }))
            .await
            .unwrap();

        // The command is queued before the deadline passes, so one wakeup
        // locks the first piece and hard drops the second
        handle.commands.send(Command::HardDrop).await.unwrap();
        tokio::time::advance(Duration::from_millis(500)).await;
        handle.snapshots.wait_for(|s| s.piece_id == 3).await.unwrap();

        drop(handle.commands);
        let report = handle.task.await.unwrap().unwrap();
        assert_eq!(report.pieces, 3);

        let mut locks = Vec::new();
        let mut spawns = Vec::new();
        while let Some(record) = rx.recv().await {
            match record["event"].as_str() {
                Some("lock") => locks.push(record["piece_id"].as_u64().unwrap_or_default()),
                Some("spawn") => spawns.push(record["piece_id"].as_u64().unwrap_or_default()),
                _ => {}
            }
        }
        assert_eq!(locks, [1, 2]);
        assert_eq!(spawns, [1, 2, 3]);
    }
}
