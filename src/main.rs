//! Headless tetraj runner.
//!
//! `play` runs one session driven by the greedy autoplayer and submits the
//! result to the local leaderboard; `leaderboard` prints the ranked table.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use tetraj::core::{GameConfig, GameLoop, PlayerProfile, ScoreRecord};
use tetraj::engine::{choose_from_snapshot, Weights};
use tetraj::leaderboard::{format_date, format_duration, format_score, local_leaderboard};
use tetraj::runtime::{spawn_session, EventLog, RuntimeConfig, SessionReport, Submission};
use tetraj::types::Command;

#[derive(Debug, Parser)]
#[command(name = "tetraj")]
#[command(about = "Falling-block engine with a local leaderboard")]
struct Cli {
    /// Leaderboard file (defaults to TETRAJ_LEADERBOARD_PATH, then $HOME)
    #[arg(long, global = true)]
    leaderboard: Option<PathBuf>,

    /// Redis server tried before the file (defaults to TETRAJ_REDIS_URL)
    #[arg(long, global = true)]
    redis_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Let the autoplayer run one game
    Play {
        /// Game configuration as JSON; missing fields keep their defaults
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "guest")]
        player_id: String,
        #[arg(long, default_value = "Guest")]
        nickname: String,
        /// Pieces the autoplayer places before it starts hard dropping
        #[arg(long, default_value_t = 200)]
        max_pieces: u32,
    },
    /// Print the ranked leaderboard
    Leaderboard,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            config,
            seed,
            player_id,
            nickname,
            max_pieces,
        } => {
            let mut runtime = load_config(config.as_deref())?;
            if let Some(seed) = seed {
                runtime.game.seed = seed;
            }
            if cli.leaderboard.is_some() {
                runtime.leaderboard_path = cli.leaderboard;
            }
            if cli.redis_url.is_some() {
                runtime.redis_url = cli.redis_url;
            }
            let player = PlayerProfile::new(player_id, nickname);
            let report = play(runtime.clone(), player, max_pieces).await?;
            print_report(&report);
            print_table(&runtime, report.record.as_ref());
            Ok(())
        }
        Commands::Leaderboard => {
            let mut runtime = RuntimeConfig::from_env();
            if cli.leaderboard.is_some() {
                runtime.leaderboard_path = cli.leaderboard;
            }
            if cli.redis_url.is_some() {
                runtime.redis_url = cli.redis_url;
            }
            print_table(&runtime, None);
            Ok(())
        }
    }
}

/// Config file first, then `TETRAJ_*` variables on top
fn load_config(path: Option<&std::path::Path>) -> Result<RuntimeConfig> {
    let game = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<GameConfig>(&raw)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    let base = RuntimeConfig {
        game,
        ..RuntimeConfig::default()
    };
    Ok(base.overlay(|key| std::env::var(key).ok()))
}

async fn play(config: RuntimeConfig, player: PlayerProfile, max_pieces: u32) -> Result<SessionReport> {
    let game = GameLoop::new(config.game).context("invalid game configuration")?;
    let log = match &config.log_path {
        Some(path) => EventLog::open(path),
        None => EventLog::disabled(),
    };
    let gateway = local_leaderboard(config.leaderboard_path, config.redis_url.as_deref());

    let handle = spawn_session(game, player, gateway, log, config.max_pending_commands);
    let mut snapshots = handle.snapshots.clone();
    let weights = Weights::default();
    let mut last_piece = 0;

    'session: while snapshots.changed().await.is_ok() {
        let snapshot = snapshots.borrow_and_update().clone();
        if snapshot.game_over {
            break;
        }
        if !snapshot.playable() || snapshot.piece_id == last_piece {
            continue;
        }
        last_piece = snapshot.piece_id;

        let commands = if snapshot.piece_id > max_pieces {
            vec![Command::HardDrop]
        } else {
            choose_from_snapshot(&snapshot, &weights)
                .map_or_else(|| vec![Command::HardDrop], |choice| choice.plan.commands)
        };
        for command in commands {
            if handle.commands.send(command).await.is_err() {
                break 'session;
            }
        }
    }

    drop(handle.commands);
    handle.task.await.context("session task panicked")?
}

fn print_report(report: &SessionReport) {
    println!("outcome:  {:?}", report.outcome);
    println!("pieces:   {}", report.pieces);
    if let Some(record) = &report.record {
        println!("score:    {}", format_score(record.score));
        println!("level:    {}", record.level);
        println!("lines:    {}", record.lines);
        println!("time:     {}", format_duration(record.duration_ms));
    }
    match &report.submission {
        Submission::Saved => println!("saved:    yes"),
        Submission::Failed(reason) => println!("saved:    no ({reason})"),
        Submission::NotSubmitted => println!("saved:    not submitted"),
    }
}

fn print_table(config: &RuntimeConfig, highlight: Option<&ScoreRecord>) {
    let mut board = local_leaderboard(config.leaderboard_path.clone(), config.redis_url.as_deref());
    let entries = board.top_entries();
    println!();
    println!("Leaderboard ({})", board.active_provider_name());
    if entries.is_empty() {
        println!("  no scores yet");
        return;
    }
    println!("{:>3}  {:<16} {:>10} {:>5} {:>5} {:>6}  {}", "#", "Player", "Score", "Lvl", "Lines", "Time", "Date");
    for (rank, entry) in entries.iter().enumerate() {
        let marker = if highlight == Some(entry) { '*' } else { ' ' };
        println!(
            "{:>3}{} {:<16} {:>10} {:>5} {:>5} {:>6}  {}",
            rank + 1,
            marker,
            entry.nickname,
            format_score(entry.score),
            entry.level,
            entry.lines,
            format_duration(entry.duration_ms),
            format_date(&entry.timestamp),
        );
    }
}
