//! Leaderboard tests against a real JSON file in a temp directory

use std::path::PathBuf;

use chrono::{TimeZone, Utc};

use tetraj::core::{LeaderboardGateway, ScoreRecord};
use tetraj::leaderboard::{
    leaderboard_with_store, local_leaderboard, JsonFileStorageProvider, KvStorageProvider,
    Leaderboard, MemoryStore,
    StorageProvider, MAX_ENTRIES,
};

struct TempFile(PathBuf);

impl TempFile {
    fn new(tag: &str) -> Self {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        Self(std::env::temp_dir().join(format!(
            "tetraj-{}-{}-{}.json",
            tag,
            std::process::id(),
            nanos
        )))
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

fn record(nickname: &str, score: u64, minute: u32) -> ScoreRecord {
    ScoreRecord {
        player_id: nickname.to_lowercase(),
        nickname: nickname.into(),
        score,
        level: (score / 1000) as u32,
        lines: (score / 100) as u32,
        timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 9, minute, 0).unwrap(),
        duration_ms: 90_000,
    }
}

#[test]
fn missing_file_is_created_empty() {
    let file = TempFile::new("create");
    let mut board = local_leaderboard(Some(file.0.clone()), None);

    assert!(file.0.exists());
    assert!(board.top_entries().is_empty());
    assert!(board.active_provider_name().starts_with("JSON ("));
    let raw = std::fs::read_to_string(&file.0).unwrap();
    assert_eq!(serde_json::from_str::<Vec<ScoreRecord>>(&raw).unwrap(), Vec::new());
}

#[test]
fn corrupt_file_starts_over() {
    let file = TempFile::new("corrupt");
    std::fs::write(&file.0, "{ not json").unwrap();

    let mut board = local_leaderboard(Some(file.0.clone()), None);
    assert!(board.top_entries().is_empty());
    board.save(&record("Ada", 1500, 0)).unwrap();

    let raw = std::fs::read_to_string(&file.0).unwrap();
    let saved: Vec<ScoreRecord> = serde_json::from_str(&raw).unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].nickname, "Ada");
}

#[test]
fn entries_survive_a_reload_in_rank_order() {
    let file = TempFile::new("reload");
    {
        let mut board = local_leaderboard(Some(file.0.clone()), None);
        board.save(&record("Low", 300, 1)).unwrap();
        board.save(&record("High", 9000, 2)).unwrap();
        board.save(&record("TieLate", 500, 9)).unwrap();
        board.save(&record("TieEarly", 500, 3)).unwrap();
    }

    let mut board = local_leaderboard(Some(file.0.clone()), None);
    let names: Vec<String> = board.top_entries().into_iter().map(|e| e.nickname).collect();
    assert_eq!(names, ["High", "TieEarly", "TieLate", "Low"]);
}

#[test]
fn qualifying_follows_the_last_entry_once_full() {
    let file = TempFile::new("qualify");
    let mut board = local_leaderboard(Some(file.0.clone()), None);
    assert!(board.is_qualifying_score(0));

    for i in 0..MAX_ENTRIES as u64 {
        board.save(&record(&format!("P{i}"), 1000 + i * 100, i as u32)).unwrap();
    }
    // Board is full; the weakest entry holds 1000
    assert!(!board.is_qualifying_score(999));
    assert!(!board.is_qualifying_score(1000));
    assert!(board.is_qualifying_score(1001));

    board.save(&record("Newcomer", 1001, 59)).unwrap();
    let entries = board.top_entries();
    assert_eq!(entries.len(), MAX_ENTRIES);
    assert_eq!(entries.last().unwrap().nickname, "Newcomer");
    assert!(entries.iter().all(|e| e.nickname != "P0"));
}

#[test]
fn gateway_submission_writes_through() {
    let file = TempFile::new("gateway");
    let mut board = local_leaderboard(Some(file.0.clone()), None);
    board.submit_score(&record("Gate", 4200, 5)).unwrap();

    let mut provider = JsonFileStorageProvider::new(file.0.clone());
    provider.initialize();
    assert_eq!(provider.top().unwrap(), vec![record("Gate", 4200, 5)]);
}

#[test]
fn key_value_store_is_preferred_when_reachable() {
    let file = TempFile::new("prefer");
    let store = MemoryStore::new();
    let mut board = Leaderboard::new(vec![
        Box::new(KvStorageProvider::new(store.clone(), "memory")),
        Box::new(JsonFileStorageProvider::new(file.0.clone())),
    ]);
    assert_eq!(board.active_provider_name(), "KeyValue (memory)");
    board.save(&record("Kv", 700, 0)).unwrap();

    // The JSON provider was never initialized
    assert!(!file.0.exists());

    let mut again = Leaderboard::new(vec![Box::new(KvStorageProvider::new(store, "memory"))]);
    assert_eq!(again.top_entries().len(), 1);
}

#[test]
fn offline_key_value_store_falls_back_to_file() {
    let file = TempFile::new("fallback");
    let mut board = Leaderboard::new(vec![
        Box::new(KvStorageProvider::new(MemoryStore::offline(), "remote")),
        Box::new(JsonFileStorageProvider::new(file.0.clone())),
    ]);
    assert!(board.active_provider_name().starts_with("JSON ("));
    board.save(&record("Local", 100, 0)).unwrap();
    assert_eq!(board.top_entries().len(), 1);
}

#[test]
fn store_chain_prefers_store_then_file() {
    let file = TempFile::new("chain");
    let store = MemoryStore::new();
    let mut board = leaderboard_with_store(store.clone(), "memory", Some(file.0.clone()));
    assert_eq!(board.active_provider_name(), "KeyValue (memory)");
    board.submit_score(&record("Shared", 900, 1)).unwrap();
    assert!(!file.0.exists());

    let mut down = leaderboard_with_store(MemoryStore::offline(), "memory", Some(file.0.clone()));
    assert_eq!(down.active_provider_name(), format!("JSON ({})", file.0.display()));
    assert!(down.top_entries().is_empty());
}

#[test]
fn unreachable_redis_falls_back_to_file() {
    let file = TempFile::new("redis-down");
    let mut board = local_leaderboard(Some(file.0.clone()), Some("redis://127.0.0.1:1"));
    assert!(board.active_provider_name().starts_with("JSON ("));
    board.save(&record("Offline", 321, 2)).unwrap();

    let mut provider = JsonFileStorageProvider::new(file.0.clone());
    provider.initialize();
    assert_eq!(provider.top().unwrap(), vec![record("Offline", 321, 2)]);
}

#[test]
fn malformed_redis_url_is_ignored() {
    let file = TempFile::new("redis-bad-url");
    let board = local_leaderboard(Some(file.0.clone()), Some("not a url"));
    assert!(board.active_provider_name().starts_with("JSON ("));
}
