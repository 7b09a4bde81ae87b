// Tests for meeting history storage: ordering, the record cap, and the
// JSON-file-backed store.

use anyhow::Result;
use caption_translator::{
    HistoryStore, JsonHistoryStore, MeetingRecord, MemoryHistoryStore, DEFAULT_HISTORY_CAP,
};
use chrono::Utc;
use tempfile::TempDir;
use uuid::Uuid;

fn record(title: &str) -> MeetingRecord {
    MeetingRecord {
        id: Uuid::new_v4(),
        title: title.to_string(),
        date: Utc::now(),
        duration_minutes: 30,
        participants: 3,
        transcript: vec!["Alice: Hi there".to_string()],
    }
}

#[tokio::test]
async fn history_is_most_recent_first() -> Result<()> {
    let store = MemoryHistoryStore::default();
    store.append(record("first")).await?;
    store.append(record("second")).await?;
    store.append(record("third")).await?;

    let records = store.list().await?;
    let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
    Ok(())
}

#[tokio::test]
async fn history_cap_drops_oldest_inserted() -> Result<()> {
    let store = MemoryHistoryStore::default();
    for i in 0..DEFAULT_HISTORY_CAP + 5 {
        store.append(record(&format!("meeting {i}"))).await?;
    }

    let records = store.list().await?;
    assert_eq!(records.len(), DEFAULT_HISTORY_CAP);
    assert_eq!(records[0].title, "meeting 54");
    // The five oldest insertions are gone.
    assert_eq!(records.last().unwrap().title, "meeting 5");
    Ok(())
}

#[tokio::test]
async fn clear_empties_history() -> Result<()> {
    let store = MemoryHistoryStore::default();
    store.append(record("only")).await?;
    store.clear().await?;
    assert!(store.list().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn json_store_round_trips_records() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("meeting-history.json");

    let store = JsonHistoryStore::new(&path, DEFAULT_HISTORY_CAP);
    store.append(record("standup")).await?;
    store.append(record("retro")).await?;

    // A fresh store instance reads the same file the first one wrote.
    let reopened = JsonHistoryStore::new(&path, DEFAULT_HISTORY_CAP);
    let records = reopened.list().await?;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].title, "retro");
    assert_eq!(records[1].title, "standup");
    assert_eq!(records[1].transcript, vec!["Alice: Hi there".to_string()]);
    Ok(())
}

#[tokio::test]
async fn json_store_applies_cap() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("meeting-history.json");

    let store = JsonHistoryStore::new(&path, 2);
    store.append(record("first")).await?;
    store.append(record("second")).await?;
    store.append(record("third")).await?;

    let records = store.list().await?;
    let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["third", "second"]);
    Ok(())
}

#[tokio::test]
async fn json_store_clear_removes_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("meeting-history.json");

    let store = JsonHistoryStore::new(&path, DEFAULT_HISTORY_CAP);
    store.append(record("only")).await?;
    assert!(path.exists());

    store.clear().await?;
    assert!(!path.exists());
    assert!(store.list().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn empty_json_store_lists_nothing() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonHistoryStore::new(dir.path().join("missing.json"), DEFAULT_HISTORY_CAP);
    assert!(store.list().await?.is_empty());
    Ok(())
}
