use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;
use uuid::Uuid;

/// Default bound on stored meeting records
pub const DEFAULT_HISTORY_CAP: usize = 50;

/// Persisted form of a finished meeting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRecord {
    pub id: Uuid,
    pub title: String,
    pub date: DateTime<Utc>,
    pub duration_minutes: i64,
    pub participants: usize,
    pub transcript: Vec<String>,
}

/// Local-scope meeting history, most-recent-first, capped
///
/// Insertion past the cap silently drops the oldest-inserted record. A
/// separate review surface reads and exports this list; the core only ever
/// appends to it.
#[async_trait::async_trait]
pub trait HistoryStore: Send + Sync {
    /// Prepend a record, evicting past the cap
    async fn append(&self, record: MeetingRecord) -> Result<()>;

    /// All records, most recent first
    async fn list(&self) -> Result<Vec<MeetingRecord>>;

    async fn clear(&self) -> Result<()>;
}

fn push_capped(records: &mut Vec<MeetingRecord>, record: MeetingRecord, cap: usize) {
    records.insert(0, record);
    records.truncate(cap);
}

/// In-memory history store
pub struct MemoryHistoryStore {
    records: Mutex<Vec<MeetingRecord>>,
    cap: usize,
}

impl MemoryHistoryStore {
    pub fn new(cap: usize) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            cap: cap.max(1),
        }
    }
}

impl Default for MemoryHistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAP)
    }
}

#[async_trait::async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(&self, record: MeetingRecord) -> Result<()> {
        let mut records = self.records.lock().unwrap();
        info!("saving meeting record: {}", record.title);
        push_capped(&mut records, record, self.cap);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<MeetingRecord>> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn clear(&self) -> Result<()> {
        self.records.lock().unwrap().clear();
        Ok(())
    }
}

/// History store backed by a JSON file
///
/// The whole list is rewritten on every append; meeting records are small
/// and appends happen once per meeting.
pub struct JsonHistoryStore {
    path: PathBuf,
    cap: usize,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>, cap: usize) -> Self {
        Self {
            path: path.into(),
            cap: cap.max(1),
        }
    }

    fn read_records(&self) -> Result<Vec<MeetingRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read history file {}", self.path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("failed to parse history file {}", self.path.display()))
    }

    fn write_records(&self, records: &[MeetingRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create history directory {}", parent.display())
                })?;
            }
        }
        let data = serde_json::to_string_pretty(records)?;
        std::fs::write(&self.path, data)
            .with_context(|| format!("failed to write history file {}", self.path.display()))
    }
}

#[async_trait::async_trait]
impl HistoryStore for JsonHistoryStore {
    async fn append(&self, record: MeetingRecord) -> Result<()> {
        let mut records = self.read_records()?;
        info!("saving meeting record: {}", record.title);
        push_capped(&mut records, record, self.cap);
        self.write_records(&records)
    }

    async fn list(&self) -> Result<Vec<MeetingRecord>> {
        self.read_records()
    }

    async fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("failed to remove history file {}", self.path.display()))?;
        }
        Ok(())
    }
}
