//! External storage collaborators
//!
//! Two scopes, mirroring the surrounding extension host:
//! - synced scope ([`SettingsStore`]): user settings, read-mostly, change
//!   notifications pushed to subscribers; the core never writes it
//! - local scope ([`HistoryStore`]): finished meeting records, capped,
//!   most-recent-first; the core only appends

mod history;
mod settings;

pub use history::{
    HistoryStore, JsonHistoryStore, MeetingRecord, MemoryHistoryStore, DEFAULT_HISTORY_CAP,
};
pub use settings::{MemorySettingsStore, SettingsStore};
