use crate::present::DisplayMode;
use crate::session::SessionSettings;
use anyhow::Result;
use std::sync::Mutex;
use tokio::sync::broadcast;

/// Capacity of the settings change-notification channel
const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// Synced-scope settings storage owned by the surrounding host
///
/// The core reads it eagerly at startup and again on every translation
/// dispatch, and subscribes to change notifications; a cached copy is never
/// trusted across those boundaries.
#[async_trait::async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read the current settings
    async fn load(&self) -> Result<SessionSettings>;

    /// Subscribe to change notifications carrying the new settings
    fn subscribe(&self) -> broadcast::Receiver<SessionSettings>;
}

/// In-memory settings store with typed setters that publish change events
///
/// Stands in for the host's synced key-value scope; the setters are what a
/// settings popup would call.
pub struct MemorySettingsStore {
    settings: Mutex<SessionSettings>,
    changes: broadcast::Sender<SessionSettings>,
}

impl MemorySettingsStore {
    pub fn new(settings: SessionSettings) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            settings: Mutex::new(settings),
            changes,
        }
    }

    fn update(&self, apply: impl FnOnce(&mut SessionSettings)) {
        let updated = {
            let mut settings = self.settings.lock().unwrap();
            apply(&mut settings);
            settings.clone()
        };
        let _ = self.changes.send(updated);
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.update(|s| s.enabled = enabled);
    }

    pub fn set_display_mode(&self, mode: DisplayMode) {
        self.update(|s| s.display_mode = mode);
    }

    pub fn set_target_lang(&self, lang: &str) {
        self.update(|s| s.target_lang = lang.to_string());
    }

    pub fn set_api_key(&self, key: &str) {
        self.update(|s| s.api_key = key.to_string());
    }
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self::new(SessionSettings::default())
    }
}

#[async_trait::async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> Result<SessionSettings> {
        Ok(self.settings.lock().unwrap().clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionSettings> {
        self.changes.subscribe()
    }
}
