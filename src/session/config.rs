use crate::present::DisplayMode;
use serde::{Deserialize, Serialize};

/// User settings held in the host's synced storage scope
///
/// Read-mostly shared state: the controller refreshes its copy on every
/// translation dispatch and on every change notification, and tolerates the
/// copy going stale across an in-flight request (the request completes with
/// whatever language was current at dispatch time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Master switch; off means no dispatches and no rendered translations
    pub enabled: bool,

    /// How translations are displayed
    #[serde(rename = "captionMode")]
    pub display_mode: DisplayMode,

    /// ISO-639-1 target language code sent with every request
    #[serde(rename = "targetLang")]
    pub target_lang: String,

    /// Vendor API key; carried for the host, unused by the core itself
    #[serde(rename = "apiKey")]
    pub api_key: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            display_mode: DisplayMode::Bilingual,
            target_lang: "ZH".to_string(),
            api_key: String::new(),
        }
    }
}
