use crate::session::PipelineConfig;
use crate::transcript::ExtractorConfig;
use crate::watch::WatcherConfig;
use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub pipeline: PipelineSettings,
    pub extractor: ExtractorConfig,
    pub history: HistoryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            pipeline: PipelineSettings::default(),
            extractor: ExtractorConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "caption-translator".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Debounce quiet period for caption changes, in milliseconds
    pub debounce_ms: u64,
    /// Delay between caption container lookup attempts, in milliseconds
    pub locate_retry_ms: u64,
    /// Bound on in-flight translation entries
    pub pending_cap: usize,
    /// Bound on rolling transcript lines per meeting
    pub rolling_limit: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            locate_retry_ms: 1000,
            pending_cap: 256,
            rolling_limit: 100,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Where the JSON-backed history store keeps its records
    pub path: String,
    /// Bound on stored meeting records
    pub cap: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: "meeting-history.json".to_string(),
            cap: 50,
        }
    }
}

impl Config {
    /// Load configuration, layering an optional file over built-in defaults
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Session tuning derived from this configuration
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            watcher: WatcherConfig {
                quiet_period: Duration::from_millis(self.pipeline.debounce_ms),
                locate_retry: Duration::from_millis(self.pipeline.locate_retry_ms),
                ..WatcherConfig::default()
            },
            extractor: self.extractor.clone(),
            pending_cap: self.pipeline.pending_cap,
            rolling_limit: self.pipeline.rolling_limit,
        }
    }
}
