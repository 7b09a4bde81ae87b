use super::debounce::Debouncer;
use crate::dom::{Document, Mutation, MutationKind, NodeId};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// A coalesced caption change observed in the host document
///
/// `source` is the element the changed text node hangs under; it is where a
/// translation for this caption line will later be rendered. The node may be
/// gone by then, so holders must re-check it against the document at use time.
#[derive(Debug, Clone)]
pub struct CaptionEvent {
    pub source: NodeId,
    pub raw_text: String,
    pub observed_at: DateTime<Utc>,
}

/// Localized `aria-label` values the host page uses for its caption
/// container, in lookup order
///
/// The label follows the meeting UI's display language, so every variant has
/// to be tried on every (re)start; the match is never cached across sessions.
pub fn caption_container_locators() -> Vec<String> {
    [
        "字幕",
        "Caption",
        "Captions",
        "Subtitles",
        "Subtítulos",
        "Untertitel",
        "자막",
        "キャプション",
        "Legendas",
        "Sous-titres",
        "Titoli",
        "Titrer",
        "Napisy",
        "Текст",
        "Titulky",
        "Titlovi",
        "Felirat",
        "Titrai",
        "Titluri",
        "Undergitter",
        "Tekstitys",
        "Subtitluri",
        "คำบรรยาย",
        "Altyazılar",
        "Субтитри",
        "Podnapisi",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Configuration for [`CaptionWatcher`]
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Attribute the locator values match against
    pub locator_attr: String,
    /// Ordered locator values; the full list is walked on every attempt
    pub locators: Vec<String>,
    /// Debounce quiet period applied to caption changes
    pub quiet_period: Duration,
    /// Delay between container lookup attempts
    pub locate_retry: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            locator_attr: "aria-label".to_string(),
            locators: caption_container_locators(),
            quiet_period: Duration::from_millis(500),
            locate_retry: Duration::from_millis(1000),
        }
    }
}

/// Watches the host document's caption container and emits debounced
/// [`CaptionEvent`]s
///
/// Locates the container by trying each configured locator, retrying on a
/// fixed delay until found or stopped. Once found it filters the document's
/// mutation stream down to text changes inside that subtree. If the container
/// is torn out of the page the events simply stop; re-location only happens
/// on an explicit restart.
pub struct CaptionWatcher {
    task: Option<JoinHandle<()>>,
}

impl CaptionWatcher {
    /// Start watching, emitting events into `output`
    pub fn start(
        document: Document,
        config: WatcherConfig,
        output: mpsc::Sender<CaptionEvent>,
    ) -> Self {
        let task = tokio::spawn(async move {
            let debouncer = Debouncer::new(config.quiet_period, output);

            let container = loop {
                let found = config
                    .locators
                    .iter()
                    .find_map(|value| document.find_by_attr(&config.locator_attr, value));
                match found {
                    Some(id) => break id,
                    None => {
                        debug!("caption container not found, retrying");
                        sleep(config.locate_retry).await;
                    }
                }
            };

            info!("observing caption container {}", container);

            let mut mutations = document.subscribe();
            loop {
                match mutations.recv().await {
                    Ok(Mutation {
                        kind: MutationKind::CharacterData,
                        target,
                    }) => {
                        if !document.is_descendant_of(target, container) {
                            continue;
                        }
                        let Some(raw_text) = document.own_text(target) else {
                            continue;
                        };
                        if raw_text.trim().is_empty() {
                            continue;
                        }
                        let Some(source) = document.parent(target) else {
                            continue;
                        };
                        debouncer.call(CaptionEvent {
                            source,
                            raw_text,
                            observed_at: Utc::now(),
                        });
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("mutation stream lagged, {} notifications skipped", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Self { task: Some(task) }
    }

    /// Stop watching; safe to call more than once
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("stopped observing captions");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for CaptionWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}
