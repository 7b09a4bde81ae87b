use super::config::SessionSettings;
use super::meeting::MeetingSession;
use crate::dom::{Document, NodeId};
use crate::present::Presenter;
use crate::store::{HistoryStore, SettingsStore};
use crate::transcript::{ExtractorConfig, TranscriptExtractor};
use crate::translate::{CorrelationStore, TranslateReply, TranslateRequest, TranslationGateway};
use crate::watch::{CaptionEvent, CaptionWatcher, WatcherConfig};
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};

/// Attribute marking participant tiles in the host page
pub const PARTICIPANT_ATTR: &str = "data-participant-id";

/// Capacity of the controller's event and caption queues
const QUEUE_CAPACITY: usize = 64;

/// Everything the controller reacts to, as messages on one queue
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A debounced caption change (normally fed by the watcher)
    Caption(CaptionEvent),
    /// A translation reply delivered by the host
    Reply(TranslateReply),
    /// The synced settings changed
    SettingsChanged(SessionSettings),
    /// The page went hidden; persist the active meeting, keep watching
    VisibilityHidden,
    /// The page is going away; persist and shut the session down
    Teardown,
}

/// Tuning knobs for a caption session
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub watcher: WatcherConfig,
    pub extractor: ExtractorConfig,
    /// Bound on in-flight translation entries
    pub pending_cap: usize,
    /// Bound on rolling transcript lines per meeting
    pub rolling_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            watcher: WatcherConfig::default(),
            extractor: ExtractorConfig::default(),
            pending_cap: crate::translate::DEFAULT_PENDING_CAP,
            rolling_limit: 100,
        }
    }
}

/// The controller owning one caption-translation session end to end
///
/// Owns the watcher handle, correlation store, presenter, extractor, cached
/// settings, and the active meeting, and consumes every event from a single
/// queue in [`run`](CaptionSession::run): handlers run to completion one at a
/// time, so there is no locking and no handler ever races another. The only
/// suspension points are the gateway hand-off and store reads, and anything
/// read before them (settings, node liveness) is re-checked after.
pub struct CaptionSession {
    document: Document,
    settings_store: Arc<dyn SettingsStore>,
    history: Arc<dyn HistoryStore>,
    gateway: Arc<dyn TranslationGateway>,
    config: PipelineConfig,
    presenter: Presenter,
    extractor: TranscriptExtractor,
    correlation: CorrelationStore,
    settings: SessionSettings,
    watcher: Option<CaptionWatcher>,
    meeting: Option<MeetingSession>,
    captions_tx: mpsc::Sender<CaptionEvent>,
    captions_rx: mpsc::Receiver<CaptionEvent>,
    events_tx: mpsc::Sender<SessionEvent>,
    events_rx: mpsc::Receiver<SessionEvent>,
}

impl CaptionSession {
    pub fn new(
        document: Document,
        settings_store: Arc<dyn SettingsStore>,
        history: Arc<dyn HistoryStore>,
        gateway: Arc<dyn TranslationGateway>,
        config: PipelineConfig,
    ) -> Self {
        let (captions_tx, captions_rx) = mpsc::channel(QUEUE_CAPACITY);
        let (events_tx, events_rx) = mpsc::channel(QUEUE_CAPACITY);
        Self {
            presenter: Presenter::new(document.clone()),
            extractor: TranscriptExtractor::new(config.extractor.clone()),
            correlation: CorrelationStore::new(config.pending_cap),
            settings: SessionSettings::default(),
            watcher: None,
            meeting: None,
            document,
            settings_store,
            history,
            gateway,
            config,
            captions_tx,
            captions_rx,
            events_tx,
            events_rx,
        }
    }

    /// Sender the host uses to deliver replies and lifecycle signals
    pub fn events(&self) -> mpsc::Sender<SessionEvent> {
        self.events_tx.clone()
    }

    /// Drive the session until [`SessionEvent::Teardown`]
    pub async fn run(mut self) -> Result<()> {
        // Eager settings read at startup; a broken store degrades to
        // defaults rather than killing the session.
        match self.settings_store.load().await {
            Ok(settings) => self.settings = settings,
            Err(e) => warn!("failed to load settings, using defaults: {:#}", e),
        }

        let changes_task = spawn_change_forwarder(
            self.settings_store.subscribe(),
            self.events_tx.clone(),
        );

        if self.settings.enabled {
            self.start_watcher();
        }

        info!(
            "caption session running (gateway={}, enabled={})",
            self.gateway.name(),
            self.settings.enabled
        );

        loop {
            let next = tokio::select! {
                Some(caption) = self.captions_rx.recv() => SessionEvent::Caption(caption),
                event = self.events_rx.recv() => event.unwrap_or(SessionEvent::Teardown),
            };
            match next {
                SessionEvent::Caption(caption) => self.handle_caption(caption).await,
                SessionEvent::Reply(reply) => self.handle_reply(reply),
                SessionEvent::SettingsChanged(settings) => {
                    self.handle_settings_changed(settings);
                }
                SessionEvent::VisibilityHidden => self.finalize_meeting().await,
                SessionEvent::Teardown => {
                    self.finalize_meeting().await;
                    break;
                }
            }
        }

        self.stop_watcher();
        changes_task.abort();
        info!("caption session stopped");
        Ok(())
    }

    /// One debounced caption: keep the transcript current, then dispatch a
    /// translation request for the surviving text
    async fn handle_caption(&mut self, event: CaptionEvent) {
        if !self.settings.enabled {
            return;
        }

        if self.meeting.is_none() {
            let meeting = MeetingSession::new(self.config.rolling_limit);
            info!("meeting recording started: {}", meeting.id);
            self.meeting = Some(meeting);
        }

        if let Some(meeting) = self.meeting.as_mut() {
            meeting.set_participants(self.document.count_with_attr(PARTICIPANT_ATTR));
            meeting.push_line(&event.raw_text);
        }

        if let Some(container) = self.locate_container() {
            let lines = self.extractor.extract(&self.document, container);
            if let Some(meeting) = self.meeting.as_mut() {
                meeting.set_extraction(lines);
            }
        }

        // Settings are re-read on every dispatch; the stored copy is never
        // trusted across events.
        match self.settings_store.load().await {
            Ok(settings) => self.settings = settings,
            Err(e) => warn!("failed to refresh settings: {:#}", e),
        }
        if !self.settings.enabled {
            return;
        }

        let id = self.correlation.insert(event.source, event.raw_text.clone());
        let request = TranslateRequest {
            text: event.raw_text,
            target_lang: self.settings.target_lang.clone(),
            id,
        };
        debug!("dispatching translation {} ({} chars)", id, request.text.len());
        if let Err(e) = self.gateway.translate(request).await {
            // Dispatch failures leave the caption untranslated, nothing more.
            warn!("translation dispatch failed: {:#}", e);
            let _ = self.correlation.take(&id);
        }
    }

    /// One gateway reply: everything about it is re-checked at delivery time
    fn handle_reply(&mut self, reply: TranslateReply) {
        if let Some(error) = reply.error {
            debug!("translation {} failed upstream: {}", reply.id, error);
            return;
        }
        let Some(translated_text) = reply.translated_text else {
            debug!("translation {} carried no text, dropping", reply.id);
            return;
        };
        if !self.settings.enabled {
            debug!("translation {} arrived while disabled, dropping", reply.id);
            return;
        }
        // Unknown id or a dead owner means the result is late or obsolete,
        // not an error.
        let Some(pending) = self.correlation.take(&reply.id) else {
            debug!("dropping reply for unknown id {}", reply.id);
            return;
        };
        if !self.document.exists(pending.owner) {
            debug!("dropping reply {}, owner node is gone", reply.id);
            return;
        }
        self.presenter.render(
            self.settings.display_mode,
            pending.owner,
            &pending.original_text,
            &translated_text,
        );
    }

    fn handle_settings_changed(&mut self, settings: SessionSettings) {
        let previous = std::mem::replace(&mut self.settings, settings);

        if previous.enabled != self.settings.enabled {
            if self.settings.enabled {
                info!("translation enabled");
                self.start_watcher();
            } else {
                info!("translation disabled");
                self.presenter.clear_all();
                self.correlation.clear();
                self.stop_watcher();
            }
        } else if self.settings.enabled && previous.display_mode != self.settings.display_mode {
            info!("display mode changed to {:?}", self.settings.display_mode);
            self.presenter.clear_all();
        }
    }

    /// Persist the active meeting, if any, and return to idle
    async fn finalize_meeting(&mut self) {
        let Some(meeting) = self.meeting.take() else {
            return;
        };
        let record = meeting.finish(Utc::now());
        info!(
            "meeting ended after {} minutes, {} transcript lines",
            record.duration_minutes,
            record.transcript.len()
        );
        if let Err(e) = self.history.append(record).await {
            error!("failed to save meeting record: {:#}", e);
        }
    }

    fn start_watcher(&mut self) {
        // Restart semantics: any previous watcher is stopped first, and the
        // locator list is walked from scratch.
        self.stop_watcher();
        self.watcher = Some(CaptionWatcher::start(
            self.document.clone(),
            self.config.watcher.clone(),
            self.captions_tx.clone(),
        ));
    }

    fn stop_watcher(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            watcher.stop();
        }
    }

    fn locate_container(&self) -> Option<NodeId> {
        let watcher = &self.config.watcher;
        watcher
            .locators
            .iter()
            .find_map(|value| self.document.find_by_attr(&watcher.locator_attr, value))
    }
}

/// Forward settings change notifications into the session queue
fn spawn_change_forwarder(
    mut changes: broadcast::Receiver<SessionSettings>,
    events: mpsc::Sender<SessionEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match changes.recv().await {
                Ok(settings) => {
                    if events
                        .send(SessionEvent::SettingsChanged(settings))
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("settings change stream lagged, {} updates skipped", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
