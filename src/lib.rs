pub mod config;
pub mod dom;
pub mod present;
pub mod session;
pub mod store;
pub mod transcript;
pub mod translate;
pub mod watch;

pub use config::Config;
pub use dom::{Document, Mutation, MutationKind, NodeId};
pub use present::{DisplayMode, Presenter, FLOATING_MARKER, MARKER_ATTR, TRANSLATION_MARKER};
pub use session::{
    CaptionSession, MeetingSession, PipelineConfig, SessionEvent, SessionSettings,
    PARTICIPANT_ATTR,
};
pub use store::{
    HistoryStore, JsonHistoryStore, MeetingRecord, MemoryHistoryStore, MemorySettingsStore,
    SettingsStore, DEFAULT_HISTORY_CAP,
};
pub use transcript::{ExtractorConfig, TranscriptExtractor};
pub use translate::{
    ChannelGateway, CorrelationStore, PendingTranslation, TranslateReply, TranslateRequest,
    TranslationGateway, DEFAULT_PENDING_CAP,
};
pub use watch::{caption_container_locators, CaptionEvent, CaptionWatcher, Debouncer, WatcherConfig};
