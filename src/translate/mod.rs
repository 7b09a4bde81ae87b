//! Translation dispatch and reply correlation
//!
//! Requests go out fire-and-forget; replies come back whenever the gateway
//! gets around to them, possibly out of order, possibly never. Correctness
//! rests entirely on id lookup in the [`CorrelationStore`], not on arrival
//! order.

mod correlation;
mod gateway;

pub use correlation::{CorrelationStore, PendingTranslation, DEFAULT_PENDING_CAP};
pub use gateway::{ChannelGateway, TranslateReply, TranslateRequest, TranslationGateway};
