//! Session lifecycle and control
//!
//! This module provides the `CaptionSession` controller that ties the
//! pipeline together:
//! - Starting/stopping the caption watcher on enable transitions
//! - Dispatching debounced captions to the translation gateway
//! - Correlating replies back to caption lines and rendering them
//! - Tracking the active meeting and persisting it on teardown
//!
//! Everything the controller reacts to arrives as a message on one
//! single-consumer queue, so handlers never run in parallel and no shared
//! state needs locking.

mod config;
mod controller;
mod meeting;

pub use config::SessionSettings;
pub use controller::{CaptionSession, PipelineConfig, SessionEvent, PARTICIPANT_ATTR};
pub use meeting::MeetingSession;
