//! Caption observation
//!
//! This module provides the front half of the pipeline:
//! - `CaptionWatcher` locates the host page's caption container and turns
//!   raw text-node changes into `CaptionEvent`s
//! - `Debouncer` coalesces the character-by-character churn of a live
//!   caption line so one quiet line yields one downstream event

mod debounce;
mod watcher;

pub use debounce::Debouncer;
pub use watcher::{caption_container_locators, CaptionEvent, CaptionWatcher, WatcherConfig};
