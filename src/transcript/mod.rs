//! Heuristic transcript extraction
//!
//! The host page has no semantic "who said what" API, so speaker/utterance
//! structure is inferred from loose structural signals: presence of an
//! avatar image, text length bounds, and a handful of banned substrings.
//! The knobs live in [`ExtractorConfig`] so they can be tuned and tested
//! apart from the observation plumbing.

mod extractor;

pub use extractor::{ExtractorConfig, TranscriptExtractor};
