use crate::dom::{Document, NodeId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tunable thresholds for the extraction heuristics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Longest leaf text accepted as a speaker label
    pub speaker_max_len: usize,
    /// Utterances at or above this length are rejected (whole-container grabs)
    pub content_max_len: usize,
    /// Minimum word count for a valid utterance
    pub content_min_words: usize,
    /// Line length bound for the loose fallback pass
    pub fallback_max_len: usize,
    /// Lines at or below this length are ignored by the fallback pass
    pub fallback_min_len: usize,
    /// Substring marking URL-like text, rejected everywhere
    pub url_substring: String,
    /// Substring marking leaked internal attributes, rejected in utterances
    pub attribute_substring: String,
    /// Label used when no plausible speaker is found in a message
    pub unknown_speaker: String,
    /// Label prefixed to unattributed fallback lines
    pub generic_speaker: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            speaker_max_len: 50,
            content_max_len: 500,
            content_min_words: 2,
            fallback_max_len: 200,
            fallback_min_len: 5,
            url_substring: "http".to_string(),
            attribute_substring: "data-iml".to_string(),
            unknown_speaker: "unknown speaker".to_string(),
            generic_speaker: "participant".to_string(),
        }
    }
}

/// Reconstructs "speaker: utterance" lines from the caption container
///
/// Two passes: a structural pass that pairs a speaker sub-child (has an
/// avatar image somewhere below it) with a content sub-child (text, no
/// image), and a loose fallback over every text-bearing element when the
/// structural pass finds nothing. Extraction never fails; at worst it
/// returns an empty transcript.
#[derive(Debug, Clone, Default)]
pub struct TranscriptExtractor {
    config: ExtractorConfig,
}

impl TranscriptExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Extract the transcript from the container's current children
    pub fn extract(&self, document: &Document, container: NodeId) -> Vec<String> {
        let messages = self.extract_structural(document, container);
        if !messages.is_empty() {
            debug!("extracted {} transcript lines", messages.len());
            return messages;
        }

        debug!("structural pass found nothing, trying fallback");
        let messages = self.extract_fallback(document, container);
        debug!("fallback pass extracted {} transcript lines", messages.len());
        messages
    }

    fn extract_structural(&self, document: &Document, container: NodeId) -> Vec<String> {
        let mut messages = Vec::new();

        for child in document.children(container) {
            // Control rows (toggle buttons etc.) are not messages.
            if document.has_descendant_tag(child, "button") {
                continue;
            }
            if !document.is_element(child) {
                continue;
            }

            let sub_children: Vec<NodeId> = document
                .children(child)
                .into_iter()
                .filter(|&c| document.is_element(c))
                .collect();
            if sub_children.len() < 2 {
                continue;
            }

            let mut speaker_child = None;
            let mut content_child = None;
            for &sub in &sub_children {
                if document.has_descendant_tag(sub, "img") {
                    if speaker_child.is_none() {
                        speaker_child = Some(sub);
                    }
                } else if !document.text_content(sub).trim().is_empty()
                    && content_child.is_none()
                {
                    content_child = Some(sub);
                }
            }

            let (Some(speaker_child), Some(content_child)) = (speaker_child, content_child)
            else {
                continue;
            };

            let speaker = self
                .speaker_label(document, speaker_child)
                .unwrap_or_else(|| self.config.unknown_speaker.clone());

            let content = document.text_content(content_child).trim().to_string();
            if self.is_valid_utterance(&content, &speaker) {
                messages.push(format!("{}: {}", speaker, content));
            }
        }

        messages
    }

    /// Shortest plausible label under the speaker sub-child: a nested span's
    /// text wins, else a short URL-free leaf text
    fn speaker_label(&self, document: &Document, speaker_child: NodeId) -> Option<String> {
        for child in document.children(speaker_child) {
            if !document.is_element(child) {
                continue;
            }

            let label_element = if document.tag(child).as_deref() == Some("span") {
                Some(child)
            } else {
                document
                    .descendants(child)
                    .into_iter()
                    .find(|&d| document.tag(d).as_deref() == Some("span"))
            };
            if let Some(label_element) = label_element {
                let text = document.text_content(label_element).trim().to_string();
                if !text.is_empty() {
                    return Some(text);
                }
            }

            let has_element_children = document
                .children(child)
                .iter()
                .any(|&c| document.is_element(c));
            if !has_element_children {
                let text = document.text_content(child).trim().to_string();
                if !text.is_empty()
                    && text.len() < self.config.speaker_max_len
                    && !text.contains(&self.config.url_substring)
                {
                    return Some(text);
                }
            }
        }
        None
    }

    fn is_valid_utterance(&self, content: &str, speaker: &str) -> bool {
        !content.is_empty()
            && content != speaker
            && content.len() < self.config.content_max_len
            && !content.contains(&self.config.url_substring)
            && !content.contains(&self.config.attribute_substring)
            && content.split_whitespace().count() >= self.config.content_min_words
    }

    /// Loose pass: any nested element with short text counts; colon lines
    /// already look like "speaker: text" and are kept as-is
    fn extract_fallback(&self, document: &Document, container: NodeId) -> Vec<String> {
        let mut messages = Vec::new();

        for node in document.descendants(container) {
            if !document.is_element(node) {
                continue;
            }
            let text = document.text_content(node).trim().to_string();
            if text.is_empty() || text.len() >= self.config.fallback_max_len {
                continue;
            }
            if text.contains(':') {
                messages.push(text);
            } else if text.len() > self.config.fallback_min_len
                && !text.contains(&self.config.url_substring)
            {
                messages.push(format!("{}: {}", self.config.generic_speaker, text));
            }
        }

        messages
    }
}
