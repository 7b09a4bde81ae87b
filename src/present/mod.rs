//! Rendering of translation results into the host document

use crate::dom::{Document, NodeId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Marker attribute carried by every injected element
pub const MARKER_ATTR: &str = "data-id";
/// Marker value for inline (bilingual) translation elements
pub const TRANSLATION_MARKER: &str = "TRANSLATE";
/// Marker value for the single floating overlay
pub const FLOATING_MARKER: &str = "FLOATING_CAPTION";

/// How translations are shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Original and translation stacked under the caption line
    Bilingual,
    /// One page-level overlay holding only the latest translation
    Floating,
}

impl Default for DisplayMode {
    fn default() -> Self {
        DisplayMode::Bilingual
    }
}

/// Renders translation results into the document under one of the
/// interchangeable display modes
///
/// Every element the presenter injects carries the marker attribute, which is
/// the only thing [`clear_all`](Presenter::clear_all) needs to sweep stale
/// output on a mode switch or a disable, wherever in the document it lives.
#[derive(Clone)]
pub struct Presenter {
    document: Document,
}

impl Presenter {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Render a translation for `owner` under the given mode
    ///
    /// A dead owner is a silent no-op: the caption line was re-rendered or
    /// removed while the request was in flight, and the result is obsolete.
    pub fn render(
        &self,
        mode: DisplayMode,
        owner: NodeId,
        original_text: &str,
        translated_text: &str,
    ) {
        match mode {
            DisplayMode::Bilingual => self.render_bilingual(owner, original_text, translated_text),
            DisplayMode::Floating => self.render_floating(translated_text),
        }
    }

    fn render_bilingual(&self, owner: NodeId, original_text: &str, translated_text: &str) {
        if !self.document.exists(owner) {
            debug!("translation owner {} is gone, dropping render", owner);
            return;
        }

        // Replace any previous translation under this caption line.
        for child in self.document.children(owner) {
            if self.document.attr(child, MARKER_ATTR).as_deref() == Some(TRANSLATION_MARKER) {
                self.document.remove(child);
            }
        }

        let marker = self.document.create_element("div");
        self.document.set_attr(marker, MARKER_ATTR, TRANSLATION_MARKER);

        let original_line = self.document.create_element("div");
        let original = self.document.create_text(original_text);
        let translated_line = self.document.create_element("div");
        let translated = self.document.create_text(translated_text);

        let built = self
            .document
            .append_child(original_line, original)
            .and_then(|_| self.document.append_child(translated_line, translated))
            .and_then(|_| self.document.append_child(marker, original_line))
            .and_then(|_| self.document.append_child(marker, translated_line))
            .and_then(|_| self.document.append_child(owner, marker));

        if let Err(e) = built {
            // Owner vanished between the check and the append; same stale
            // result as above.
            debug!("failed to attach translation marker: {}", e);
            self.document.remove(marker);
        }
    }

    fn render_floating(&self, translated_text: &str) {
        let overlay = match self.document.find_by_attr(MARKER_ATTR, FLOATING_MARKER) {
            Some(existing) => existing,
            None => {
                debug!("creating floating caption overlay");
                let overlay = self.document.create_element("pre");
                self.document.set_attr(overlay, MARKER_ATTR, FLOATING_MARKER);
                let text = self.document.create_text("");
                let attached = self
                    .document
                    .append_child(overlay, text)
                    .and_then(|_| self.document.append_child(self.document.root(), overlay));
                if let Err(e) = attached {
                    debug!("failed to attach floating overlay: {}", e);
                    self.document.remove(overlay);
                    return;
                }
                overlay
            }
        };

        if let Some(text_node) = self.document.children(overlay).first().copied() {
            self.document.set_text(text_node, translated_text);
        }
    }

    /// Remove every rendered translation, inline markers and the floating
    /// overlay alike, anywhere in the document
    pub fn clear_all(&self) {
        for marker in self.document.find_all_by_attr(MARKER_ATTR, TRANSLATION_MARKER) {
            self.document.remove(marker);
        }
        for overlay in self.document.find_all_by_attr(MARKER_ATTR, FLOATING_MARKER) {
            self.document.remove(overlay);
        }
    }
}
