use crate::dom::NodeId;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, VecDeque};
use tracing::debug;
use uuid::Uuid;

/// Default bound on in-flight request entries
pub const DEFAULT_PENDING_CAP: usize = 256;

/// State remembered for one in-flight translation request
///
/// `owner` is a weak association back to the element that should receive the
/// translation; the node may be detached or gone by the time the reply lands,
/// so it must be re-validated against the document before use.
#[derive(Debug, Clone)]
pub struct PendingTranslation {
    pub owner: NodeId,
    pub original_text: String,
    pub issued_at: DateTime<Utc>,
}

/// Maps request ids to the UI location and original text awaiting each reply
///
/// Ids are v4 uuids, unique for the life of the session and never reused. An
/// entry lives until its reply is consumed or until it is evicted: the store
/// is capped, dropping the oldest entry once full, so a gateway call that
/// never resolves cannot grow the map without bound.
#[derive(Debug)]
pub struct CorrelationStore {
    entries: HashMap<Uuid, PendingTranslation>,
    order: VecDeque<Uuid>,
    cap: usize,
}

impl CorrelationStore {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            cap: cap.max(1),
        }
    }

    /// Record a dispatch, returning the fresh id to send with the request
    pub fn insert(&mut self, owner: NodeId, original_text: String) -> Uuid {
        while self.entries.len() >= self.cap {
            if let Some(oldest) = self.order.pop_front() {
                if self.entries.remove(&oldest).is_some() {
                    debug!("evicted stale pending translation {}", oldest);
                }
            } else {
                break;
            }
        }

        let id = Uuid::new_v4();
        self.entries.insert(
            id,
            PendingTranslation {
                owner,
                original_text,
                issued_at: Utc::now(),
            },
        );
        self.order.push_back(id);
        id
    }

    /// Consume the entry for a reply; `None` for unknown or already-consumed
    /// ids, which callers treat as a late result to drop, not an error
    pub fn take(&mut self, id: &Uuid) -> Option<PendingTranslation> {
        let entry = self.entries.remove(id);
        if entry.is_some() {
            self.order.retain(|queued| queued != id);
        }
        entry
    }

    /// Drop every pending entry (disable transition)
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CorrelationStore {
    fn default() -> Self {
        Self::new(DEFAULT_PENDING_CAP)
    }
}
