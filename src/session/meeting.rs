use crate::store::MeetingRecord;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use uuid::Uuid;

/// The meeting currently being recorded
///
/// Created on the first caption seen while enabled; at most one exists at a
/// time. Keeps two transcript views: a rolling list of timestamped raw
/// caption lines (bounded) and the latest heuristic extraction, whichever is
/// richer winning at finalize time.
#[derive(Debug)]
pub struct MeetingSession {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub participant_count: usize,
    rolling: VecDeque<String>,
    rolling_limit: usize,
    extraction: Vec<String>,
}

impl MeetingSession {
    pub fn new(rolling_limit: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            participant_count: 0,
            rolling: VecDeque::new(),
            rolling_limit: rolling_limit.max(1),
            extraction: Vec::new(),
        }
    }

    /// Append a timestamped raw caption line, dropping the oldest past the
    /// bound
    pub fn push_line(&mut self, text: &str) {
        let stamped = format!("[{}] {}", Utc::now().format("%H:%M:%S"), text);
        self.rolling.push_back(stamped);
        while self.rolling.len() > self.rolling_limit {
            self.rolling.pop_front();
        }
    }

    /// Replace the heuristic extraction with the latest scan
    pub fn set_extraction(&mut self, lines: Vec<String>) {
        if !lines.is_empty() {
            self.extraction = lines;
        }
    }

    pub fn set_participants(&mut self, count: usize) {
        self.participant_count = count;
    }

    pub fn rolling_len(&self) -> usize {
        self.rolling.len()
    }

    pub fn rolling_lines(&self) -> Vec<String> {
        self.rolling.iter().cloned().collect()
    }

    /// Close the meeting into its persisted record
    pub fn finish(self, ended_at: DateTime<Utc>) -> MeetingRecord {
        let duration_minutes =
            ((ended_at - self.started_at).num_seconds() as f64 / 60.0).round() as i64;
        let transcript = if self.extraction.is_empty() {
            self.rolling.into_iter().collect()
        } else {
            self.extraction
        };
        MeetingRecord {
            id: self.id,
            title: format!("Meeting record - {}", ended_at.format("%Y-%m-%d %H:%M:%S")),
            date: self.started_at,
            duration_minutes,
            participants: self.participant_count,
            transcript,
        }
    }
}
