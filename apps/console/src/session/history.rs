//! Session history: every successfully answered question, newest first.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::AskResult;

/// Entries shown in the recent-questions list.
pub const RECENT_WINDOW: usize = 5;

/// One answered question. Immutable once appended.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub question: String,
    pub timestamp: DateTime<Utc>,
    pub result: Option<AskResult>,
}

impl HistoryEntry {
    pub fn new(question: impl Into<String>, result: AskResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            question: question.into(),
            timestamp: Utc::now(),
            result: Some(result),
        }
    }
}

/// Append-only log of answered questions for the current session.
///
/// `add` prepends unconditionally (no dedup by question text). The store
/// keeps everything for the process lifetime; only the display is windowed.
#[derive(Debug, Default)]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
    }

    /// The first [`RECENT_WINDOW`] entries, newest first.
    pub fn recent(&self) -> &[HistoryEntry] {
        &self.entries[..self.entries.len().min(RECENT_WINDOW)]
    }

    pub fn all(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
