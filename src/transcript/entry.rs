//! Conversation entry types.

use std::fmt;
use std::time::Instant;

/// Opaque unique identifier for a conversation entry.
///
/// Assigned once at creation and never reused, so asynchronous results can
/// be correlated back to the exact entry that requested them even after the
/// list has grown or been edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub(crate) u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Who produced the utterance.
///
/// Single-party in the current scope, kept as an enum for future
/// bidirectional conversations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    FromUser,
}

/// One finalized utterance and its (eventual) translation.
#[derive(Debug, Clone)]
pub struct ConversationEntry {
    /// Unique identity, immutable.
    pub id: EntryId,
    /// Finalized utterance text, immutable after creation.
    pub source_text: String,
    /// Absent until a translation result arrives.
    pub translated_text: Option<String>,
    /// Creation time, immutable.
    pub created_at: Instant,
    pub direction: Direction,
}

impl ConversationEntry {
    pub(crate) fn new(id: EntryId, source_text: String, created_at: Instant) -> Self {
        Self {
            id,
            source_text,
            translated_text: None,
            created_at,
            direction: Direction::FromUser,
        }
    }

    /// Returns true once a translation has been applied.
    pub fn is_translated(&self) -> bool {
        self.translated_text.is_some()
    }
}
