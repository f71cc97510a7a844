//! Ordered, append-only transcript model.
//!
//! All mutation goes through `append` / `update_translation` / `clear`,
//! and only ever from the serialized coordinator context. Observers (the
//! UI) get read-only snapshots through a watch channel.

use crate::transcript::entry::{ConversationEntry, EntryId};
use std::time::Instant;
use tokio::sync::watch;

/// Append-only log of conversation entries.
///
/// Entries are appended in strictly increasing creation order and are never
/// reordered. `clear` is the only removal operation.
pub struct TranscriptModel {
    entries: Vec<ConversationEntry>,
    next_id: u64,
    observers: watch::Sender<Vec<ConversationEntry>>,
}

impl TranscriptModel {
    pub fn new() -> Self {
        let (observers, _) = watch::channel(Vec::new());
        Self {
            entries: Vec::new(),
            next_id: 1,
            observers,
        }
    }

    /// Appends a new entry for a finalized utterance and returns its id.
    pub fn append(&mut self, source_text: String, created_at: Instant) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries
            .push(ConversationEntry::new(id, source_text, created_at));
        self.notify();
        id
    }

    /// Writes a translation into the entry identified by `id`.
    ///
    /// Lookup is by identity, never by position: results arriving out of
    /// request order still land on the entry that asked for them. A no-op
    /// returning false if the entry no longer exists (cleared meanwhile).
    pub fn update_translation(&mut self, id: EntryId, translated_text: String) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.translated_text = Some(translated_text);
                self.notify();
                true
            }
            None => false,
        }
    }

    /// Removes all entries. Ids are not reused afterwards.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.notify();
    }

    /// Read-only view of the ordered entries.
    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    /// Looks up a single entry by id.
    pub fn get(&self, id: EntryId) -> Option<&ConversationEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Subscribes an observer to transcript snapshots.
    pub fn subscribe(&self) -> watch::Receiver<Vec<ConversationEntry>> {
        self.observers.subscribe()
    }

    fn notify(&self) {
        // Dropped receivers are fine; send_replace never fails.
        self.observers.send_replace(self.entries.clone());
    }
}

impl Default for TranscriptModel {
    fn default() -> Self {
        Self::new()
    }
}
