//! Conversation transcript: ordered, append-only log of utterances and
//! their translations. The single source of truth observed by the UI.

pub mod entry;
pub mod model;

pub use entry::{ConversationEntry, Direction, EntryId};
pub use model::TranscriptModel;
