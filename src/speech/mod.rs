//! Speech recognition seam.
//!
//! The pipeline never talks to a recognition engine directly; it consumes a
//! [`TranscriptSource`] that emits live partial-transcript updates for the
//! current session. Sessions have a bounded lifetime and are recycled
//! (end + restart) after every finalized utterance.

pub mod lines;
pub mod source;

pub use lines::LineTranscriptSource;
pub use source::{MockTranscriptSource, SessionTaps, SourceEvent, TranscriptSource};
