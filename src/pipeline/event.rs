//! Commands accepted by the pipeline.

use crate::transcript::entry::EntryId;

/// User-facing commands, funneled into the serialized event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Open a recognition session and begin segmenting speech.
    StartRecording,
    /// End the session and cancel the armed countdown. In-flight
    /// translations still resolve and update their entries.
    StopRecording,
    /// Speak the translation of the given entry.
    PlayTranslation(EntryId),
    PausePlayback,
    ResumePlayback,
    /// Clear the transcript, reset segmentation, stop playback.
    Clear,
    /// Stop the event loop entirely.
    Shutdown,
}
