//! livetrans - Near-real-time spoken-language translation pipeline
//!
//! Continuous speech is segmented into utterances at natural pauses, each
//! utterance is translated through an OpenAI-compatible chat-completions
//! endpoint, and the translation can be read back aloud. Audio capture,
//! the recognition model, and the synthesis engine are external
//! collaborators behind narrow trait seams.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod pipeline;
pub mod speech;
pub mod synth;
pub mod transcript;
pub mod translate;

// Core traits (source → coordinate → sink)
pub use speech::source::{SourceEvent, TranscriptSource};
pub use synth::synthesizer::{SynthEvent, Synthesizer};
pub use translate::translator::Translator;

// Pipeline
pub use pipeline::coordinator::{Pipeline, PipelineConfig, PipelineHandle};
pub use pipeline::event::Command;

// Transcript
pub use transcript::{ConversationEntry, Direction, EntryId, TranscriptModel};

// Error handling
pub use error::{LivetransError, Result};

// Config
pub use config::Config;
