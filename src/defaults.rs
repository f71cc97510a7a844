//! Shared default values used across configuration and the pipeline.

/// Silence duration (ms) after the last partial-transcript change before the
/// pending utterance is finalized.
pub const SILENCE_DURATION_MS: u64 = 1200;

/// Default recognition language (BCP-47 tag handed to the transcript source).
pub const RECOGNITION_LANGUAGE: &str = "en-US";

/// Default translation direction.
pub const SOURCE_LANGUAGE: &str = "English";
pub const TARGET_LANGUAGE: &str = "Chinese";

/// Default chat-completions endpoint (local OpenAI-compatible server).
pub const TRANSLATION_BASE_URL: &str = "http://localhost:1234";

/// Fixed path appended to the base URL for translation requests.
pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Default model name sent in the chat-completions request.
pub const TRANSLATION_MODEL: &str = "gemma-2-27b-it";

/// Timeout for a single translation request.
pub const TRANSLATION_TIMEOUT_SECS: u64 = 30;

/// Buffer size for the serialized pipeline event channel.
pub const EVENT_BUFFER: usize = 64;

/// Buffer size for per-session partial-transcript channels.
pub const SESSION_BUFFER: usize = 32;
