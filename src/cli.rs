//! Command-line interface for the livetrans demo binary
//!
//! Provides argument parsing using clap derive macros.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Live speech translation demo: type partial transcripts on stdin, watch
/// them finalize and translate
#[derive(Parser, Debug)]
#[command(name = "livetrans", version, about = "Near-real-time speech translation")]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Chat-completions base URL (e.g. http://localhost:1234)
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Model name sent in the translation request
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Source language name (e.g. English)
    #[arg(long, value_name = "LANG")]
    pub from: Option<String>,

    /// Target language name (e.g. Chinese)
    #[arg(long, value_name = "LANG")]
    pub to: Option<String>,

    /// Silence before an utterance is finalized. Examples: 1200ms, 1.5s
    #[arg(long, value_name = "DURATION", value_parser = parse_silence)]
    pub silence: Option<Duration>,

    /// Speak each translation as soon as it resolves
    #[arg(long)]
    pub auto_speak: bool,

    /// Suppress status output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Parse a silence duration string.
///
/// Supports bare numbers (milliseconds) and any format accepted by
/// `humantime` (`1200ms`, `1.5s`, `2s`).
fn parse_silence(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    // Bare number → milliseconds
    if let Ok(ms) = s.parse::<u64>() {
        return Ok(Duration::from_millis(ms));
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}
