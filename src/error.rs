//! Error types for livetrans.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LivetransError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Recognition errors
    #[error("Speech recognition not authorized: {message}")]
    Authorization { message: String },

    #[error("Recognition session failed: {message}")]
    Session { message: String },

    // Translation errors
    #[error("Translation failed: {message}")]
    Translation { message: String },

    // Synthesis errors
    #[error("Synthesis voice not available: {voice}")]
    SynthesisUnavailable { voice: String },

    #[error("Speech synthesis failed: {message}")]
    Synthesis { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, LivetransError>;

impl LivetransError {
    /// Returns true for errors that prevent a recognition session from
    /// starting at all (surfaced to the user, recording cannot begin).
    pub fn is_authorization(&self) -> bool {
        matches!(self, LivetransError::Authorization { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_authorization_display() {
        let error = LivetransError::Authorization {
            message: "permission denied".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Speech recognition not authorized: permission denied"
        );
        assert!(error.is_authorization());
    }

    #[test]
    fn test_session_display() {
        let error = LivetransError::Session {
            message: "engine stopped".to_string(),
        };
        assert_eq!(error.to_string(), "Recognition session failed: engine stopped");
        assert!(!error.is_authorization());
    }

    #[test]
    fn test_translation_display() {
        let error = LivetransError::Translation {
            message: "connection refused".to_string(),
        };
        assert_eq!(error.to_string(), "Translation failed: connection refused");
    }

    #[test]
    fn test_synthesis_unavailable_display() {
        let error = LivetransError::SynthesisUnavailable {
            voice: "zh-CN-premium".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Synthesis voice not available: zh-CN-premium"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: LivetransError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: LivetransError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<LivetransError>();
        assert_sync::<LivetransError>();
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }
}
