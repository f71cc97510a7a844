use crate::defaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
#[cfg(feature = "cli")]
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub recognition: RecognitionConfig,
    pub translation: TranslationConfig,
    pub synthesis: SynthesisConfig,
}

/// Speech recognition configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecognitionConfig {
    /// BCP-47 language tag handed to the transcript source.
    pub language: String,
    /// Silence (ms) after the last transcript change before an utterance
    /// is finalized.
    pub silence_duration_ms: u64,
}

/// Translation endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranslationConfig {
    /// Base URL of an OpenAI-compatible chat-completions server.
    pub base_url: String,
    /// Bearer token. May be empty for local servers.
    pub api_key: String,
    /// Model name sent in the request body.
    pub model: String,
    pub source_language: String,
    pub target_language: String,
    /// Speak each translation aloud as soon as it resolves.
    pub auto_speak: bool,
}

/// Speech synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Preferred voice. Falls back to the default voice for the target
    /// language when missing.
    pub voice: Option<String>,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            language: defaults::RECOGNITION_LANGUAGE.to_string(),
            silence_duration_ms: defaults::SILENCE_DURATION_MS,
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::TRANSLATION_BASE_URL.to_string(),
            api_key: String::new(),
            model: defaults::TRANSLATION_MODEL.to_string(),
            source_language: defaults::SOURCE_LANGUAGE.to_string(),
            target_language: defaults::TARGET_LANGUAGE.to_string(),
            auto_speak: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if the file doesn't
    /// exist. Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Ok(Self::default())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - LIVETRANS_ENDPOINT → translation.base_url
    /// - LIVETRANS_API_KEY → translation.api_key
    /// - LIVETRANS_MODEL → translation.model
    /// - LIVETRANS_LANGUAGE → recognition.language
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = std::env::var("LIVETRANS_ENDPOINT")
            && !endpoint.is_empty()
        {
            self.translation.base_url = endpoint;
        }

        if let Ok(key) = std::env::var("LIVETRANS_API_KEY")
            && !key.is_empty()
        {
            self.translation.api_key = key;
        }

        if let Ok(model) = std::env::var("LIVETRANS_MODEL")
            && !model.is_empty()
        {
            self.translation.model = model;
        }

        if let Ok(language) = std::env::var("LIVETRANS_LANGUAGE")
            && !language.is_empty()
        {
            self.recognition.language = language;
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/livetrans/config.toml on Linux
    #[cfg(feature = "cli")]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("livetrans").join("config.toml"))
    }
}
