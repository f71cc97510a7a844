//! HTTP translation client for OpenAI-compatible chat-completions servers.

use crate::defaults;
use crate::error::{LivetransError, Result};
use crate::translate::translator::Translator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

const SYSTEM_PROMPT: &str = "You are a helpful assistant that translates text.";

/// Translator backed by a chat-completions endpoint.
pub struct HttpTranslator {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
}

impl HttpTranslator {
    /// Creates a client for `base_url` (path is appended automatically).
    ///
    /// `api_key` may be empty for local servers; the bearer header is sent
    /// either way.
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(defaults::TRANSLATION_TIMEOUT_SECS))
            .build()
            .map_err(|e| LivetransError::Translation {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            url: format!(
                "{}{}",
                base_url.trim_end_matches('/'),
                defaults::COMPLETIONS_PATH
            ),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    fn build_request(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> ChatCompletionRequest {
        let prompt =
            format!("Translate the following text from {source_language} to {target_language}: {text}");
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        }
    }

    /// Extracts the translated text from a response body.
    ///
    /// Any shape mismatch is a translation failure.
    fn parse_response(body: &str) -> Result<String> {
        let response: ChatCompletionResponse =
            serde_json::from_str(body).map_err(|e| LivetransError::Translation {
                message: format!("failed to parse response: {e}"),
            })?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LivetransError::Translation {
                message: "response contained no choices".to_string(),
            })?;
        Ok(choice.message.content.trim().to_string())
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String> {
        // Nothing to translate, nothing to send.
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let request = self.build_request(text, source_language, target_language);
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LivetransError::Translation {
                message: format!("network error: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LivetransError::Translation {
                message: format!("server returned {status}"),
            });
        }

        let body = response.text().await.map_err(|e| LivetransError::Translation {
            message: format!("failed to read response body: {e}"),
        })?;
        Self::parse_response(&body)
    }
}
