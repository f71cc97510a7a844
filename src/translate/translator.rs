//! Translator trait and test doubles.

use crate::error::{LivetransError, Result};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

/// Trait for text translation.
///
/// This trait allows swapping implementations (real HTTP client vs mock).
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source_language` to `target_language`.
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String>;
}

enum MockMode {
    /// Respond immediately with "<text> [suffix]".
    Echo { suffix: String },
    /// Park every request until the test resolves it explicitly.
    Manual {
        pending: mpsc::UnboundedSender<PendingTranslation>,
    },
}

/// Mock translator for tests.
pub struct MockTranslator {
    mode: MockMode,
}

/// A translation request waiting for the test to resolve it.
pub struct PendingTranslation {
    pub text: String,
    respond: oneshot::Sender<Result<String>>,
}

impl PendingTranslation {
    /// Completes the request with the given result, in whatever order the
    /// test chooses.
    pub fn resolve(self, result: Result<String>) {
        let _ = self.respond.send(result);
    }
}

/// Test-side queue of parked translation requests.
pub struct PendingTranslations {
    rx: mpsc::UnboundedReceiver<PendingTranslation>,
}

impl PendingTranslations {
    /// Waits for the next request issued through the mock.
    pub async fn next(&mut self) -> Option<PendingTranslation> {
        self.rx.recv().await
    }
}

impl MockTranslator {
    /// Immediate mock: every call resolves to "<text> [suffix]".
    pub fn echo(suffix: &str) -> Self {
        Self {
            mode: MockMode::Echo {
                suffix: suffix.to_string(),
            },
        }
    }

    /// Manual mock: requests park until resolved through the returned queue,
    /// letting tests control completion order.
    pub fn manual() -> (Self, PendingTranslations) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                mode: MockMode::Manual { pending: tx },
            },
            PendingTranslations { rx },
        )
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        _source_language: &str,
        _target_language: &str,
    ) -> Result<String> {
        match &self.mode {
            MockMode::Echo { suffix } => Ok(format!("{text} [{suffix}]")),
            MockMode::Manual { pending } => {
                let (respond, result) = oneshot::channel();
                pending
                    .send(PendingTranslation {
                        text: text.to_string(),
                        respond,
                    })
                    .map_err(|_| LivetransError::Translation {
                        message: "mock translator dropped".to_string(),
                    })?;
                result.await.map_err(|_| LivetransError::Translation {
                    message: "mock translation never resolved".to_string(),
                })?
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_mock() {
        let translator = MockTranslator::echo("zh");
        let result = translator.translate("hello", "English", "Chinese").await;
        assert_eq!(result.unwrap(), "hello [zh]");
    }

    #[tokio::test]
    async fn test_manual_mock_resolves_out_of_order() {
        let (translator, mut pending) = MockTranslator::manual();
        let translator = std::sync::Arc::new(translator);

        let t1 = {
            let translator = translator.clone();
            tokio::spawn(async move { translator.translate("first", "English", "Chinese").await })
        };
        let t2 = {
            let translator = translator.clone();
            tokio::spawn(async move { translator.translate("second", "English", "Chinese").await })
        };

        let req_a = pending.next().await.unwrap();
        let req_b = pending.next().await.unwrap();

        // Resolve in reverse arrival order.
        let b_done = format!("{}-done", req_b.text);
        req_b.resolve(Ok(b_done));
        let a_done = format!("{}-done", req_a.text);
        req_a.resolve(Ok(a_done));

        let r1 = t1.await.unwrap().unwrap();
        let r2 = t2.await.unwrap().unwrap();
        assert_eq!(r1, "first-done");
        assert_eq!(r2, "second-done");
    }

    #[tokio::test]
    async fn test_manual_mock_can_fail() {
        let (translator, mut pending) = MockTranslator::manual();

        let task = tokio::spawn(async move {
            translator.translate("boom", "English", "Chinese").await
        });

        let req = pending.next().await.unwrap();
        req.resolve(Err(LivetransError::Translation {
            message: "server down".to_string(),
        }));

        let result = task.await.unwrap();
        assert!(matches!(result, Err(LivetransError::Translation { .. })));
    }
}
