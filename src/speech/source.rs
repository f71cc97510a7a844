//! Transcript source trait and test double.

use crate::defaults;
use crate::error::{LivetransError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;

/// One event from a live recognition session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    /// Updated partial transcript for the in-progress utterance. Each event
    /// carries the full text recognized so far, not a delta.
    Partial(String),
    /// Fatal recognition failure; the session is dead after this.
    Error { message: String },
}

/// A live-updating stream of partial transcripts.
///
/// Implementations must tolerate being ended and immediately restarted;
/// the pipeline recycles the session after every finalized utterance to
/// keep listening.
#[async_trait]
pub trait TranscriptSource: Send {
    /// Opens a recognition session for `language` and returns its event
    /// stream. Fails with [`LivetransError::Authorization`] when recognition
    /// permission is denied or restricted.
    async fn start_session(&mut self, language: &str) -> Result<mpsc::Receiver<SourceEvent>>;

    /// Ends the current session. No-op if none is active.
    async fn end_session(&mut self);
}

/// Mock transcript source for tests.
///
/// Each `start_session` hands the paired [`SessionTaps`] a sender for that
/// session, so tests can inject partial transcripts and errors at will.
pub struct MockTranscriptSource {
    taps: mpsc::UnboundedSender<mpsc::Sender<SourceEvent>>,
    sessions_started: Arc<AtomicUsize>,
    deny_authorization: bool,
}

/// Test-side handle to the sessions a [`MockTranscriptSource`] opens.
pub struct SessionTaps {
    rx: mpsc::UnboundedReceiver<mpsc::Sender<SourceEvent>>,
    sessions_started: Arc<AtomicUsize>,
}

impl MockTranscriptSource {
    pub fn new() -> (Self, SessionTaps) {
        let (taps, rx) = mpsc::unbounded_channel();
        let sessions_started = Arc::new(AtomicUsize::new(0));
        (
            Self {
                taps,
                sessions_started: sessions_started.clone(),
                deny_authorization: false,
            },
            SessionTaps {
                rx,
                sessions_started,
            },
        )
    }

    /// Configure the mock to refuse every session with an authorization error.
    pub fn with_denied_authorization(mut self) -> Self {
        self.deny_authorization = true;
        self
    }
}

#[async_trait]
impl TranscriptSource for MockTranscriptSource {
    async fn start_session(&mut self, _language: &str) -> Result<mpsc::Receiver<SourceEvent>> {
        if self.deny_authorization {
            return Err(LivetransError::Authorization {
                message: "permission denied".to_string(),
            });
        }
        let (tx, rx) = mpsc::channel(defaults::SESSION_BUFFER);
        self.sessions_started.fetch_add(1, Ordering::SeqCst);
        // Test may have stopped listening for sessions; that's fine.
        let _ = self.taps.send(tx);
        Ok(rx)
    }

    async fn end_session(&mut self) {}
}

impl SessionTaps {
    /// Waits for the next session to be opened and returns its event sender.
    pub async fn next_session(&mut self) -> Option<mpsc::Sender<SourceEvent>> {
        self.rx.recv().await
    }

    /// Number of sessions opened so far.
    pub fn sessions_started(&self) -> usize {
        self.sessions_started.load(Ordering::SeqCst)
    }
}
