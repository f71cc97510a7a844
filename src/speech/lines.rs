//! Line-based transcript source for the demo binary.
//!
//! Stands in for a real recognition engine: every line typed on stdin is
//! treated as the full partial transcript recognized so far, and silence
//! (no further lines) lets the segmenter finalize it.

use crate::defaults;
use crate::error::Result;
use crate::speech::source::{SourceEvent, TranscriptSource};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

/// Transcript source that reads partial transcripts from stdin lines.
pub struct LineTranscriptSource {
    lines: Arc<Mutex<mpsc::UnboundedReceiver<String>>>,
    forwarder: Option<JoinHandle<()>>,
}

impl LineTranscriptSource {
    /// Creates a source backed by stdin. The reader task lives for the
    /// whole process; sessions only control whether lines are forwarded.
    pub fn stdin() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
        Self {
            lines: Arc::new(Mutex::new(rx)),
            forwarder: None,
        }
    }

    /// Creates a source fed by an in-process channel (used in tests).
    pub fn from_channel(rx: mpsc::UnboundedReceiver<String>) -> Self {
        Self {
            lines: Arc::new(Mutex::new(rx)),
            forwarder: None,
        }
    }
}

#[async_trait]
impl TranscriptSource for LineTranscriptSource {
    async fn start_session(&mut self, _language: &str) -> Result<mpsc::Receiver<SourceEvent>> {
        // A previous session may still hold the line receiver; stop it first.
        self.end_session().await;

        let (tx, rx) = mpsc::channel(defaults::SESSION_BUFFER);
        let lines = self.lines.clone();
        self.forwarder = Some(tokio::spawn(async move {
            let mut lines = lines.lock().await;
            while let Some(line) = lines.recv().await {
                if tx.send(SourceEvent::Partial(line)).await.is_err() {
                    break;
                }
            }
        }));
        Ok(rx)
    }

    async fn end_session(&mut self) {
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
            // Wait for the task to release the line receiver lock.
            let _ = forwarder.await;
        }
    }
}
