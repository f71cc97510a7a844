//! Synthesizer trait and test doubles.

use crate::error::Result;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Identifies one `speak` invocation.
///
/// Asynchronous engine callbacks echo the token they belong to, so a
/// completion for a since-cancelled utterance can be recognized as stale
/// and dropped instead of resurrecting old state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtteranceToken(pub(crate) u64);

/// Asynchronous callback from the synthesis engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthEvent {
    Started(UtteranceToken),
    Finished(UtteranceToken),
    Paused(UtteranceToken),
    Cancelled(UtteranceToken),
}

impl SynthEvent {
    pub fn token(&self) -> UtteranceToken {
        match *self {
            SynthEvent::Started(t)
            | SynthEvent::Finished(t)
            | SynthEvent::Paused(t)
            | SynthEvent::Cancelled(t) => t,
        }
    }
}

/// Trait for a speech synthesis engine.
///
/// Calls are issued from the serialized coordination context only; engine
/// callbacks arrive through the event channel the implementation was
/// constructed with and are funneled back into that same context.
pub trait Synthesizer: Send {
    /// Begins producing audio for `text` with the given voice.
    fn speak(&mut self, token: UtteranceToken, text: &str, voice: &str) -> Result<()>;

    /// Asks the engine to pause. Returns false when the utterance already
    /// finished and the pause could not be honored.
    fn pause(&mut self) -> bool;

    fn resume(&mut self);

    fn cancel(&mut self);

    /// Resolves a concrete voice: the preferred one when available,
    /// otherwise the engine default for `language`. None means no voice at
    /// all is available and playback should no-op.
    fn resolve_voice(&self, preferred: Option<&str>, language: &str) -> Option<String>;
}

/// Synthesizer that produces no audio and completes instantly.
///
/// Used by the demo binary, where there is no audio output path.
pub struct NullSynthesizer {
    events: mpsc::UnboundedSender<SynthEvent>,
}

impl NullSynthesizer {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SynthEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (Self { events }, rx)
    }
}

impl Synthesizer for NullSynthesizer {
    fn speak(&mut self, token: UtteranceToken, _text: &str, _voice: &str) -> Result<()> {
        let _ = self.events.send(SynthEvent::Started(token));
        let _ = self.events.send(SynthEvent::Finished(token));
        Ok(())
    }

    fn pause(&mut self) -> bool {
        false
    }

    fn resume(&mut self) {}

    fn cancel(&mut self) {}

    fn resolve_voice(&self, preferred: Option<&str>, _language: &str) -> Option<String> {
        Some(preferred.unwrap_or("null").to_string())
    }
}

/// Call recorded by [`MockSynthesizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthCall {
    Speak { text: String, voice: String },
    Pause,
    Resume,
    Cancel,
}

/// Mock synthesis engine for tests.
///
/// Records every call and emits `Started` on `speak`. Completion and
/// cancellation events are driven explicitly through the handle, so tests
/// control exactly when the "engine" reports back.
pub struct MockSynthesizer {
    events: mpsc::UnboundedSender<SynthEvent>,
    calls: Arc<Mutex<Vec<SynthCall>>>,
    active: Arc<Mutex<Option<UtteranceToken>>>,
    voices: Vec<String>,
    default_voice: Option<String>,
    pause_honored: bool,
}

/// Test-side handle observing and driving a [`MockSynthesizer`].
#[derive(Clone)]
pub struct MockSynthHandle {
    events: mpsc::UnboundedSender<SynthEvent>,
    calls: Arc<Mutex<Vec<SynthCall>>>,
    active: Arc<Mutex<Option<UtteranceToken>>>,
}

impl MockSynthesizer {
    pub fn new() -> (Self, MockSynthHandle, mpsc::UnboundedReceiver<SynthEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let active = Arc::new(Mutex::new(None));
        let handle = MockSynthHandle {
            events: events.clone(),
            calls: calls.clone(),
            active: active.clone(),
        };
        (
            Self {
                events,
                calls,
                active,
                voices: vec!["mock-voice".to_string()],
                default_voice: Some("mock-voice".to_string()),
                pause_honored: true,
            },
            handle,
            rx,
        )
    }

    /// Restricts the set of installed voices (empty = no voice available).
    pub fn with_voices(mut self, voices: &[&str]) -> Self {
        self.voices = voices.iter().map(|v| v.to_string()).collect();
        self.default_voice = self.voices.first().cloned();
        self
    }

    /// Makes `pause` report that the utterance already finished.
    pub fn with_pause_refused(mut self) -> Self {
        self.pause_honored = false;
        self
    }

    fn record(&self, call: SynthCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl Synthesizer for MockSynthesizer {
    fn speak(&mut self, token: UtteranceToken, text: &str, voice: &str) -> Result<()> {
        self.record(SynthCall::Speak {
            text: text.to_string(),
            voice: voice.to_string(),
        });
        if let Ok(mut active) = self.active.lock() {
            *active = Some(token);
        }
        let _ = self.events.send(SynthEvent::Started(token));
        Ok(())
    }

    fn pause(&mut self) -> bool {
        self.record(SynthCall::Pause);
        if self.pause_honored {
            if let Ok(active) = self.active.lock()
                && let Some(token) = *active
            {
                let _ = self.events.send(SynthEvent::Paused(token));
            }
            true
        } else {
            false
        }
    }

    fn resume(&mut self) {
        self.record(SynthCall::Resume);
    }

    fn cancel(&mut self) {
        self.record(SynthCall::Cancel);
        if let Ok(mut active) = self.active.lock()
            && let Some(token) = active.take()
        {
            let _ = self.events.send(SynthEvent::Cancelled(token));
        }
    }

    fn resolve_voice(&self, preferred: Option<&str>, _language: &str) -> Option<String> {
        if let Some(voice) = preferred
            && self.voices.iter().any(|v| v == voice)
        {
            return Some(voice.to_string());
        }
        self.default_voice.clone()
    }
}

impl MockSynthHandle {
    /// All calls issued against the engine so far.
    pub fn calls(&self) -> Vec<SynthCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Texts passed to `speak`, in order.
    pub fn spoken_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SynthCall::Speak { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Reports natural completion of the active utterance.
    pub fn finish_active(&self) {
        if let Ok(mut active) = self.active.lock()
            && let Some(token) = active.take()
        {
            let _ = self.events.send(SynthEvent::Finished(token));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_calls_and_emits_started() {
        let (mut synth, handle, mut events) = MockSynthesizer::new();

        synth
            .speak(UtteranceToken(1), "你好", "mock-voice")
            .unwrap();
        assert_eq!(
            handle.calls(),
            vec![SynthCall::Speak {
                text: "你好".to_string(),
                voice: "mock-voice".to_string()
            }]
        );
        assert_eq!(
            events.try_recv().unwrap(),
            SynthEvent::Started(UtteranceToken(1))
        );
    }

    #[test]
    fn test_finish_active_emits_finished() {
        let (mut synth, handle, mut events) = MockSynthesizer::new();
        synth.speak(UtteranceToken(3), "text", "mock-voice").unwrap();
        let _ = events.try_recv();

        handle.finish_active();
        assert_eq!(
            events.try_recv().unwrap(),
            SynthEvent::Finished(UtteranceToken(3))
        );

        // Finishing twice is a no-op.
        handle.finish_active();
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_voice_resolution_falls_back_to_default() {
        let (synth, _handle, _events) = MockSynthesizer::new();
        let synth = synth.with_voices(&["zh-basic", "en-basic"]);

        assert_eq!(
            synth.resolve_voice(Some("zh-basic"), "Chinese").as_deref(),
            Some("zh-basic")
        );
        assert_eq!(
            synth.resolve_voice(Some("zh-premium"), "Chinese").as_deref(),
            Some("zh-basic")
        );
        assert_eq!(synth.resolve_voice(None, "Chinese").as_deref(), Some("zh-basic"));
    }

    #[test]
    fn test_no_voices_resolves_none() {
        let (synth, _handle, _events) = MockSynthesizer::new();
        let synth = synth.with_voices(&[]);
        assert!(synth.resolve_voice(Some("any"), "Chinese").is_none());
    }

    #[test]
    fn test_pause_refused() {
        let (synth, _handle, _events) = MockSynthesizer::new();
        let mut synth = synth.with_pause_refused();
        assert!(!synth.pause());
    }

    #[test]
    fn test_null_synthesizer_completes_instantly() {
        let (mut synth, mut events) = NullSynthesizer::new();
        synth.speak(UtteranceToken(1), "text", "null").unwrap();
        assert_eq!(
            events.try_recv().unwrap(),
            SynthEvent::Started(UtteranceToken(1))
        );
        assert_eq!(
            events.try_recv().unwrap(),
            SynthEvent::Finished(UtteranceToken(1))
        );
    }
}
