//! Serialized pipeline coordinator.
//!
//! One task owns every piece of mutable pipeline state (segmenter,
//! transcript model, translation bookkeeping, playback) and consumes all
//! event sources (recognition stream, silence countdowns, translation
//! results, synthesis callbacks, user commands) through channels. The
//! sources themselves never mutate anything in place.

use crate::config::Config;
use crate::defaults;
use crate::error::LivetransError;
use crate::pipeline::event::Command;
use crate::pipeline::segmenter::{SegmentAction, UtteranceSegmenter};
use crate::speech::source::{SourceEvent, TranscriptSource};
use crate::synth::playback::PlaybackCoordinator;
use crate::synth::synthesizer::{SynthEvent, Synthesizer};
use crate::transcript::entry::ConversationEntry;
use crate::transcript::model::TranscriptModel;
use crate::translate::coordinator::{TranslationCoordinator, TranslationOutcome};
use crate::translate::translator::Translator;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Configuration for the pipeline coordinator.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Language tag handed to the transcript source.
    pub recognition_language: String,
    /// Silence needed after the last transcript change before finalizing.
    pub silence_duration: Duration,
    pub source_language: String,
    pub target_language: String,
    /// Speak translations as soon as they resolve.
    pub auto_speak: bool,
    /// Preferred synthesis voice.
    pub preferred_voice: Option<String>,
    /// Buffer size for the command and result channels.
    pub event_buffer: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            recognition_language: defaults::RECOGNITION_LANGUAGE.to_string(),
            silence_duration: Duration::from_millis(defaults::SILENCE_DURATION_MS),
            source_language: defaults::SOURCE_LANGUAGE.to_string(),
            target_language: defaults::TARGET_LANGUAGE.to_string(),
            auto_speak: false,
            preferred_voice: None,
            event_buffer: defaults::EVENT_BUFFER,
        }
    }
}

impl PipelineConfig {
    /// Creates pipeline configuration from app config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            recognition_language: config.recognition.language.clone(),
            silence_duration: Duration::from_millis(config.recognition.silence_duration_ms),
            source_language: config.translation.source_language.clone(),
            target_language: config.translation.target_language.clone(),
            auto_speak: config.translation.auto_speak,
            preferred_voice: config.synthesis.voice.clone(),
            event_buffer: defaults::EVENT_BUFFER,
        }
    }
}

/// Handle to a running pipeline.
///
/// Commands are fire-and-forget into the serialized loop; observable state
/// comes back through watch channels.
pub struct PipelineHandle {
    commands: mpsc::Sender<Command>,
    transcript: watch::Receiver<Vec<ConversationEntry>>,
    recording: watch::Receiver<bool>,
    status: watch::Receiver<Option<String>>,
    task: JoinHandle<()>,
}

impl PipelineHandle {
    pub async fn start_recording(&self) {
        self.send(Command::StartRecording).await;
    }

    pub async fn stop_recording(&self) {
        self.send(Command::StopRecording).await;
    }

    pub async fn play_translation(&self, entry: crate::transcript::EntryId) {
        self.send(Command::PlayTranslation(entry)).await;
    }

    pub async fn pause_playback(&self) {
        self.send(Command::PausePlayback).await;
    }

    pub async fn resume_playback(&self) {
        self.send(Command::ResumePlayback).await;
    }

    /// Clears the transcript, resets segmentation, stops playback.
    pub async fn clear(&self) {
        self.send(Command::Clear).await;
    }

    /// Ordered view of the conversation.
    pub fn transcript(&self) -> watch::Receiver<Vec<ConversationEntry>> {
        self.transcript.clone()
    }

    /// Recording/idle indicator.
    pub fn recording(&self) -> watch::Receiver<bool> {
        self.recording.clone()
    }

    /// Most recent error/status message, if any.
    pub fn status(&self) -> watch::Receiver<Option<String>> {
        self.status.clone()
    }

    /// Stops the loop and waits for it to finish.
    pub async fn shutdown(self) {
        self.send(Command::Shutdown).await;
        let _ = self.task.await;
    }

    async fn send(&self, command: Command) {
        // A closed channel means the loop already shut down; commands are
        // then meaningless.
        let _ = self.commands.send(command).await;
    }
}

/// Entry point for running the pipeline.
pub struct Pipeline;

impl Pipeline {
    /// Starts the coordinator loop.
    ///
    /// The synthesizer is injected together with the receiving end of its
    /// callback channel; the loop funnels those callbacks into itself so
    /// playback state only ever changes in the serialized context.
    pub fn start<S>(
        config: PipelineConfig,
        source: S,
        translator: Arc<dyn Translator>,
        synthesizer: Box<dyn Synthesizer>,
        synth_events: mpsc::UnboundedReceiver<SynthEvent>,
    ) -> PipelineHandle
    where
        S: TranscriptSource + 'static,
    {
        let (commands_tx, commands_rx) = mpsc::channel(config.event_buffer);
        let (silence_tx, silence_rx) = mpsc::channel(config.event_buffer);
        let (outcomes_tx, outcomes_rx) = mpsc::channel(config.event_buffer);

        let (recording_tx, recording_rx) = watch::channel(false);
        let (status_tx, status_rx) = watch::channel(None);

        let model = TranscriptModel::new();
        let transcript_rx = model.subscribe();

        let translations = TranslationCoordinator::new(
            translator,
            outcomes_tx,
            config.source_language.clone(),
            config.target_language.clone(),
        );
        let playback = PlaybackCoordinator::new(
            synthesizer,
            config.preferred_voice.clone(),
            config.target_language.clone(),
        );
        let segmenter = UtteranceSegmenter::new(config.silence_duration);

        let runner = Runner {
            config,
            source,
            segmenter,
            model,
            translations,
            playback,
            session_rx: None,
            silence_tx,
            recording_tx,
            status_tx,
        };

        let task = tokio::spawn(runner.run(commands_rx, silence_rx, outcomes_rx, synth_events));

        PipelineHandle {
            commands: commands_tx,
            transcript: transcript_rx,
            recording: recording_rx,
            status: status_rx,
            task,
        }
    }
}

struct Runner<S: TranscriptSource> {
    config: PipelineConfig,
    source: S,
    segmenter: UtteranceSegmenter,
    model: TranscriptModel,
    translations: TranslationCoordinator,
    playback: PlaybackCoordinator,
    session_rx: Option<mpsc::Receiver<SourceEvent>>,
    silence_tx: mpsc::Sender<u64>,
    recording_tx: watch::Sender<bool>,
    status_tx: watch::Sender<Option<String>>,
}

/// Receives from the current session, or parks forever when none is open.
async fn next_source_event(rx: &mut Option<mpsc::Receiver<SourceEvent>>) -> Option<SourceEvent> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

impl<S: TranscriptSource> Runner<S> {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut silence: mpsc::Receiver<u64>,
        mut outcomes: mpsc::Receiver<TranslationOutcome>,
        mut synth_events: mpsc::UnboundedReceiver<SynthEvent>,
    ) {
        loop {
            tokio::select! {
                command = commands.recv() => {
                    match command {
                        Some(command) => {
                            if self.handle_command(command).await.is_break() {
                                break;
                            }
                        }
                        // All handles dropped.
                        None => break,
                    }
                }
                event = next_source_event(&mut self.session_rx) => {
                    self.handle_source_event(event).await;
                }
                Some(generation) = silence.recv() => {
                    if let Some(text) = self.segmenter.on_silence_elapsed(generation) {
                        self.finalize(text).await;
                    }
                }
                Some(outcome) = outcomes.recv() => {
                    self.handle_outcome(outcome);
                }
                Some(event) = synth_events.recv() => {
                    self.playback.on_event(event);
                }
            }
        }
        self.close_session().await;
    }

    async fn handle_command(&mut self, command: Command) -> ControlFlow<()> {
        match command {
            Command::StartRecording => {
                if self.session_rx.is_none() {
                    self.open_session().await;
                }
            }
            Command::StopRecording => {
                // Cancels the armed countdown; in-flight translations keep
                // resolving against their entries.
                self.segmenter.reset();
                self.close_session().await;
            }
            Command::PlayTranslation(entry) => {
                let text = self
                    .model
                    .get(entry)
                    .and_then(|e| e.translated_text.clone());
                if let Some(text) = text {
                    self.play(entry, &text);
                }
            }
            Command::PausePlayback => self.playback.pause(),
            Command::ResumePlayback => self.playback.resume(),
            Command::Clear => {
                self.model.clear();
                self.segmenter.reset();
                self.playback.stop();
            }
            Command::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    async fn handle_source_event(&mut self, event: Option<SourceEvent>) {
        match event {
            Some(SourceEvent::Partial(text)) => self.on_partial(&text),
            Some(SourceEvent::Error { message }) => {
                // The session is dead. Already-finalized entries stay; the
                // partial from the failed session is discarded, not
                // finalized.
                self.segmenter.reset();
                self.close_session().await;
                self.set_status(LivetransError::Session { message }.to_string());
            }
            None => {
                // Source closed its stream without an error event.
                self.segmenter.reset();
                self.close_session().await;
            }
        }
    }

    fn on_partial(&mut self, text: &str) {
        match self.segmenter.on_partial(text, Instant::now()) {
            SegmentAction::ArmTimer {
                generation,
                duration,
            } => {
                let silence_tx = self.silence_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(duration).await;
                    // Stale generations are filtered by the segmenter.
                    let _ = silence_tx.send(generation).await;
                });
            }
            SegmentAction::Ignore => {}
        }
    }

    /// Appends the finalized utterance, kicks off its translation, and
    /// recycles the recognition session so listening continues.
    async fn finalize(&mut self, text: String) {
        let text = text.trim().to_string();
        if text.is_empty() {
            return;
        }
        let entry = self.model.append(text.clone(), Instant::now());
        self.translations.request(entry, text);

        if self.session_rx.is_some() {
            self.source.end_session().await;
            self.session_rx = None;
            self.open_session().await;
        }
    }

    fn handle_outcome(&mut self, outcome: TranslationOutcome) {
        // Superseded or stale results must not touch any entry.
        if !self.translations.accept(outcome.entry_id, outcome.request_id) {
            return;
        }
        match outcome.result {
            Ok(text) => {
                // Entry may have been cleared meanwhile; then this is a no-op.
                if self.model.update_translation(outcome.entry_id, text.clone())
                    && self.config.auto_speak
                    && !text.is_empty()
                {
                    self.play(outcome.entry_id, &text);
                }
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    fn play(&mut self, entry: crate::transcript::EntryId, text: &str) {
        if let Err(e) = self.playback.play(entry, text) {
            self.set_status(e.to_string());
        }
    }

    async fn open_session(&mut self) {
        match self
            .source
            .start_session(&self.config.recognition_language)
            .await
        {
            Ok(rx) => {
                self.session_rx = Some(rx);
                self.recording_tx.send_replace(true);
                self.status_tx.send_replace(None);
            }
            Err(e) => {
                self.session_rx = None;
                self.recording_tx.send_replace(false);
                self.set_status(e.to_string());
            }
        }
    }

    async fn close_session(&mut self) {
        self.source.end_session().await;
        self.session_rx = None;
        self.recording_tx.send_replace(false);
    }

    fn set_status(&self, message: String) {
        self.status_tx.send_replace(Some(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::source::MockTranscriptSource;
    use crate::synth::synthesizer::MockSynthesizer;
    use crate::translate::translator::MockTranslator;

    async fn settle() {
        for _ in 0..50 {
            tokio::task::yield_now().await;
        }
    }

    fn start_default(
        source: MockTranscriptSource,
        translator: MockTranslator,
    ) -> PipelineHandle {
        let (synth, _handle, synth_events) = MockSynthesizer::new();
        Pipeline::start(
            PipelineConfig::default(),
            source,
            Arc::new(translator),
            Box::new(synth),
            synth_events,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_and_stop_recording() {
        let (source, mut taps) = MockTranscriptSource::new();
        let handle = start_default(source, MockTranslator::echo("x"));

        assert!(!*handle.recording().borrow());
        handle.start_recording().await;
        let _session = taps.next_session().await.unwrap();
        settle().await;
        assert!(*handle.recording().borrow());

        handle.stop_recording().await;
        settle().await;
        assert!(!*handle.recording().borrow());

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_denied_authorization_surfaces_status() {
        let (source, _taps) = MockTranscriptSource::new();
        let source = source.with_denied_authorization();
        let handle = start_default(source, MockTranslator::echo("x"));

        handle.start_recording().await;
        settle().await;

        assert!(!*handle.recording().borrow());
        let status = handle.status().borrow().clone();
        assert!(status.unwrap().contains("not authorized"));

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_start_opens_one_session() {
        let (source, mut taps) = MockTranscriptSource::new();
        let handle = start_default(source, MockTranslator::echo("x"));

        handle.start_recording().await;
        handle.start_recording().await;
        let _session = taps.next_session().await.unwrap();
        settle().await;
        assert_eq!(taps.sessions_started(), 1);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_error_preserves_finalized_entries() {
        let (source, mut taps) = MockTranscriptSource::new();
        let handle = start_default(source, MockTranslator::echo("zh"));

        handle.start_recording().await;
        let session = taps.next_session().await.unwrap();
        settle().await;

        session
            .send(SourceEvent::Partial("finished thought".to_string()))
            .await
            .unwrap();
        settle().await;
        tokio::time::advance(Duration::from_millis(1300)).await;
        settle().await;
        assert_eq!(handle.transcript().borrow().len(), 1);

        // Second session gets a partial, then the engine dies.
        let session2 = taps.next_session().await.unwrap();
        session2
            .send(SourceEvent::Partial("half a thou".to_string()))
            .await
            .unwrap();
        session2
            .send(SourceEvent::Error {
                message: "engine crashed".to_string(),
            })
            .await
            .unwrap();
        settle().await;
        tokio::time::advance(Duration::from_millis(1300)).await;
        settle().await;

        // The failed session's partial is not finalized; the earlier entry
        // survives; the error is visible; recording stopped.
        assert_eq!(handle.transcript().borrow().len(), 1);
        assert!(!*handle.recording().borrow());
        let status = handle.status().borrow().clone();
        assert!(status.unwrap().contains("engine crashed"));

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_resets_transcript() {
        let (source, mut taps) = MockTranscriptSource::new();
        let handle = start_default(source, MockTranslator::echo("zh"));

        handle.start_recording().await;
        let session = taps.next_session().await.unwrap();
        settle().await;
        session
            .send(SourceEvent::Partial("hello".to_string()))
            .await
            .unwrap();
        settle().await;
        tokio::time::advance(Duration::from_millis(1300)).await;
        settle().await;
        assert_eq!(handle.transcript().borrow().len(), 1);

        handle.clear().await;
        settle().await;
        assert!(handle.transcript().borrow().is_empty());

        handle.shutdown().await;
    }
}
