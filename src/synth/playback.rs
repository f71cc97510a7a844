//! Playback state machine.
//!
//! Wraps the synthesis engine with play/pause/resume/cancel semantics per
//! conversation entry. At most one entry is ever speaking or paused;
//! starting playback for a different entry cancels the current one first.

use crate::error::Result;
use crate::synth::synthesizer::{SynthEvent, Synthesizer, UtteranceToken};
use crate::transcript::entry::EntryId;

/// Current playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Speaking(EntryId),
    Paused(EntryId),
}

/// Sequences spoken playback of entry translations.
///
/// All methods are called from the serialized coordination context, so
/// state transitions are never observed half-applied. Engine callbacks go
/// through [`PlaybackCoordinator::on_event`] and are matched against the
/// active utterance token; stale callbacks are dropped.
pub struct PlaybackCoordinator {
    synthesizer: Box<dyn Synthesizer>,
    state: PlaybackState,
    next_token: u64,
    active_token: Option<UtteranceToken>,
    preferred_voice: Option<String>,
    target_language: String,
}

impl PlaybackCoordinator {
    pub fn new(
        synthesizer: Box<dyn Synthesizer>,
        preferred_voice: Option<String>,
        target_language: String,
    ) -> Self {
        Self {
            synthesizer,
            state: PlaybackState::Idle,
            next_token: 1,
            active_token: None,
            preferred_voice,
            target_language,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Starts speaking `text` for `entry`.
    ///
    /// A different entry already speaking or paused is cancelled first.
    /// Re-requesting the entry that is paused resumes it; re-requesting the
    /// entry that is speaking is a no-op. With no voice available at all
    /// this silently does nothing.
    pub fn play(&mut self, entry: EntryId, text: &str) -> Result<()> {
        match self.state {
            PlaybackState::Speaking(current) if current == entry => return Ok(()),
            PlaybackState::Paused(current) if current == entry => {
                self.synthesizer.resume();
                self.state = PlaybackState::Speaking(entry);
                return Ok(());
            }
            PlaybackState::Speaking(_) | PlaybackState::Paused(_) => {
                self.synthesizer.cancel();
                self.active_token = None;
                self.state = PlaybackState::Idle;
            }
            PlaybackState::Idle => {}
        }

        let Some(voice) = self
            .synthesizer
            .resolve_voice(self.preferred_voice.as_deref(), &self.target_language)
        else {
            return Ok(());
        };

        let token = UtteranceToken(self.next_token);
        self.next_token += 1;
        self.synthesizer.speak(token, text, &voice)?;
        self.active_token = Some(token);
        self.state = PlaybackState::Speaking(entry);
        Ok(())
    }

    /// Pauses the current utterance. If the engine reports it already
    /// finished, the state falls through to idle instead.
    pub fn pause(&mut self) {
        if let PlaybackState::Speaking(entry) = self.state {
            if self.synthesizer.pause() {
                self.state = PlaybackState::Paused(entry);
            } else {
                self.active_token = None;
                self.state = PlaybackState::Idle;
            }
        }
    }

    pub fn resume(&mut self) {
        if let PlaybackState::Paused(entry) = self.state {
            self.synthesizer.resume();
            self.state = PlaybackState::Speaking(entry);
        }
    }

    /// Cancels any active playback.
    pub fn stop(&mut self) {
        if self.state != PlaybackState::Idle {
            self.synthesizer.cancel();
            self.active_token = None;
            self.state = PlaybackState::Idle;
        }
    }

    /// Applies an asynchronous engine callback.
    ///
    /// Events carrying a token other than the active one belong to a
    /// cancelled or superseded utterance and are ignored.
    pub fn on_event(&mut self, event: SynthEvent) {
        if self.active_token != Some(event.token()) {
            return;
        }
        match event {
            SynthEvent::Finished(_) | SynthEvent::Cancelled(_) => {
                self.active_token = None;
                self.state = PlaybackState::Idle;
            }
            SynthEvent::Paused(_) => {
                // Engine-initiated pause confirmation.
                if let PlaybackState::Speaking(entry) = self.state {
                    self.state = PlaybackState::Paused(entry);
                }
            }
            SynthEvent::Started(_) => {}
        }
    }
}
