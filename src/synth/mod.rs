//! Speech synthesis seam and playback coordination.
//!
//! The [`Synthesizer`] trait wraps an external synthesis engine as an
//! owned, injected resource (no global engine state); the
//! [`PlaybackCoordinator`] is the small state machine that sequences
//! play/pause/resume/cancel per conversation entry.

pub mod playback;
pub mod synthesizer;

pub use playback::{PlaybackCoordinator, PlaybackState};
pub use synthesizer::{
    MockSynthHandle, MockSynthesizer, NullSynthesizer, SynthCall, SynthEvent, Synthesizer,
    UtteranceToken,
};
