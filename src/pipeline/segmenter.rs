//! Utterance segmenter.
//!
//! Debounces partial-transcript updates against a silence countdown: every
//! change to the live transcript re-arms the timer, and only when updates
//! stop for the configured silence duration does the pending text become a
//! finalized utterance. Debounce, not throttle: rapid speech keeps
//! resetting the countdown indefinitely.
//!
//! The segmenter itself is a plain state machine; the owning event loop
//! schedules the countdown and calls back in with the generation it was
//! armed with. Bumping the generation is how an armed countdown is
//! cancelled, which keeps the whole thing drivable by a virtual clock.

use std::time::{Duration, Instant};

/// Instruction returned from [`UtteranceSegmenter::on_partial`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentAction {
    /// Schedule a countdown of `duration`; deliver it back with `generation`.
    ArmTimer { generation: u64, duration: Duration },
    /// Duplicate update, nothing to do.
    Ignore,
}

/// Segmentation state for the in-progress utterance.
#[derive(Debug)]
pub struct UtteranceSegmenter {
    pending_text: String,
    last_change: Option<Instant>,
    timer_generation: u64,
    timer_armed: bool,
    silence_duration: Duration,
}

impl UtteranceSegmenter {
    pub fn new(silence_duration: Duration) -> Self {
        Self {
            pending_text: String::new(),
            last_change: None,
            timer_generation: 0,
            timer_armed: false,
            silence_duration,
        }
    }

    /// Handles an updated partial transcript.
    ///
    /// A duplicate of the current pending text is ignored. Any real change
    /// replaces the pending text and requests a fresh countdown, implicitly
    /// cancelling the previous one (its generation is now stale).
    pub fn on_partial(&mut self, text: &str, now: Instant) -> SegmentAction {
        if text == self.pending_text {
            return SegmentAction::Ignore;
        }
        self.pending_text.clear();
        self.pending_text.push_str(text);
        self.last_change = Some(now);
        self.timer_generation += 1;
        self.timer_armed = true;
        SegmentAction::ArmTimer {
            generation: self.timer_generation,
            duration: self.silence_duration,
        }
    }

    /// Handles a fired countdown.
    ///
    /// Returns the finalized utterance text, or None when the countdown is
    /// stale (a newer partial re-armed it), cancelled, or nothing was said.
    pub fn on_silence_elapsed(&mut self, generation: u64) -> Option<String> {
        if !self.timer_armed || generation != self.timer_generation {
            return None;
        }
        self.timer_armed = false;
        self.last_change = None;
        if self.pending_text.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.pending_text))
    }

    /// Clears pending state and cancels any armed countdown.
    pub fn reset(&mut self) {
        self.pending_text.clear();
        self.last_change = None;
        self.timer_generation += 1;
        self.timer_armed = false;
    }

    pub fn pending_text(&self) -> &str {
        &self.pending_text
    }

    /// Time of the most recent partial-transcript change, if an utterance
    /// is in progress.
    pub fn last_change(&self) -> Option<Instant> {
        self.last_change
    }

    pub fn is_timer_armed(&self) -> bool {
        self.timer_armed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segmenter() -> UtteranceSegmenter {
        UtteranceSegmenter::new(Duration::from_millis(1200))
    }

    fn arm(segmenter: &mut UtteranceSegmenter, text: &str) -> u64 {
        match segmenter.on_partial(text, Instant::now()) {
            SegmentAction::ArmTimer { generation, .. } => generation,
            SegmentAction::Ignore => panic!("expected timer arm for {text:?}"),
        }
    }

    #[test]
    fn test_partial_arms_timer() {
        let mut seg = segmenter();
        assert!(!seg.is_timer_armed());

        let action = seg.on_partial("Hi", Instant::now());
        assert!(matches!(
            action,
            SegmentAction::ArmTimer {
                generation: 1,
                duration
            } if duration == Duration::from_millis(1200)
        ));
        assert!(seg.is_timer_armed());
        assert_eq!(seg.pending_text(), "Hi");
    }

    #[test]
    fn test_duplicate_partial_ignored() {
        let mut seg = segmenter();
        arm(&mut seg, "Hi");
        assert_eq!(seg.on_partial("Hi", Instant::now()), SegmentAction::Ignore);
    }

    #[test]
    fn test_new_partial_supersedes_old_countdown() {
        let mut seg = segmenter();
        let first = arm(&mut seg, "Hi");
        let second = arm(&mut seg, "Hi there");

        // The first countdown fires late: stale, no finalize.
        assert_eq!(seg.on_silence_elapsed(first), None);
        assert_eq!(seg.pending_text(), "Hi there");

        // The current countdown finalizes the latest text.
        assert_eq!(seg.on_silence_elapsed(second), Some("Hi there".to_string()));
        assert_eq!(seg.pending_text(), "");
        assert!(!seg.is_timer_armed());
    }

    #[test]
    fn test_countdown_fires_once() {
        let mut seg = segmenter();
        let generation = arm(&mut seg, "Hello");
        assert_eq!(seg.on_silence_elapsed(generation), Some("Hello".to_string()));
        assert_eq!(seg.on_silence_elapsed(generation), None);
    }

    #[test]
    fn test_empty_pending_is_noop() {
        let mut seg = segmenter();
        let a = arm(&mut seg, "something");
        let b = arm(&mut seg, "");
        assert_eq!(seg.on_silence_elapsed(a), None);
        assert_eq!(seg.on_silence_elapsed(b), None);
    }

    #[test]
    fn test_reset_cancels_countdown() {
        let mut seg = segmenter();
        let generation = arm(&mut seg, "stop me");
        seg.reset();

        assert!(!seg.is_timer_armed());
        assert_eq!(seg.pending_text(), "");
        assert_eq!(seg.on_silence_elapsed(generation), None);
    }

    #[test]
    fn test_rapid_updates_keep_debouncing() {
        let mut seg = segmenter();
        let mut generation = 0;
        for text in ["o", "on", "one", "one m", "one mo", "one more"] {
            generation = arm(&mut seg, text);
        }
        // Only the last countdown is live.
        for stale in 1..generation {
            assert_eq!(seg.on_silence_elapsed(stale), None);
        }
        assert_eq!(
            seg.on_silence_elapsed(generation),
            Some("one more".to_string())
        );
    }
}
