//! Streaming translation pipeline.
//!
//! Serialized coordination of three independent event sources:
//! ```text
//! ┌────────────┐ partials ┌───────────────────────────────────────────┐
//! │ Transcript │─────────▶│                                           │
//! │   Source   │◀─restart─│                                           │
//! └────────────┘          │                                           │
//! ┌────────────┐ elapsed  │   Coordinator loop (single task)          │
//! │  Silence   │─────────▶│     Segmenter ─▶ Transcript Model         │
//! │ countdown  │◀───arm───│     Translation results ─▶ entry by id    │
//! └────────────┘          │     Playback state machine                │
//! ┌────────────┐ results  │                                           │
//! │ Translator │─────────▶│                                           │
//! │ Synth cbs  │          │                                           │
//! └────────────┘          └───────────────────────────────────────────┘
//! ```
//! Every state mutation happens inside the one loop task, so nothing is
//! ever observed half-updated.

pub mod coordinator;
pub mod event;
pub mod segmenter;

pub use coordinator::{Pipeline, PipelineConfig, PipelineHandle};
pub use event::Command;
pub use segmenter::{SegmentAction, UtteranceSegmenter};
