//! RSVP playback: the reading cursor, pacing and the tick scheduler.

mod display;
mod engine;
mod pacing;
mod position;

pub use display::{Progress, WordDisplay, orp_index};
pub use engine::{PlaybackEngine, PlaybackState, TickOutcome};
pub use pacing::Pacing;
pub use position::PositionTracker;
