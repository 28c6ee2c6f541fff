//! Platform layer
//!
//! Handles terminal differences for:
//! - Input events (held keys without release events, text entry)
//! - Time/ticks (fixed-step accumulator, frame pacing)

pub mod clock;
pub mod input;

pub use clock::FrameClock;
pub use input::{KeyTracker, NameEntry, NameInput};
