//! Timer engine module
//!
//! This module contains the synchronous countdown core that owns the timer
//! state. All scheduling lives in the background tasks; the engine itself
//! only mutates state and emits events.

pub mod timer;

// Re-export main types
pub use timer::{TimerEngine, TimerEvent, WARNING_WINDOW_SECONDS};
