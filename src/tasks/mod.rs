//! Background tasks module
//!
//! This module contains the background tasks that run alongside the session
//! driver: the countdown runner, the listening loop and the cue fan-out.

pub mod cues;
pub mod listen_loop;
pub mod rest_timer;

// Re-export main functions
pub use cues::cue_task;
pub use listen_loop::{listen_loop_task, ListenConfig};
pub use rest_timer::{rest_timer_task, TimerCommand};
