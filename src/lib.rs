//! Rest Coach - A voice-controlled rest-timer engine for workout sessions
//!
//! This library provides the countdown engine shown between exercise sets,
//! together with the voice command parser and dispatcher that drive it:
//! "feito" records a set and starts the rest timer, "pausar"/"retomar"
//! control the countdown, "repetir" replays the last spoken instruction.

pub mod config;
pub mod engine;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;
pub mod voice;

// Re-export commonly used types
pub use config::Config;
pub use engine::{TimerEngine, TimerEvent};
pub use state::{AppState, SessionState, TimerState};
pub use tasks::TimerCommand;
pub use utils::signals::shutdown_signal;
pub use voice::{parse_command, CommandDispatcher, VoiceAction, WorkoutFlow};
