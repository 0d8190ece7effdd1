//! Voice command module
//!
//! This module turns transcribed speech into workout actions: the parser
//! maps transcripts to a closed action set, the dispatcher routes actions
//! to the timer task, the workout flow and the announcer.

pub mod dispatcher;
pub mod parser;

// Re-export main types
pub use dispatcher::{CommandDispatcher, WorkoutFlow};
pub use parser::{parse_command, VoiceAction};
