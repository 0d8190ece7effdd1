//! External collaborator contracts
//!
//! This module defines the capabilities the coaching core consumes from the
//! host platform: text-to-speech, haptic feedback and speech recognition.
//! Console-backed implementations are provided for the CLI session driver.

pub mod announcer;
pub mod haptics;
pub mod recognizer;

// Re-export main types
pub use announcer::{Announcer, ConsoleAnnouncer, InstructionVoice, NOTHING_TO_REPEAT_PHRASE};
pub use haptics::{ConsoleHaptics, HapticKind, Haptics};
pub use recognizer::{ConsoleRecognizer, SpeechEvent, SpeechRecognizer};
