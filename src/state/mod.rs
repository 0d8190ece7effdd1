//! State management module
//!
//! This module contains all state-related structures and their management logic.

pub mod session_state;
pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use session_state::SessionState;
pub use app_state::{AppState, SessionSummary};
pub use timer_state::TimerState;
