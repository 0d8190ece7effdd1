//! Timer state structure and management

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timer state for tracking the rest countdown between sets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerState {
    /// Remaining countdown in whole seconds
    pub time_left_seconds: u64,
    /// Duration the timer was (re)started with, adjusted by add/subtract
    pub total_seconds: u64,
    /// True while the countdown is ticking
    pub active: bool,
    /// Wall-clock instant the host app was backgrounded while active
    pub background_entered_at: Option<DateTime<Utc>>,
}

impl TimerState {
    /// Create a new idle timer state
    pub fn new() -> Self {
        Self {
            time_left_seconds: 0,
            total_seconds: 0,
            active: false,
            background_entered_at: None,
        }
    }

    /// Check if the timer is actively counting down
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Paused means stopped mid-run with time still on the clock
    pub fn is_paused(&self) -> bool {
        !self.active && self.time_left_seconds > 0
    }

    /// Fraction of the countdown still remaining, in [0, 1]
    pub fn progress(&self) -> f64 {
        if self.total_seconds > 0 {
            self.time_left_seconds as f64 / self.total_seconds as f64
        } else {
            0.0
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}
