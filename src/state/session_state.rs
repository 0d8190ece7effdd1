//! Workout session state structure and management

use serde::{Deserialize, Serialize};

/// Session state structure - tracks progress through the current workout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// One-based index of the set currently being performed
    pub current_set: u32,
    /// Number of sets recorded as done (by voice command or timer completion)
    pub sets_completed: u32,
    /// True once the finish-workout command has been handled
    pub finished: bool,
    /// List of current errors for client visibility
    pub errors: Vec<String>,
}

impl SessionState {
    /// Create a new SessionState positioned at the first set
    pub fn new() -> Self {
        Self {
            current_set: 1,
            sets_completed: 0,
            finished: false,
            errors: Vec::new(),
        }
    }

    /// Record the current set as done and advance to the next one
    pub fn complete_set(&mut self) {
        self.sets_completed += 1;
        self.current_set += 1;
    }

    /// Mark the workout as finished
    pub fn finish(&mut self) {
        self.finished = true;
    }

    /// Check if the workout is still in progress
    pub fn in_progress(&self) -> bool {
        !self.finished
    }

    /// Add an error to the state
    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }

    /// Clear errors for a specific component
    pub fn clear_errors_for(&mut self, component: &str) {
        let initial_count = self.errors.len();
        self.errors.retain(|error| !error.to_lowercase().contains(&component.to_lowercase()));

        if self.errors.len() != initial_count {
            tracing::info!("Cleared {} errors for component: {}", initial_count - self.errors.len(), component);
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
