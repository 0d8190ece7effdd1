//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc::UnboundedSender, watch};
use tracing::{info, warn};

use crate::services::InstructionVoice;
use crate::tasks::TimerCommand;
use crate::voice::WorkoutFlow;

use super::{SessionState, TimerState};

/// Main application state that wires the session, timer and announcer together
pub struct AppState {
    /// Current workout session progress
    pub session_state: Arc<Mutex<SessionState>>,
    /// Rest duration started after each completed set
    pub default_rest_seconds: u64,
    /// Command channel into the rest timer task
    pub timer_command_tx: UnboundedSender<TimerCommand>,
    /// Latest timer snapshot published by the rest timer task
    pub timer_state_rx: watch::Receiver<TimerState>,
    /// Announcer layer shared with the cue task
    pub voice: Arc<Mutex<InstructionVoice>>,
    /// Session metadata
    pub start_time: Instant,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

/// End-of-session report printed by the CLI driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub sets_completed: u32,
    pub finished: bool,
    pub duration: String,
    pub errors: Vec<String>,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

impl AppState {
    /// Create a new AppState around the timer task channels
    pub fn new(
        default_rest_seconds: u64,
        timer_command_tx: UnboundedSender<TimerCommand>,
        timer_state_rx: watch::Receiver<TimerState>,
        voice: Arc<Mutex<InstructionVoice>>,
    ) -> Self {
        Self {
            session_state: Arc::new(Mutex::new(SessionState::new())),
            default_rest_seconds,
            timer_command_tx,
            timer_state_rx,
            voice,
            start_time: Instant::now(),
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Update the session state and record the action that caused it
    pub fn update_session<F>(&self, action: &str, updater: F) -> Result<SessionState, String>
    where
        F: FnOnce(&mut SessionState),
    {
        let mut state = self.session_state.lock()
            .map_err(|e| format!("Failed to lock session state: {}", e))?;

        updater(&mut state);
        let new_state = state.clone();
        drop(state);

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok(new_state)
    }

    /// Record the current set as done, announce it and start the rest timer
    pub fn complete_set(&self) -> Result<SessionState, String> {
        let state = self.update_session("next-set", |state| state.complete_set())?;
        info!("Set recorded, {} completed so far", state.sets_completed);

        self.announce(&format!(
            "Série {} concluída. Descanse {} segundos",
            state.sets_completed, self.default_rest_seconds
        ))?;
        self.send_timer_command(TimerCommand::Start(self.default_rest_seconds))?;
        Ok(state)
    }

    /// End the workout: stop any running rest timer and announce the wrap-up
    pub fn finish_workout(&self) -> Result<SessionState, String> {
        let state = self.update_session("finish-workout", |state| state.finish())?;
        info!("Workout finished with {} sets completed", state.sets_completed);

        self.send_timer_command(TimerCommand::Stop)?;
        self.announce("Treino finalizado. Bom trabalho!")?;
        Ok(state)
    }

    /// Speak an instruction through the shared announcer layer
    pub fn announce(&self, text: &str) -> Result<(), String> {
        let mut voice = self.voice.lock()
            .map_err(|e| format!("Failed to lock announcer voice: {}", e))?;
        voice.announce(text);
        Ok(())
    }

    /// Send a command to the rest timer task
    pub fn send_timer_command(&self, command: TimerCommand) -> Result<(), String> {
        self.timer_command_tx.send(command)
            .map_err(|e| format!("Failed to send timer command: {}", e))
    }

    /// Get current session state
    pub fn get_session_state(&self) -> Result<SessionState, String> {
        self.session_state.lock()
            .map(|state| state.clone())
            .map_err(|e| format!("Failed to lock session state: {}", e))
    }

    /// Get the latest timer snapshot
    pub fn get_timer_state(&self) -> TimerState {
        self.timer_state_rx.borrow().clone()
    }

    /// Add an error to the session state
    pub fn add_error(&self, error: String) -> Result<(), String> {
        let mut state = self.session_state.lock()
            .map_err(|e| format!("Failed to lock session state: {}", e))?;

        warn!("Adding error to session: {}", error);
        state.add_error(error);
        Ok(())
    }

    /// Clear errors for a specific component
    pub fn clear_errors_for(&self, component: &str) -> Result<(), String> {
        let mut state = self.session_state.lock()
            .map_err(|e| format!("Failed to lock session state: {}", e))?;

        state.clear_errors_for(component);
        Ok(())
    }

    /// Calculate session duration as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Build the end-of-session report
    pub fn summary(&self) -> Result<SessionSummary, String> {
        let state = self.get_session_state()?;
        let (last_action, last_action_time) = self.get_last_action();

        Ok(SessionSummary {
            sets_completed: state.sets_completed,
            finished: state.finished,
            duration: self.get_uptime(),
            errors: state.errors,
            last_action,
            last_action_time,
        })
    }
}

impl WorkoutFlow for Arc<AppState> {
    fn next_set(&mut self) {
        if let Err(e) = self.complete_set() {
            warn!("Failed to record set completion: {}", e);
        }
    }

    fn finish_workout(&mut self) {
        if let Err(e) = AppState::finish_workout(self) {
            warn!("Failed to finish workout: {}", e);
        }
    }
}
