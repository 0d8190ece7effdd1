//! Rest-timer countdown engine

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::state::TimerState;
use crate::utils::Clock;

/// Ticks with this many seconds or fewer left on the clock emit a warning
/// cue so the user hears the rest period running out.
pub const WARNING_WINDOW_SECONDS: u64 = 4;

/// Events emitted by the engine as the countdown advances
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// A countdown was (re)started with the given duration
    Started { total_seconds: u64 },
    /// A tick landed inside the final-seconds warning window
    Warning { time_left_seconds: u64 },
    /// The countdown reached zero
    Finished,
    /// The countdown was stopped before completion
    Stopped,
    /// The countdown was paused with time still on the clock
    Paused { time_left_seconds: u64 },
    /// A paused countdown resumed from its remaining time
    Resumed { time_left_seconds: u64 },
}

/// Countdown engine owning the timer state.
///
/// The engine is purely synchronous: ticks, pause/resume and background
/// reconciliation are all plain method calls, so the whole state machine is
/// testable without a runtime. The timer task drives it from a one-second
/// interval and fans its events out to haptics and the announcer.
pub struct TimerEngine {
    state: TimerState,
    clock: Arc<dyn Clock>,
    event_tx: UnboundedSender<TimerEvent>,
}

impl TimerEngine {
    /// Create an idle engine with an injected clock and event channel
    pub fn new(clock: Arc<dyn Clock>, event_tx: UnboundedSender<TimerEvent>) -> Self {
        Self {
            state: TimerState::new(),
            clock,
            event_tx,
        }
    }

    /// Get a snapshot of the current timer state
    pub fn state(&self) -> TimerState {
        self.state.clone()
    }

    /// Check if the countdown is running
    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Check if a background stamp is awaiting foreground reconciliation.
    /// Ticks are suspended while this holds, so the backgrounded gap is
    /// applied exactly once, by the reconciliation subtraction.
    pub fn in_background(&self) -> bool {
        self.state.background_entered_at.is_some()
    }

    /// Fraction of the countdown still remaining, in [0, 1]
    pub fn progress(&self) -> f64 {
        self.state.progress()
    }

    /// Start a countdown of `duration_seconds`.
    ///
    /// A zero duration is rejected as a caller contract violation rather
    /// than clamped to an immediately-finished timer. Starting while a run
    /// is active restarts from the new duration; the previous run's
    /// schedule is dropped, not queued behind.
    pub fn start(&mut self, duration_seconds: u64) -> Result<(), String> {
        if duration_seconds == 0 {
            return Err("Timer duration must be greater than zero".to_string());
        }

        if self.state.active {
            debug!("Restarting active timer with {} seconds", duration_seconds);
        }

        self.state.total_seconds = duration_seconds;
        self.state.time_left_seconds = duration_seconds;
        self.state.active = true;
        self.state.background_entered_at = None;

        info!("Timer started for {} seconds", duration_seconds);
        self.emit(TimerEvent::Started {
            total_seconds: duration_seconds,
        });
        Ok(())
    }

    /// Stop the countdown and reset the remaining time. Idempotent.
    pub fn stop(&mut self) {
        let was_active = self.state.active;
        self.state.active = false;
        self.state.time_left_seconds = 0;
        self.state.background_entered_at = None;

        if was_active {
            info!("Timer stopped");
            self.emit(TimerEvent::Stopped);
        }
    }

    /// Pause the countdown, keeping the remaining time on the clock
    pub fn pause(&mut self) {
        if !self.state.active {
            return;
        }

        self.state.active = false;
        self.state.background_entered_at = None;
        info!("Timer paused with {} seconds left", self.state.time_left_seconds);
        self.emit(TimerEvent::Paused {
            time_left_seconds: self.state.time_left_seconds,
        });
    }

    /// Resume a paused countdown from its remaining time
    pub fn resume(&mut self) {
        if self.state.active || self.state.time_left_seconds == 0 {
            return;
        }

        self.state.active = true;
        info!("Timer resumed with {} seconds left", self.state.time_left_seconds);
        self.emit(TimerEvent::Resumed {
            time_left_seconds: self.state.time_left_seconds,
        });
    }

    /// Add seconds to both the remaining and total time.
    ///
    /// Applied even when the timer is stopped; the adjusted values carry
    /// into a subsequent resume.
    pub fn add_time(&mut self, seconds: u64) {
        self.state.time_left_seconds = self.state.time_left_seconds.saturating_add(seconds);
        self.state.total_seconds = self.state.total_seconds.saturating_add(seconds);
        debug!(
            "Added {} seconds: {} left of {}",
            seconds, self.state.time_left_seconds, self.state.total_seconds
        );
    }

    /// Subtract seconds from both the remaining and total time.
    ///
    /// Each field is clamped at zero on its own, so the two can diverge
    /// (remaining hits zero while total stays positive, or the reverse).
    /// That asymmetry is intentional and must not be coupled by a shared
    /// floor. Exhausting the remaining time of an active run counts as
    /// natural completion.
    pub fn subtract_time(&mut self, seconds: u64) {
        self.state.time_left_seconds = self.state.time_left_seconds.saturating_sub(seconds);
        self.state.total_seconds = self.state.total_seconds.saturating_sub(seconds);
        debug!(
            "Subtracted {} seconds: {} left of {}",
            seconds, self.state.time_left_seconds, self.state.total_seconds
        );

        if self.state.active && self.state.time_left_seconds == 0 {
            self.finish();
        }
    }

    /// Advance the countdown by one second.
    ///
    /// No-op unless the timer is active with time remaining, so a tick that
    /// fires after stop or completion cannot double-finish.
    pub fn tick(&mut self) {
        if !self.state.active || self.state.time_left_seconds == 0 {
            return;
        }

        let before = self.state.time_left_seconds;
        self.state.time_left_seconds -= 1;

        if self.state.time_left_seconds == 0 {
            self.finish();
        } else if before <= WARNING_WINDOW_SECONDS {
            self.emit(TimerEvent::Warning {
                time_left_seconds: self.state.time_left_seconds,
            });
        }
    }

    /// Record that the host app went to the background mid-countdown
    pub fn enter_background(&mut self) {
        if self.state.active {
            let now = self.clock.now();
            debug!("App backgrounded with timer active at {}", now);
            self.state.background_entered_at = Some(now);
        }
    }

    /// Reconcile the countdown with the wall-clock time spent backgrounded.
    ///
    /// Runs synchronously on the foreground transition, before the tick
    /// interval is observed again, so no tick can double-count the gap.
    /// A gap that exhausts the remaining time completes the timer here,
    /// once, rather than waiting for the next tick.
    pub fn enter_foreground(&mut self) {
        let Some(entered_at) = self.state.background_entered_at.take() else {
            return;
        };

        if !self.state.active {
            return;
        }

        let elapsed = (self.clock.now() - entered_at).num_seconds().max(0) as u64;
        info!("App foregrounded after {} seconds in background", elapsed);

        self.state.time_left_seconds = self.state.time_left_seconds.saturating_sub(elapsed);
        if self.state.time_left_seconds == 0 {
            self.finish();
        }
    }

    /// Terminal transition: deactivate and report completion exactly once
    fn finish(&mut self) {
        self.state.active = false;
        self.state.background_entered_at = None;
        info!("Timer finished");
        self.emit(TimerEvent::Finished);
    }

    fn emit(&self, event: TimerEvent) {
        if let Err(e) = self.event_tx.send(event) {
            warn!("Failed to send timer event: {}", e);
        }
    }
}
