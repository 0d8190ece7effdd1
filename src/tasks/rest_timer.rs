//! Rest timer background task

use std::time::Duration;

use tokio::sync::{mpsc::UnboundedReceiver, watch};
use tokio::time::{interval_at, Instant, Interval};
use tracing::{debug, info, warn};

use crate::engine::TimerEngine;
use crate::state::TimerState;

/// Commands accepted by the rest timer task.
///
/// The task owns the engine exclusively; everything else talks to it
/// through this channel, so no locking is needed around timer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerCommand {
    /// Start (or restart) a countdown of the given seconds
    Start(u64),
    /// Stop the countdown and reset the remaining time
    Stop,
    /// Pause the countdown, keeping the remaining time
    Pause,
    /// Resume a paused countdown
    Resume,
    /// Add seconds to the countdown
    AddTime(u64),
    /// Subtract seconds from the countdown
    SubtractTime(u64),
    /// The host app moved to the background
    EnterBackground,
    /// The host app returned to the foreground
    EnterForeground,
}

/// One-second tick schedule starting one period from now.
///
/// A fresh schedule is armed on every start, resume and foreground
/// reconciliation so a tick from a previous run can never fire against the
/// new countdown.
fn arm_tick_schedule() -> Interval {
    interval_at(
        Instant::now() + Duration::from_secs(1),
        Duration::from_secs(1),
    )
}

/// Background task that drives the countdown engine.
///
/// Ticks every second while the engine is active, applies commands as they
/// arrive and publishes a state snapshot after every change. Runs until the
/// command channel closes.
pub async fn rest_timer_task(
    mut engine: TimerEngine,
    mut command_rx: UnboundedReceiver<TimerCommand>,
    state_tx: watch::Sender<TimerState>,
) {
    info!("Starting rest timer task");

    let mut ticker = arm_tick_schedule();

    loop {
        tokio::select! {
            // Timer tick - advance the countdown. Ticking is suspended
            // while backgrounded; the foreground reconciliation accounts
            // for that gap, so ticking through it would count it twice.
            _ = ticker.tick(), if engine.is_active() && !engine.in_background() => {
                engine.tick();
                publish_state(&state_tx, &engine);
            }

            // Command - apply and re-arm the schedule where needed
            command = command_rx.recv() => {
                let Some(command) = command else {
                    debug!("Timer command channel closed");
                    break;
                };

                match command {
                    TimerCommand::Start(seconds) => {
                        if let Err(e) = engine.start(seconds) {
                            warn!("Rejected timer start: {}", e);
                        } else {
                            ticker = arm_tick_schedule();
                        }
                    }
                    TimerCommand::Stop => engine.stop(),
                    TimerCommand::Pause => engine.pause(),
                    TimerCommand::Resume => {
                        engine.resume();
                        if engine.is_active() {
                            ticker = arm_tick_schedule();
                        }
                    }
                    TimerCommand::AddTime(seconds) => engine.add_time(seconds),
                    TimerCommand::SubtractTime(seconds) => engine.subtract_time(seconds),
                    TimerCommand::EnterBackground => engine.enter_background(),
                    TimerCommand::EnterForeground => {
                        // reconcile before the tick schedule is observed
                        // again, so no tick double-counts the gap
                        engine.enter_foreground();
                        if engine.is_active() {
                            ticker = arm_tick_schedule();
                        }
                    }
                }

                publish_state(&state_tx, &engine);
            }
        }
    }

    info!("Rest timer task finished");
}

fn publish_state(state_tx: &watch::Sender<TimerState>, engine: &TimerEngine) {
    if let Err(e) = state_tx.send(engine.state()) {
        warn!("Failed to publish timer state: {}", e);
    }
}
