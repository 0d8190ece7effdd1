//! Timer cue background task

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

use crate::engine::TimerEvent;
use crate::services::{HapticKind, Haptics, InstructionVoice};

/// Spoken when the rest countdown completes
pub const REST_OVER_PHRASE: &str = "Descanso concluído. Vamos para a próxima série!";

/// Background task that turns timer events into user-facing cues.
///
/// Start pulses once, each warning tick in the final seconds pulses
/// lightly, and completion pulses success and announces the next set.
/// Runs until the event channel closes.
pub async fn cue_task(
    mut event_rx: UnboundedReceiver<TimerEvent>,
    haptics: Arc<dyn Haptics>,
    voice: Arc<Mutex<InstructionVoice>>,
) {
    info!("Starting timer cue task");

    while let Some(event) = event_rx.recv().await {
        match event {
            TimerEvent::Started { total_seconds } => {
                info!("Rest countdown started: {} seconds", total_seconds);
                haptics.pulse(HapticKind::Medium);
            }
            TimerEvent::Warning { time_left_seconds } => {
                info!("Rest ending: {} seconds left", time_left_seconds);
                haptics.pulse(HapticKind::Light);
            }
            TimerEvent::Finished => {
                haptics.pulse(HapticKind::Success);
                match voice.lock() {
                    Ok(mut voice) => voice.announce(REST_OVER_PHRASE),
                    Err(e) => warn!("Failed to lock announcer voice: {}", e),
                }
            }
            TimerEvent::Stopped => {
                info!("Rest countdown stopped");
            }
            TimerEvent::Paused { time_left_seconds } => {
                info!("Rest countdown paused at {} seconds", time_left_seconds);
            }
            TimerEvent::Resumed { time_left_seconds } => {
                info!("Rest countdown resumed at {} seconds", time_left_seconds);
                haptics.pulse(HapticKind::Light);
            }
        }
    }

    info!("Timer cue task finished");
}
