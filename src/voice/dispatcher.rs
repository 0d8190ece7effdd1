//! Voice command dispatcher

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::services::InstructionVoice;
use crate::tasks::TimerCommand;

use super::parser::{parse_command, VoiceAction};

/// Workout-flow callbacks invoked by the dispatcher.
///
/// The dispatcher never drives the timer for set changes itself; the flow
/// handler owns that (recording a set typically starts the rest countdown,
/// finishing the workout stops it).
pub trait WorkoutFlow {
    /// Record the current set as done and advance
    fn next_set(&mut self);

    /// End the workout session
    fn finish_workout(&mut self);
}

/// Routes parsed voice actions to the workout flow, the timer task and the
/// announcer. Dispatch never fails: unknown actions are a logged no-op.
pub struct CommandDispatcher<F: WorkoutFlow> {
    flow: F,
    voice: Arc<Mutex<InstructionVoice>>,
    timer_command_tx: UnboundedSender<TimerCommand>,
}

impl<F: WorkoutFlow> CommandDispatcher<F> {
    /// Create a dispatcher over the given flow handler and collaborators
    pub fn new(
        flow: F,
        voice: Arc<Mutex<InstructionVoice>>,
        timer_command_tx: UnboundedSender<TimerCommand>,
    ) -> Self {
        Self {
            flow,
            voice,
            timer_command_tx,
        }
    }

    /// Parse a raw transcript and route the resulting action
    pub fn dispatch_transcript(&mut self, text: &str) {
        self.dispatch(parse_command(text));
    }

    /// Route one parsed action
    pub fn dispatch(&mut self, action: VoiceAction) {
        match action {
            VoiceAction::NextSet => self.flow.next_set(),
            VoiceAction::FinishWorkout => self.flow.finish_workout(),
            VoiceAction::PauseTimer => self.send_timer_command(TimerCommand::Pause),
            VoiceAction::ResumeTimer => self.send_timer_command(TimerCommand::Resume),
            VoiceAction::RepeatInstruction => match self.voice.lock() {
                Ok(voice) => voice.repeat(),
                Err(e) => warn!("Failed to lock announcer voice: {}", e),
            },
            VoiceAction::Unknown => {
                debug!("Ignoring unrecognized voice input");
            }
        }
    }

    fn send_timer_command(&self, command: TimerCommand) {
        if let Err(e) = self.timer_command_tx.send(command) {
            warn!("Failed to send timer command: {}", e);
        }
    }
}
