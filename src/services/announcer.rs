//! Text-to-speech announcer contract and instruction replay

use std::sync::Arc;

use tracing::{debug, info};

/// Spoken when a repeat is requested before anything was announced
pub const NOTHING_TO_REPEAT_PHRASE: &str = "Não há instrução para repetir";

/// Text-to-speech capability consumed by the coaching core.
///
/// Implementations live outside this crate (platform TTS, cloud voices);
/// the core only needs speak and barge-in.
pub trait Announcer: Send + Sync {
    /// Speak an utterance. Priority utterances interrupt whatever is
    /// currently being spoken.
    fn speak(&self, text: &str, priority: bool);

    /// Stop any in-flight speech immediately
    fn stop_speaking(&self);
}

/// Announcer that narrates to the log, used by the CLI session driver
#[derive(Debug, Clone, Default)]
pub struct ConsoleAnnouncer;

impl Announcer for ConsoleAnnouncer {
    fn speak(&self, text: &str, priority: bool) {
        if priority {
            info!("[voz, prioridade] {}", text);
        } else {
            info!("[voz] {}", text);
        }
    }

    fn stop_speaking(&self) {
        debug!("Speech interrupted");
    }
}

/// Announcer-facing layer that retains the last spoken instruction so a
/// "repeat" command can replay it.
///
/// Single writer: every non-repeat utterance overwrites the retained text;
/// the repeat handler only reads it.
pub struct InstructionVoice {
    announcer: Arc<dyn Announcer>,
    last_instruction: Option<String>,
}

impl InstructionVoice {
    /// Wrap an announcer with instruction retention
    pub fn new(announcer: Arc<dyn Announcer>) -> Self {
        Self {
            announcer,
            last_instruction: None,
        }
    }

    /// Speak an instruction and retain it for later repetition
    pub fn announce(&mut self, text: &str) {
        self.last_instruction = Some(text.to_string());
        self.announcer.speak(text, false);
    }

    /// Re-speak the retained instruction with barge-in priority, or a
    /// fallback phrase when nothing has been announced yet.
    pub fn repeat(&self) {
        match &self.last_instruction {
            Some(text) => {
                self.announcer.stop_speaking();
                self.announcer.speak(text, true);
            }
            None => {
                debug!("Repeat requested with no retained instruction");
                self.announcer.speak(NOTHING_TO_REPEAT_PHRASE, false);
            }
        }
    }

    /// The most recently announced instruction, if any
    pub fn last_instruction(&self) -> Option<&str> {
        self.last_instruction.as_deref()
    }
}
