//! Speech recognition contract

use tracing::info;

/// Outcome of one recognition cycle, delivered on the speech event channel.
///
/// The recognizer itself runs outside the core (platform speech service);
/// the core only consumes its events and decides when to listen again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// A transcript was produced
    Transcript(String),
    /// The recognition session ended without a result (silence timeout
    /// or clean stop)
    End,
    /// The recognition session failed; non-fatal, retried in continuous mode
    Error(String),
}

/// Speech recognition capability consumed by the listen loop
pub trait SpeechRecognizer: Send + Sync {
    /// Begin a recognition session for the given locale
    fn start_listening(&self, locale: &str) -> Result<(), String>;

    /// End the current recognition session
    fn stop_listening(&self);
}

/// Recognizer stand-in for the CLI session driver, where transcripts come
/// from stdin instead of a microphone. Start/stop only mark the session
/// boundaries in the log.
#[derive(Debug, Clone, Default)]
pub struct ConsoleRecognizer;

impl SpeechRecognizer for ConsoleRecognizer {
    fn start_listening(&self, locale: &str) -> Result<(), String> {
        info!("Listening for commands ({})", locale);
        Ok(())
    }

    fn stop_listening(&self) {
        info!("Stopped listening");
    }
}
