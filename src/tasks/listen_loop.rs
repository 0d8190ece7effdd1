//! Continuous listening background task

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::services::{SpeechEvent, SpeechRecognizer};
use crate::state::AppState;

/// Listening contract configuration
#[derive(Debug, Clone)]
pub struct ListenConfig {
    /// Locale handed to the recognizer, e.g. "pt-BR"
    pub locale: String,
    /// Restart listening after each recognition cycle ends
    pub continuous: bool,
    /// Delay before re-listening after a clean session end
    pub restart_delay: Duration,
    /// Longer delay before re-listening after a recognizer error
    pub error_retry_delay: Duration,
}

impl ListenConfig {
    /// One-shot listening for the given locale
    pub fn one_shot(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            continuous: false,
            restart_delay: Duration::from_millis(300),
            error_retry_delay: Duration::from_millis(1000),
        }
    }

    /// Hands-free listening that rides out transient recognizer faults
    pub fn continuous(locale: &str) -> Self {
        Self {
            continuous: true,
            ..Self::one_shot(locale)
        }
    }
}

/// Background task that owns the listening contract.
///
/// Starts a recognition session, forwards transcripts to the dispatcher
/// channel and, in continuous mode, restarts listening after each session
/// ends: a short delay after a clean end, a longer one after an error.
/// Recognizer faults never propagate past this task; they are recorded in
/// the session state for client visibility and cleared again once a
/// transcript comes through. Runs until the speech event channel closes.
pub async fn listen_loop_task(
    state: Arc<AppState>,
    recognizer: Arc<dyn SpeechRecognizer>,
    config: ListenConfig,
    mut speech_rx: UnboundedReceiver<SpeechEvent>,
    transcript_tx: UnboundedSender<String>,
) {
    info!("Starting listen loop ({} mode)", if config.continuous { "continuous" } else { "one-shot" });

    if let Err(e) = recognizer.start_listening(&config.locale) {
        warn!("Failed to start listening: {}", e);
        if !config.continuous {
            return;
        }
    }

    while let Some(event) = speech_rx.recv().await {
        match event {
            SpeechEvent::Transcript(text) => {
                debug!("Transcript received: {:?}", text);
                if let Err(e) = state.clear_errors_for("recognition") {
                    warn!("Failed to clear recognition errors: {}", e);
                }
                if let Err(e) = transcript_tx.send(text) {
                    warn!("Failed to forward transcript: {}", e);
                    break;
                }
            }
            SpeechEvent::End => {
                if !config.continuous {
                    debug!("Recognition session ended, one-shot mode done");
                    break;
                }
                sleep(config.restart_delay).await;
                if let Err(e) = recognizer.start_listening(&config.locale) {
                    warn!("Failed to restart listening: {}", e);
                }
            }
            SpeechEvent::Error(e) => {
                // expected with noisy input; retried, never surfaced
                warn!("Recognition error: {}", e);
                if let Err(err) = state.add_error(format!("Speech recognition error: {}", e)) {
                    warn!("Failed to record recognition error: {}", err);
                }
                if !config.continuous {
                    break;
                }
                sleep(config.error_retry_delay).await;
                if let Err(e) = recognizer.start_listening(&config.locale) {
                    warn!("Failed to restart listening after error: {}", e);
                }
            }
        }
    }

    recognizer.stop_listening();
    info!("Listen loop finished");
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tokio::sync::{mpsc, watch};
    use tokio::time::Instant;

    use super::*;
    use crate::services::{ConsoleAnnouncer, InstructionVoice};
    use crate::state::TimerState;

    fn app_state() -> Arc<AppState> {
        let voice = Arc::new(Mutex::new(InstructionVoice::new(Arc::new(ConsoleAnnouncer))));
        let (command_tx, _command_rx) = mpsc::unbounded_channel();
        let (_state_tx, state_rx) = watch::channel(TimerState::new());
        Arc::new(AppState::new(60, command_tx, state_rx, voice))
    }

    #[derive(Default)]
    struct FakeRecognizer {
        starts: Mutex<Vec<(String, Instant)>>,
        stops: Mutex<usize>,
    }

    impl SpeechRecognizer for FakeRecognizer {
        fn start_listening(&self, locale: &str) -> Result<(), String> {
            self.starts.lock().unwrap().push((locale.to_string(), Instant::now()));
            Ok(())
        }

        fn stop_listening(&self) {
            *self.stops.lock().unwrap() += 1;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn transcripts_are_forwarded() {
        let recognizer = Arc::new(FakeRecognizer::default());
        let (speech_tx, speech_rx) = mpsc::unbounded_channel();
        let (transcript_tx, mut transcript_rx) = mpsc::unbounded_channel();

        let state = app_state();
        let task = tokio::spawn(listen_loop_task(
            state.clone(),
            recognizer.clone(),
            ListenConfig::one_shot("pt-BR"),
            speech_rx,
            transcript_tx,
        ));

        speech_tx.send(SpeechEvent::Transcript("feito".to_string())).unwrap();
        assert_eq!(transcript_rx.recv().await, Some("feito".to_string()));

        speech_tx.send(SpeechEvent::End).unwrap();
        task.await.unwrap();

        let starts = recognizer.starts.lock().unwrap();
        assert_eq!(starts.len(), 1);
        assert_eq!(starts[0].0, "pt-BR");
        assert_eq!(*recognizer.stops.lock().unwrap(), 1);
        assert!(state.get_session_state().unwrap().errors.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn continuous_mode_restarts_after_clean_end() {
        let recognizer = Arc::new(FakeRecognizer::default());
        let (speech_tx, speech_rx) = mpsc::unbounded_channel();
        let (transcript_tx, _transcript_rx) = mpsc::unbounded_channel();
        let config = ListenConfig::continuous("pt-BR");
        let restart_delay = config.restart_delay;

        let task = tokio::spawn(listen_loop_task(
            app_state(),
            recognizer.clone(),
            config,
            speech_rx,
            transcript_tx,
        ));

        speech_tx.send(SpeechEvent::End).unwrap();
        drop(speech_tx);
        task.await.unwrap();

        let starts = recognizer.starts.lock().unwrap();
        assert_eq!(starts.len(), 2);
        assert_eq!(starts[1].1 - starts[0].1, restart_delay);
    }

    #[tokio::test(start_paused = true)]
    async fn errors_retry_after_the_longer_delay() {
        let recognizer = Arc::new(FakeRecognizer::default());
        let (speech_tx, speech_rx) = mpsc::unbounded_channel();
        let (transcript_tx, _transcript_rx) = mpsc::unbounded_channel();
        let config = ListenConfig::continuous("pt-BR");
        let error_delay = config.error_retry_delay;
        assert!(error_delay > config.restart_delay);

        let state = app_state();
        let task = tokio::spawn(listen_loop_task(
            state.clone(),
            recognizer.clone(),
            config,
            speech_rx,
            transcript_tx,
        ));

        speech_tx.send(SpeechEvent::Error("no match".to_string())).unwrap();
        drop(speech_tx);
        task.await.unwrap();

        let starts = recognizer.starts.lock().unwrap();
        assert_eq!(starts.len(), 2);
        assert_eq!(starts[1].1 - starts[0].1, error_delay);

        let errors = state.get_session_state().unwrap().errors;
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("no match"));
    }

    #[tokio::test(start_paused = true)]
    async fn transcript_after_error_clears_recognition_errors() {
        let recognizer = Arc::new(FakeRecognizer::default());
        let (speech_tx, speech_rx) = mpsc::unbounded_channel();
        let (transcript_tx, mut transcript_rx) = mpsc::unbounded_channel();

        let state = app_state();
        let task = tokio::spawn(listen_loop_task(
            state.clone(),
            recognizer.clone(),
            ListenConfig::continuous("pt-BR"),
            speech_rx,
            transcript_tx,
        ));

        speech_tx.send(SpeechEvent::Error("no match".to_string())).unwrap();
        speech_tx.send(SpeechEvent::Transcript("feito".to_string())).unwrap();
        assert_eq!(transcript_rx.recv().await, Some("feito".to_string()));
        drop(speech_tx);
        task.await.unwrap();

        assert!(state.get_session_state().unwrap().errors.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn one_shot_mode_stops_on_error() {
        let recognizer = Arc::new(FakeRecognizer::default());
        let (speech_tx, speech_rx) = mpsc::unbounded_channel();
        let (transcript_tx, _transcript_rx) = mpsc::unbounded_channel();

        let state = app_state();
        let task = tokio::spawn(listen_loop_task(
            state.clone(),
            recognizer.clone(),
            ListenConfig::one_shot("pt-BR"),
            speech_rx,
            transcript_tx,
        ));

        speech_tx.send(SpeechEvent::Error("mic unavailable".to_string())).unwrap();
        task.await.unwrap();

        assert_eq!(recognizer.starts.lock().unwrap().len(), 1);
        assert_eq!(*recognizer.stops.lock().unwrap(), 1);

        let errors = state.get_session_state().unwrap().errors;
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("mic unavailable"));
    }
}
