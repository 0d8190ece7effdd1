//! Rest Coach - A voice-controlled rest-timer engine for workout sessions
//!
//! This is the main entry point for the rest-coach session driver. It wires
//! the countdown engine, the cue fan-out and the listening loop together,
//! reading transcripts from stdin in place of a platform speech recognizer.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use rest_coach::{
    config::Config,
    engine::TimerEngine,
    services::{
        Announcer, ConsoleAnnouncer, ConsoleHaptics, ConsoleRecognizer, Haptics,
        InstructionVoice, SpeechEvent, SpeechRecognizer,
    },
    state::{AppState, TimerState},
    tasks::{cue_task, listen_loop_task, rest_timer_task, ListenConfig},
    utils::{shutdown_signal, SystemClock},
    voice::CommandDispatcher,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("rest_coach={}", config.log_level()))
        .init();

    info!("Starting rest-coach v1.0.0");
    info!(
        "Configuration: rest={}s, locale={}, continuous={}",
        config.rest, config.locale, config.continuous
    );

    if config.rest == 0 {
        tracing::error!("Rest duration must be greater than zero");
        std::process::exit(1);
    }

    // Collaborators: console-backed announcer and haptics
    let announcer: Arc<dyn Announcer> = Arc::new(ConsoleAnnouncer);
    let coach_voice = Arc::new(Mutex::new(InstructionVoice::new(announcer)));
    let haptics: Arc<dyn Haptics> = Arc::new(ConsoleHaptics);

    // Countdown engine and its background tasks
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let engine = TimerEngine::new(Arc::new(SystemClock), event_tx);
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(TimerState::new());
    tokio::spawn(rest_timer_task(engine, command_rx, state_tx));
    tokio::spawn(cue_task(event_rx, haptics, Arc::clone(&coach_voice)));

    // Application state wiring session, timer and announcer together
    let state = Arc::new(AppState::new(
        config.rest,
        command_tx.clone(),
        state_rx,
        Arc::clone(&coach_voice),
    ));

    // Listening loop fed by a stdin reader standing in for the microphone
    let (speech_tx, speech_rx) = mpsc::unbounded_channel();
    let (transcript_tx, mut transcript_rx) = mpsc::unbounded_channel();
    let recognizer: Arc<dyn SpeechRecognizer> = Arc::new(ConsoleRecognizer);
    let listen_config = if config.continuous {
        ListenConfig::continuous(&config.locale)
    } else {
        ListenConfig::one_shot(&config.locale)
    };
    tokio::spawn(listen_loop_task(
        Arc::clone(&state),
        recognizer,
        listen_config,
        speech_rx,
        transcript_tx,
    ));

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }
                    if speech_tx.send(SpeechEvent::Transcript(line)).is_err() {
                        break;
                    }
                }
                Ok(None) => {
                    let _ = speech_tx.send(SpeechEvent::End);
                    break;
                }
                Err(e) => {
                    let _ = speech_tx.send(SpeechEvent::Error(e.to_string()));
                    break;
                }
            }
        }
    });

    if let Err(e) = state.announce("Treino iniciado. Diga 'feito' ao concluir uma série") {
        warn!("Failed to announce session start: {}", e);
    }

    let mut dispatcher = CommandDispatcher::new(
        Arc::clone(&state),
        Arc::clone(&coach_voice),
        command_tx,
    );

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    // Main dispatch loop: route transcripts until the workout finishes,
    // the transcript stream ends, or a shutdown signal arrives
    loop {
        tokio::select! {
            maybe_transcript = transcript_rx.recv() => {
                match maybe_transcript {
                    Some(text) => {
                        dispatcher.dispatch_transcript(&text);
                        match state.get_session_state() {
                            Ok(session) if !session.in_progress() => break,
                            Ok(_) => {}
                            Err(e) => warn!("Failed to read session state: {}", e),
                        }
                    }
                    None => {
                        info!("Transcript stream ended");
                        break;
                    }
                }
            }
            _ = &mut shutdown => break,
        }
    }

    match state.summary() {
        Ok(summary) => println!("{}", serde_json::to_string_pretty(&summary)?),
        Err(e) => warn!("Failed to build session summary: {}", e),
    }

    info!("Session complete");
    Ok(())
}
