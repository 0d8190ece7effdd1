//! End-to-end session flow tests: voice transcripts driving the rest timer
//! through the dispatcher, application state and the timer task.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, watch};

use rest_coach::engine::{TimerEngine, TimerEvent};
use rest_coach::services::{Announcer, InstructionVoice, NOTHING_TO_REPEAT_PHRASE};
use rest_coach::state::{AppState, TimerState};
use rest_coach::tasks::{rest_timer_task, TimerCommand};
use rest_coach::utils::clock::testing::ManualClock;
use rest_coach::voice::CommandDispatcher;

#[derive(Default)]
struct RecordingAnnouncer {
    spoken: Mutex<Vec<(String, bool)>>,
}

impl Announcer for RecordingAnnouncer {
    fn speak(&self, text: &str, priority: bool) {
        self.spoken.lock().unwrap().push((text.to_string(), priority));
    }

    fn stop_speaking(&self) {}
}

struct Harness {
    dispatcher: CommandDispatcher<Arc<AppState>>,
    state: Arc<AppState>,
    announcer: Arc<RecordingAnnouncer>,
    clock: Arc<ManualClock>,
    command_tx: mpsc::UnboundedSender<TimerCommand>,
    state_rx: watch::Receiver<TimerState>,
    event_rx: mpsc::UnboundedReceiver<TimerEvent>,
}

impl Harness {
    fn new(rest_seconds: u64) -> Self {
        let clock = Arc::new(ManualClock::new());
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let engine = TimerEngine::new(clock.clone(), event_tx);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(TimerState::new());
        tokio::spawn(rest_timer_task(engine, command_rx, state_tx));

        let announcer = Arc::new(RecordingAnnouncer::default());
        let voice = Arc::new(Mutex::new(InstructionVoice::new(announcer.clone())));

        let state = Arc::new(AppState::new(
            rest_seconds,
            command_tx.clone(),
            state_rx.clone(),
            voice.clone(),
        ));
        let dispatcher = CommandDispatcher::new(Arc::clone(&state), voice, command_tx.clone());

        Self {
            dispatcher,
            state,
            announcer,
            clock,
            command_tx,
            state_rx,
            event_rx,
        }
    }

    /// Dispatch a transcript and wait for the timer task to publish the
    /// state it produced, so assertions never race the command.
    async fn say(&mut self, transcript: &str) {
        self.dispatcher.dispatch_transcript(transcript);
        self.state_rx.changed().await.unwrap();
    }

    /// Send a raw timer command and wait for its published state
    async fn command(&mut self, command: TimerCommand) {
        self.command_tx.send(command).unwrap();
        self.state_rx.changed().await.unwrap();
    }

    /// Advance paused time second by second, waiting for each tick
    async fn run_ticks(&mut self, secs: u64) {
        for _ in 0..secs {
            tokio::time::advance(Duration::from_secs(1)).await;
            self.state_rx.changed().await.unwrap();
        }
    }

    fn timer(&self) -> TimerState {
        self.state_rx.borrow().clone()
    }

    fn finishes(&mut self) -> usize {
        let mut count = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            if event == TimerEvent::Finished {
                count += 1;
            }
        }
        count
    }
}

#[tokio::test(start_paused = true)]
async fn completing_a_set_starts_the_rest_countdown() {
    let mut harness = Harness::new(60);

    harness.say("feito").await;

    let timer = harness.timer();
    assert_eq!(timer.time_left_seconds, 60);
    assert_eq!(timer.total_seconds, 60);
    assert!(timer.active);

    let session = harness.state.get_session_state().unwrap();
    assert_eq!(session.sets_completed, 1);
    assert_eq!(session.current_set, 2);

    // one simulated second later the countdown shows 59
    harness.run_ticks(1).await;
    assert_eq!(harness.timer().time_left_seconds, 59);
}

#[tokio::test(start_paused = true)]
async fn pause_and_resume_by_voice_keep_remaining_time() {
    let mut harness = Harness::new(60);

    harness.say("feito").await;
    harness.run_ticks(10).await;

    harness.say("pausar").await;
    let paused = harness.timer();
    assert!(!paused.active);
    assert_eq!(paused.time_left_seconds, 50);

    // time passing while paused changes nothing
    tokio::time::advance(Duration::from_secs(20)).await;
    assert_eq!(harness.timer().time_left_seconds, 50);

    harness.say("voltar").await;
    harness.run_ticks(5).await;
    assert_eq!(harness.timer().time_left_seconds, 45);
}

#[tokio::test(start_paused = true)]
async fn finishing_the_workout_stops_the_timer() {
    let mut harness = Harness::new(60);

    harness.say("feito").await;
    harness.run_ticks(3).await;
    harness.say("vamos finalizar o treino, acabei").await;

    let timer = harness.timer();
    assert_eq!(timer.time_left_seconds, 0);
    assert!(!timer.active);

    let session = harness.state.get_session_state().unwrap();
    assert!(session.finished);
    // stopping early is not a completion
    assert_eq!(harness.finishes(), 0);
}

#[tokio::test(start_paused = true)]
async fn background_gap_collapses_countdown_to_completion_once() {
    let mut harness = Harness::new(60);

    harness.command(TimerCommand::Start(10)).await;
    harness.command(TimerCommand::EnterBackground).await;

    harness.clock.advance_secs(15);
    harness.command(TimerCommand::EnterForeground).await;

    let timer = harness.timer();
    assert_eq!(timer.time_left_seconds, 0);
    assert!(!timer.active);
    assert_eq!(harness.finishes(), 1);

    // the next scheduled second must not re-trigger completion
    tokio::time::advance(Duration::from_secs(2)).await;
    assert_eq!(harness.finishes(), 0);
}

#[tokio::test(start_paused = true)]
async fn background_gap_shorter_than_countdown_just_subtracts() {
    let mut harness = Harness::new(60);

    harness.command(TimerCommand::Start(60)).await;
    harness.command(TimerCommand::EnterBackground).await;

    harness.clock.advance_secs(25);
    harness.command(TimerCommand::EnterForeground).await;

    let timer = harness.timer();
    assert_eq!(timer.time_left_seconds, 35);
    assert!(timer.active);

    harness.run_ticks(1).await;
    assert_eq!(harness.timer().time_left_seconds, 34);
}

#[tokio::test(start_paused = true)]
async fn backgrounded_countdown_does_not_tick() {
    let mut harness = Harness::new(60);

    harness.command(TimerCommand::Start(60)).await;
    harness.command(TimerCommand::EnterBackground).await;

    // scheduler time and wall-clock time both advance across the gap;
    // only the reconciliation subtraction may account for it
    tokio::time::advance(Duration::from_secs(10)).await;
    harness.clock.advance_secs(10);
    harness.command(TimerCommand::EnterForeground).await;

    let timer = harness.timer();
    assert_eq!(timer.time_left_seconds, 50);
    assert!(timer.active);

    harness.run_ticks(1).await;
    assert_eq!(harness.timer().time_left_seconds, 49);
}

#[tokio::test(start_paused = true)]
async fn subtract_clamps_remaining_and_total_separately() {
    let mut harness = Harness::new(60);

    harness.command(TimerCommand::Start(60)).await;
    harness.command(TimerCommand::AddTime(20)).await;
    harness.run_ticks(30).await;
    // 50 left of an 80-second total
    assert_eq!(harness.timer().time_left_seconds, 50);
    assert_eq!(harness.timer().total_seconds, 80);

    harness.command(TimerCommand::SubtractTime(70)).await;
    let timer = harness.timer();
    assert_eq!(timer.time_left_seconds, 0);
    assert_eq!(timer.total_seconds, 10);
    assert!(!timer.active);
    assert_eq!(harness.finishes(), 1);
}

#[tokio::test(start_paused = true)]
async fn repeat_replays_the_set_announcement() {
    let mut harness = Harness::new(90);

    harness.say("feito").await;
    harness.dispatcher.dispatch_transcript("repetir");

    let spoken = harness.announcer.spoken.lock().unwrap();
    let (text, priority) = spoken.last().unwrap();
    assert_eq!(text, "Série 1 concluída. Descanse 90 segundos");
    assert!(priority);
}

#[tokio::test(start_paused = true)]
async fn repeat_before_any_instruction_speaks_fallback() {
    let mut harness = Harness::new(60);

    harness.dispatcher.dispatch_transcript("repetir");

    let spoken = harness.announcer.spoken.lock().unwrap();
    assert_eq!(
        spoken.as_slice(),
        &[(NOTHING_TO_REPEAT_PHRASE.to_string(), false)]
    );
}

#[tokio::test(start_paused = true)]
async fn ambient_speech_is_ignored() {
    let mut harness = Harness::new(60);

    harness.dispatcher.dispatch_transcript("blablabla");

    assert!(!harness.timer().active);
    let session = harness.state.get_session_state().unwrap();
    assert_eq!(session.sets_completed, 0);
    assert!(session.in_progress());
}
