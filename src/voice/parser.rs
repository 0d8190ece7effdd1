//! Rule-based voice command parser
//!
//! Local fallback path for mapping transcribed speech to workout commands.
//! Matching is plain substring containment against fixed keyword lists,
//! checked in a fixed priority order; the first category with a hit wins.
//! Transcripts routinely contain extra words ("vamos finalizar o treino"),
//! so containment beats exact matching here.

use tracing::debug;

/// Closed set of actions a transcript can resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceAction {
    /// Record the current set as done and start the rest period
    NextSet,
    /// End the whole workout session
    FinishWorkout,
    /// Pause the rest countdown
    PauseTimer,
    /// Resume a paused rest countdown
    ResumeTimer,
    /// Re-speak the last instruction
    RepeatInstruction,
    /// No keyword matched; expected outcome for ambient speech
    Unknown,
}

/// Category keyword lists. Order is authoritative: when a transcript
/// contains keywords from more than one category, the earliest-listed
/// category wins. Do not reorder.
const NEXT_SET_KEYWORDS: &[&str] = &["próxima", "proxima", "feito", "concluído"];
const FINISH_WORKOUT_KEYWORDS: &[&str] = &["terminar treino", "finalizar", "acabei"];
const PAUSE_KEYWORDS: &[&str] = &["pausar", "pause"];
const RESUME_KEYWORDS: &[&str] = &["retomar", "voltar"];
// "o que" is deliberately loose so "o que é?"-style questions trigger a
// repeat. Known false-positive risk on unrelated transcripts; kept as-is.
const REPEAT_KEYWORDS: &[&str] = &["repetir", "entendi", "instrução", "o que"];

fn matches_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

/// Map a raw transcript to a [`VoiceAction`]
pub fn parse_command(text: &str) -> VoiceAction {
    let text = text.to_lowercase();

    let action = if matches_any(&text, NEXT_SET_KEYWORDS) {
        VoiceAction::NextSet
    } else if matches_any(&text, FINISH_WORKOUT_KEYWORDS) {
        VoiceAction::FinishWorkout
    } else if matches_any(&text, PAUSE_KEYWORDS) {
        VoiceAction::PauseTimer
    } else if matches_any(&text, RESUME_KEYWORDS) {
        VoiceAction::ResumeTimer
    } else if matches_any(&text, REPEAT_KEYWORDS) {
        VoiceAction::RepeatInstruction
    } else {
        VoiceAction::Unknown
    };

    debug!("Parsed transcript {:?} as {:?}", text, action);
    action
}
