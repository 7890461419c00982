//! Session data types.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle of one playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Waiting on the landing screen.
    NotStarted,
    /// Rounds are being played and the countdown is running.
    InProgress,
    /// All rounds answered or time ran out.
    Complete,
}

/// Opaque per-playthrough identifier used to group submitted results.
///
/// Not an authentication credential and never persisted locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(Uuid);

impl SessionToken {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Outcome of one answered round, keyed by the canonical round number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    /// 1-based position of the pair in the canonical deck.
    pub round_number: u32,
    pub is_correct: bool,
}

/// A wrong answer kept for the end-of-game review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mistake {
    pub round_number: u32,
    pub chosen_clip_uri: String,
    pub correct_clip_uri: String,
}

/// Why a session reached [`GamePhase::Complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    AllRoundsAnswered,
    TimeUp,
}

/// What happened when a choice was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOutcome {
    pub result: RoundResult,
    /// Set when this choice finished the game.
    pub completed: bool,
}

/// What happened when the countdown ticked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Time left after the decrement.
    Running { remaining_secs: u32 },
    /// The countdown reached zero and the game is now complete.
    Expired,
    /// The session was not in progress; nothing changed.
    Ignored,
}
