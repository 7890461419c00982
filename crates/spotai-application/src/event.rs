use spotai_core::deck::Side;
use spotai_core::session::{ChoiceOutcome, TickOutcome};

/// Everything that can drive a [`GameController`](crate::GameController).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Countdown tick from the timer started for game `epoch`.
    Tick { epoch: u64 },
    /// Leave the landing screen.
    Start,
    /// The player picked a clip.
    Choose(Side),
    /// Play again.
    Reset,
}

/// What the controller did in response to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameUpdate {
    Started,
    Answered(ChoiceOutcome),
    Ticked(TickOutcome),
    Reset,
}

impl GameUpdate {
    /// True when this update moved the game into its results screen.
    pub fn completed_game(&self) -> bool {
        match self {
            GameUpdate::Answered(outcome) => outcome.completed,
            GameUpdate::Ticked(TickOutcome::Expired) => true,
            _ => false,
        }
    }
}
