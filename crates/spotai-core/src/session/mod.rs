//! Game session domain.
//!
//! [`GameSession`] is the synchronous round state machine. It knows nothing
//! about timers or the network; the application layer feeds it ticks and
//! choices and reacts to the transitions it reports.

mod model;
mod state;

pub use model::{
    ChoiceOutcome, CompletionReason, GamePhase, Mistake, RoundResult, SessionToken, TickOutcome,
};
pub use state::{GameSession, SessionSettings};
