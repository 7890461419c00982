//! Round state machine.

use rand::Rng;
use std::time::{Duration, Instant};

use super::model::{
    ChoiceOutcome, CompletionReason, GamePhase, Mistake, RoundResult, SessionToken, TickOutcome,
};
use crate::deck::{PlayOrder, RoundDeck, Side, VideoPair};
use crate::error::{Result, SpotaiError};

/// Per-game tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Countdown budget for the whole game.
    pub round_seconds: u32,
    /// Window after an accepted choice during which further choices are rejected.
    pub choice_lock: Duration,
    /// Present the deck in a random order each time a game starts.
    pub shuffle: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            round_seconds: 180,
            choice_lock: Duration::from_millis(50),
            shuffle: true,
        }
    }
}

/// State of a single playthrough.
///
/// Transitions: `NotStarted -> InProgress -> Complete`, and `reset` from any
/// phase back to `NotStarted` with a fresh [`SessionToken`].
#[derive(Debug, Clone)]
pub struct GameSession {
    deck: RoundDeck,
    settings: SessionSettings,
    token: SessionToken,
    phase: GamePhase,
    order: PlayOrder,
    /// 0-based play position; never exceeds `order.len() - 1`.
    current_round: usize,
    score: u32,
    remaining_secs: u32,
    mistakes: Vec<Mistake>,
    results: Vec<RoundResult>,
    locked_until: Option<Instant>,
    completion: Option<CompletionReason>,
}

impl GameSession {
    pub fn new(deck: RoundDeck, settings: SessionSettings) -> Self {
        let order = PlayOrder::identity(deck.len());
        Self {
            deck,
            settings,
            token: SessionToken::generate(),
            phase: GamePhase::NotStarted,
            order,
            current_round: 0,
            score: 0,
            remaining_secs: settings.round_seconds,
            mistakes: Vec::new(),
            results: Vec::new(),
            locked_until: None,
            completion: None,
        }
    }

    /// Starts the game using the thread-local RNG for shuffling.
    pub fn start(&mut self) -> Result<()> {
        self.start_with_rng(&mut rand::thread_rng())
    }

    /// Starts the game, shuffling the play order with `rng` if enabled.
    pub fn start_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        if self.phase != GamePhase::NotStarted {
            return Err(SpotaiError::invalid_phase("start", self.phase));
        }

        self.order = if self.settings.shuffle {
            PlayOrder::shuffled(self.deck.len(), rng)
        } else {
            PlayOrder::identity(self.deck.len())
        };
        self.remaining_secs = self.settings.round_seconds;
        self.phase = GamePhase::InProgress;

        tracing::debug!(
            "[GameSession] Started session {} with {} rounds and {}s",
            self.token,
            self.deck.len(),
            self.remaining_secs
        );
        Ok(())
    }

    /// Records the player's pick for the current round.
    ///
    /// Rejected outside `InProgress` and while the processing lock from the
    /// previous choice is still held at `now`.
    pub fn submit_choice(&mut self, side: Side, now: Instant) -> Result<ChoiceOutcome> {
        if self.phase != GamePhase::InProgress {
            return Err(SpotaiError::invalid_phase("choose", self.phase));
        }

        let deck_index = self.order.deck_index(self.current_round).ok_or_else(|| {
            SpotaiError::internal(format!("round {} outside deck", self.current_round))
        })?;
        let round_number = (deck_index + 1) as u32;
        if self.locked_until.is_some_and(|until| now < until) {
            return Err(SpotaiError::ChoiceLocked { round_number });
        }

        let pair = self
            .deck
            .get(deck_index)
            .ok_or_else(|| SpotaiError::internal(format!("deck index {deck_index} missing")))?;

        let chosen = pair.clip(side);
        let result = RoundResult {
            round_number,
            is_correct: chosen.is_ai_generated,
        };

        if result.is_correct {
            self.score += 1;
        } else {
            self.mistakes.push(Mistake {
                round_number: result.round_number,
                chosen_clip_uri: chosen.uri.clone(),
                correct_clip_uri: pair.clip(pair.ai_side()).uri.clone(),
            });
        }
        self.results.push(result);
        self.locked_until = Some(now + self.settings.choice_lock);

        let completed = self.current_round + 1 >= self.order.len();
        if completed {
            self.complete(CompletionReason::AllRoundsAnswered);
        } else {
            self.current_round += 1;
        }

        Ok(ChoiceOutcome { result, completed })
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != GamePhase::InProgress {
            return TickOutcome::Ignored;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.complete(CompletionReason::TimeUp);
            TickOutcome::Expired
        } else {
            TickOutcome::Running {
                remaining_secs: self.remaining_secs,
            }
        }
    }

    /// Clears all per-session state and issues a new token.
    pub fn reset(&mut self) {
        let previous = self.token;
        *self = Self::new(self.deck.clone(), self.settings);
        tracing::debug!(
            "[GameSession] Reset session {} -> {}",
            previous,
            self.token
        );
    }

    fn complete(&mut self, reason: CompletionReason) {
        self.phase = GamePhase::Complete;
        self.completion = Some(reason);
        tracing::debug!(
            "[GameSession] Session {} complete ({:?}): {}/{}",
            self.token,
            reason,
            self.score,
            self.total_rounds()
        );
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn current_round(&self) -> usize {
        self.current_round
    }

    pub fn total_rounds(&self) -> usize {
        self.deck.len()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn mistakes(&self) -> &[Mistake] {
        &self.mistakes
    }

    pub fn results(&self) -> &[RoundResult] {
        &self.results
    }

    pub fn completion(&self) -> Option<CompletionReason> {
        self.completion
    }

    pub fn deck(&self) -> &RoundDeck {
        &self.deck
    }

    /// Rounds that never received a choice.
    pub fn unanswered_rounds(&self) -> usize {
        self.total_rounds() - self.results.len()
    }

    /// The pair on screen, only while the game is in progress.
    pub fn current_pair(&self) -> Option<&VideoPair> {
        if self.phase != GamePhase::InProgress {
            return None;
        }
        self.order
            .deck_index(self.current_round)
            .and_then(|index| self.deck.get(index))
    }
}
