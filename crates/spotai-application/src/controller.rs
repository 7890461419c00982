//! Game session controller.
//!
//! Owns the [`GameSession`] and everything with a lifetime tied to it: the
//! countdown task, the background submission and the stats fetch triggered
//! when a game completes. The fetch runs after the submission so the stats
//! shown (and cached) include the game just played.

use rand::Rng;
use spotai_core::deck::Side;
use spotai_core::error::Result;
use spotai_core::session::{ChoiceOutcome, GamePhase, GameSession, TickOutcome};
use spotai_core::stats::AggregateRoundStat;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;
use tokio::task::JoinError;

use crate::event::{GameEvent, GameUpdate};
use crate::stats_service::StatsService;
use crate::submission::{ResultSubmitter, SubmissionReport};
use crate::timer::CountdownTimer;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Drives one player's games.
///
/// The controller is meant to be owned by a single event loop: ticks arrive
/// on the channel passed to [`GameController::new`] and are fed back through
/// [`handle_event`](Self::handle_event) along with player input.
pub struct GameController {
    session: GameSession,
    submitter: Option<ResultSubmitter>,
    stats: StatsService,
    events: UnboundedSender<GameEvent>,
    timer: Option<CountdownTimer>,
    epoch: u64,
    submission: Option<oneshot::Receiver<SubmissionReport>>,
    stats_fetch: Option<oneshot::Receiver<Vec<AggregateRoundStat>>>,
}

impl GameController {
    /// Creates a controller. `submitter` is `None` when results are not reported.
    pub fn new(
        session: GameSession,
        submitter: Option<ResultSubmitter>,
        stats: StatsService,
        events: UnboundedSender<GameEvent>,
    ) -> Self {
        Self {
            session,
            submitter,
            stats,
            events,
            timer: None,
            epoch: 0,
            submission: None,
            stats_fetch: None,
        }
    }

    pub fn handle_event(&mut self, event: GameEvent) -> Result<GameUpdate> {
        match event {
            GameEvent::Tick { epoch } => Ok(GameUpdate::Ticked(self.on_tick(epoch))),
            GameEvent::Start => self.start().map(|()| GameUpdate::Started),
            GameEvent::Choose(side) => self.choose(side).map(GameUpdate::Answered),
            GameEvent::Reset => {
                self.reset();
                Ok(GameUpdate::Reset)
            }
        }
    }

    pub fn start(&mut self) -> Result<()> {
        self.start_with_rng(&mut rand::thread_rng())
    }

    pub fn start_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        self.session.start_with_rng(rng)?;
        self.epoch += 1;
        self.timer = Some(CountdownTimer::spawn(
            self.epoch,
            TICK_PERIOD,
            self.events.clone(),
        ));
        tracing::info!(
            "[GameController] Game started: session {}, {} rounds, {}s",
            self.session.token(),
            self.session.total_rounds(),
            self.session.remaining_secs()
        );
        Ok(())
    }

    pub fn choose(&mut self, side: Side) -> Result<ChoiceOutcome> {
        self.choose_at(side, Instant::now())
    }

    /// Records a choice as if it happened at `now`.
    pub fn choose_at(&mut self, side: Side, now: Instant) -> Result<ChoiceOutcome> {
        let outcome = self.session.submit_choice(side, now)?;
        tracing::debug!(
            "[GameController] Round {} answered {:?}: {}",
            outcome.result.round_number,
            side,
            if outcome.result.is_correct { "correct" } else { "wrong" }
        );
        if outcome.completed {
            self.finish();
        }
        Ok(outcome)
    }

    /// Applies a countdown tick. Ticks from a previous game's timer are ignored.
    pub fn on_tick(&mut self, epoch: u64) -> TickOutcome {
        if epoch != self.epoch || self.timer.is_none() {
            tracing::trace!(
                "[GameController] Ignoring stale tick (epoch {}, current {})",
                epoch,
                self.epoch
            );
            return TickOutcome::Ignored;
        }

        let outcome = self.session.tick();
        if outcome == TickOutcome::Expired {
            tracing::info!("[GameController] Time is up");
            self.finish();
        }
        outcome
    }

    /// Returns to the landing screen with a fresh session.
    ///
    /// A submission already running for the previous game keeps going in the
    /// background.
    pub fn reset(&mut self) {
        self.stop_timer();
        self.stats_fetch = None;
        self.submission = None;
        self.session.reset();
    }

    fn finish(&mut self) {
        self.stop_timer();

        tracing::info!(
            "[GameController] Game complete: {}/{} ({} unanswered)",
            self.session.score(),
            self.session.total_rounds(),
            self.session.unanswered_rounds()
        );

        let stats = self.stats.clone();
        let (stats_tx, stats_rx) = oneshot::channel();
        self.stats_fetch = Some(stats_rx);

        let Some(submitter) = &self.submitter else {
            tracing::debug!("[GameController] No remote store configured, results not submitted");
            tokio::spawn(async move {
                let _ = stats_tx.send(stats.fetch().await);
            });
            return;
        };

        let mut submission =
            submitter.spawn(self.session.token(), self.session.results().to_vec());
        let (report_tx, report_rx) = oneshot::channel();
        self.submission = Some(report_rx);
        let wait = stats.timeout();

        tokio::spawn(async move {
            match tokio::time::timeout(wait, &mut submission).await {
                Ok(joined) => {
                    forward_report(joined, report_tx);
                    let _ = stats_tx.send(stats.fetch().await);
                }
                Err(_) => {
                    tracing::warn!(
                        "[GameController] Submission still running after {:?}, fetching stats anyway",
                        wait
                    );
                    let _ = stats_tx.send(stats.fetch().await);
                    forward_report(submission.await, report_tx);
                }
            }
        });
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    /// Global stats for the results screen.
    ///
    /// Waits for the fetch started at completion if there is one; otherwise
    /// fetches now (cache permitting).
    pub async fn global_stats(&mut self) -> Vec<AggregateRoundStat> {
        match self.stats_fetch.take() {
            Some(pending) => pending.await.unwrap_or_else(|_| {
                tracing::warn!("[GameController] Stats fetch task ended without a result");
                Vec::new()
            }),
            None => self.stats.fetch().await,
        }
    }

    /// Waits for the background submission of the last completed game.
    pub async fn wait_for_submission(&mut self) -> Option<SubmissionReport> {
        let pending = self.submission.take()?;
        pending.await.ok()
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase()
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

fn forward_report(
    joined: std::result::Result<SubmissionReport, JoinError>,
    tx: oneshot::Sender<SubmissionReport>,
) {
    match joined {
        Ok(report) => {
            let _ = tx.send(report);
        }
        Err(e) => tracing::warn!("[GameController] Submission task failed: {}", e),
    }
}
