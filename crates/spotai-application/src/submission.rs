//! Best-effort submission of finished games to the remote store.

use chrono::Utc;
use spotai_core::error::Result;
use spotai_core::session::{RoundResult, SessionToken};
use spotai_core::stats::RoundCounters;
use spotai_core::store::{RemoteStore, StatsUpdateMode, UserResultRow};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// What a submission managed to write. Only used for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmissionReport {
    pub rows_inserted: usize,
    pub rounds_updated: usize,
    pub rounds_failed: usize,
}

/// Reports round results and bumps the per-round counters.
///
/// Every remote call is attempted once. Failures are logged and skipped so a
/// broken backend can never hold up the player.
#[derive(Clone)]
pub struct ResultSubmitter {
    store: Arc<dyn RemoteStore>,
    mode: StatsUpdateMode,
}

impl ResultSubmitter {
    pub fn new(store: Arc<dyn RemoteStore>, mode: StatsUpdateMode) -> Self {
        Self { store, mode }
    }

    /// Runs [`submit`](Self::submit) on a background task.
    pub fn spawn(&self, token: SessionToken, results: Vec<RoundResult>) -> JoinHandle<SubmissionReport> {
        let submitter = self.clone();
        tokio::spawn(async move { submitter.submit(token, &results).await })
    }

    pub async fn submit(&self, token: SessionToken, results: &[RoundResult]) -> SubmissionReport {
        let mut report = SubmissionReport::default();
        if results.is_empty() {
            tracing::debug!("[Submission] Session {} has no results to submit", token);
            return report;
        }

        let rows: Vec<UserResultRow> = results
            .iter()
            .map(|result| UserResultRow::from_result(token, result))
            .collect();

        match self.store.insert_user_results(&rows).await {
            Ok(()) => report.rows_inserted = rows.len(),
            Err(e) => tracing::warn!(
                "[Submission] Failed to insert {} result rows for session {}: {}",
                rows.len(),
                token,
                e
            ),
        }

        for result in results {
            match self.update_round(result).await {
                Ok(()) => report.rounds_updated += 1,
                Err(e) => {
                    report.rounds_failed += 1;
                    tracing::warn!(
                        "[Submission] Failed to update stats for round {}: {}",
                        result.round_number,
                        e
                    );
                }
            }
        }

        tracing::info!(
            "[Submission] Session {}: {} rows inserted, {} rounds updated, {} failed",
            token,
            report.rows_inserted,
            report.rounds_updated,
            report.rounds_failed
        );
        report
    }

    async fn update_round(&self, result: &RoundResult) -> Result<()> {
        match self.mode {
            StatsUpdateMode::Atomic => {
                self.store
                    .increment_round_counter(result.round_number, result.is_correct)
                    .await
            }
            StatsUpdateMode::ReadModifyWrite => {
                // Not atomic: a concurrent player can overwrite this increment.
                let current = self
                    .store
                    .fetch_round_counters(result.round_number)
                    .await?
                    .unwrap_or_else(|| RoundCounters::empty(result.round_number));
                let next = current.incremented(result.is_correct, Utc::now());
                self.store.write_round_counters(&next).await
            }
        }
    }
}
