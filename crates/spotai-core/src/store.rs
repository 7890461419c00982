//! Remote store trait.
//!
//! Defines the request/response row store the game reports results to and
//! reads global statistics from.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpotaiError};
use crate::session::{RoundResult, SessionToken};
use crate::stats::{AggregateRoundStat, RoundCounters};

/// One row of the "user results" collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResultRow {
    pub session_id: SessionToken,
    pub round_number: u32,
    pub is_correct: bool,
}

impl UserResultRow {
    pub fn from_result(session_id: SessionToken, result: &RoundResult) -> Self {
        Self {
            session_id,
            round_number: result.round_number,
            is_correct: result.is_correct,
        }
    }
}

/// How per-round counters are bumped after a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsUpdateMode {
    /// Read the counters, increment locally, write them back. Racy under
    /// concurrent players; lost updates are tolerated.
    #[default]
    ReadModifyWrite,
    /// Ask the store to increment server-side in one call.
    Atomic,
}

/// An abstract remote row store.
///
/// Decouples the game from the concrete backend so tests can substitute an
/// in-memory fake. Every call is independent; callers treat all failures as
/// non-fatal.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Inserts rows into the "user results" collection.
    async fn insert_user_results(&self, rows: &[UserResultRow]) -> Result<()>;

    /// Reads the counters of one round.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(counters))`: Row exists
    /// - `Ok(None)`: Round has never been recorded
    /// - `Err(_)`: Transport or backend failure
    async fn fetch_round_counters(&self, round_number: u32) -> Result<Option<RoundCounters>>;

    /// Writes (inserts or replaces) the counters of one round.
    async fn write_round_counters(&self, counters: &RoundCounters) -> Result<()>;

    /// Reads the counters of every recorded round.
    async fn fetch_all_round_counters(&self) -> Result<Vec<RoundCounters>>;

    /// Reads percentages computed server-side, if the backend offers them.
    ///
    /// `Ok(None)` means the backend has no such endpoint and the caller should
    /// aggregate raw counters instead.
    async fn fetch_precomputed_stats(&self) -> Result<Option<Vec<AggregateRoundStat>>> {
        Ok(None)
    }

    /// Increments one counter server-side in a single atomic call.
    async fn increment_round_counter(&self, round_number: u32, is_correct: bool) -> Result<()> {
        let _ = (round_number, is_correct);
        Err(SpotaiError::config(
            "remote store does not support atomic increments",
        ))
    }
}
