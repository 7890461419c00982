//! Cached retrieval of global round statistics.

use chrono::{DateTime, Utc};
use spotai_core::error::{Result, SpotaiError};
use spotai_core::stats::{AggregateRoundStat, CachedStats, StatsCache, aggregate};
use spotai_core::store::RemoteStore;
use std::sync::Arc;
use std::time::Duration;

/// Serves aggregate stats from the local cache while fresh, otherwise from
/// the remote store.
///
/// Never fails: remote errors and timeouts fall back to the last cached value
/// regardless of age, and to an empty list when nothing was ever cached.
#[derive(Clone)]
pub struct StatsService {
    store: Option<Arc<dyn RemoteStore>>,
    cache: Arc<dyn StatsCache>,
    ttl: Duration,
    timeout: Duration,
}

impl StatsService {
    /// Creates a service. `store` is `None` when no backend is configured.
    pub fn new(
        store: Option<Arc<dyn RemoteStore>>,
        cache: Arc<dyn StatsCache>,
        ttl: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            ttl,
            timeout,
        }
    }

    /// Upper bound on one remote read.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn fetch(&self) -> Vec<AggregateRoundStat> {
        self.fetch_at(Utc::now()).await
    }

    /// Same as [`fetch`](Self::fetch) with an explicit notion of "now".
    pub async fn fetch_at(&self, now: DateTime<Utc>) -> Vec<AggregateRoundStat> {
        let cached = self.load_cached().await;
        let ttl = chrono::Duration::from_std(self.ttl).unwrap_or_else(|_| chrono::Duration::days(365));

        if let Some(entry) = &cached
            && entry.is_fresh(now, ttl)
        {
            tracing::debug!(
                "[StatsService] Serving {} cached round stats from {}",
                entry.stats.len(),
                entry.cached_at
            );
            return entry.stats.clone();
        }

        let Some(store) = &self.store else {
            tracing::debug!("[StatsService] No remote store configured");
            return cached.map(|entry| entry.stats).unwrap_or_default();
        };

        match tokio::time::timeout(self.timeout, Self::read_remote(store.as_ref())).await {
            Ok(Ok(stats)) => {
                let entry = CachedStats::new(stats, now);
                if let Err(e) = self.cache.save(&entry).await {
                    tracing::warn!("[StatsService] Failed to refresh stats cache: {}", e);
                }
                entry.stats
            }
            Ok(Err(e)) => self.fall_back(cached, e),
            Err(_) => self.fall_back(
                cached,
                SpotaiError::timeout("fetch round stats", self.timeout),
            ),
        }
    }

    async fn read_remote(store: &dyn RemoteStore) -> Result<Vec<AggregateRoundStat>> {
        match store.fetch_precomputed_stats().await {
            Ok(Some(mut stats)) => {
                if let Some(bad) = stats.iter().find(|s| s.correct_percentage > 100) {
                    tracing::warn!(
                        "[StatsService] Precomputed stats out of range (round {}: {}%), reading raw counters",
                        bad.round_number,
                        bad.correct_percentage
                    );
                } else {
                    stats.sort_by_key(|s| s.round_number);
                    return Ok(stats);
                }
            }
            Ok(None) => {}
            Err(e) => tracing::debug!(
                "[StatsService] Precomputed stats unavailable, reading raw counters: {}",
                e
            ),
        }

        let counters = store.fetch_all_round_counters().await?;
        Ok(aggregate(&counters))
    }

    async fn load_cached(&self) -> Option<CachedStats> {
        match self.cache.load().await {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("[StatsService] Stats cache unreadable, treating as miss: {}", e);
                None
            }
        }
    }

    fn fall_back(&self, cached: Option<CachedStats>, error: SpotaiError) -> Vec<AggregateRoundStat> {
        match cached {
            Some(entry) => {
                tracing::warn!(
                    "[StatsService] Remote stats failed ({}), using cache from {}",
                    error,
                    entry.cached_at
                );
                entry.stats
            }
            None => {
                tracing::warn!("[StatsService] Remote stats failed ({}), no cache available", error);
                Vec::new()
            }
        }
    }
}
