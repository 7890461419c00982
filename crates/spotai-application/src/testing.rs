//! In-memory fakes shared by the application tests.

use async_trait::async_trait;
use spotai_core::error::{Result, SpotaiError};
use spotai_core::stats::{AggregateRoundStat, CachedStats, RoundCounters, StatsCache};
use spotai_core::store::{RemoteStore, UserResultRow};
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Row store kept in memory, with switches for injecting failures.
#[derive(Default)]
pub struct FakeStore {
    pub rows: Mutex<Vec<UserResultRow>>,
    pub counters: Mutex<BTreeMap<u32, RoundCounters>>,
    pub precomputed: Mutex<Option<Vec<AggregateRoundStat>>>,
    pub fail_insert: Mutex<bool>,
    pub fail_reads: Mutex<bool>,
    pub failing_rounds: Mutex<HashSet<u32>>,
    pub read_delay: Mutex<Option<Duration>>,
    /// Added to every call.
    pub latency: Mutex<Option<Duration>>,
    pub insert_delay: Mutex<Option<Duration>>,
    pub bulk_reads: AtomicUsize,
    pub atomic_increments: AtomicUsize,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_counters(counters: Vec<RoundCounters>) -> Self {
        let store = Self::new();
        {
            let mut map = store.counters.lock().unwrap();
            for c in counters {
                map.insert(c.round_number, c);
            }
        }
        store
    }

    pub fn counters_for(&self, round_number: u32) -> Option<RoundCounters> {
        self.counters.lock().unwrap().get(&round_number).cloned()
    }

    pub fn bulk_read_count(&self) -> usize {
        self.bulk_reads.load(Ordering::SeqCst)
    }

    pub fn set_fail_reads(&self, fail: bool) {
        *self.fail_reads.lock().unwrap() = fail;
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = Some(latency);
    }

    async fn network(&self, extra: Option<Duration>) {
        let latency = *self.latency.lock().unwrap();
        for delay in [latency, extra].into_iter().flatten() {
            tokio::time::sleep(delay).await;
        }
    }

    fn check_round(&self, round_number: u32) -> Result<()> {
        if self.failing_rounds.lock().unwrap().contains(&round_number) {
            return Err(SpotaiError::remote(500, format!("round {round_number} unavailable")));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for FakeStore {
    async fn insert_user_results(&self, rows: &[UserResultRow]) -> Result<()> {
        let extra = *self.insert_delay.lock().unwrap();
        self.network(extra).await;
        if *self.fail_insert.lock().unwrap() {
            return Err(SpotaiError::data_access("connection refused"));
        }
        self.rows.lock().unwrap().extend_from_slice(rows);
        Ok(())
    }

    async fn fetch_round_counters(&self, round_number: u32) -> Result<Option<RoundCounters>> {
        self.network(None).await;
        self.check_round(round_number)?;
        Ok(self.counters_for(round_number))
    }

    async fn write_round_counters(&self, counters: &RoundCounters) -> Result<()> {
        self.network(None).await;
        self.check_round(counters.round_number)?;
        self.counters
            .lock()
            .unwrap()
            .insert(counters.round_number, counters.clone());
        Ok(())
    }

    async fn fetch_all_round_counters(&self) -> Result<Vec<RoundCounters>> {
        self.bulk_reads.fetch_add(1, Ordering::SeqCst);
        let extra = *self.read_delay.lock().unwrap();
        self.network(extra).await;
        if *self.fail_reads.lock().unwrap() {
            return Err(SpotaiError::remote(503, "service unavailable"));
        }
        Ok(self.counters.lock().unwrap().values().cloned().collect())
    }

    async fn fetch_precomputed_stats(&self) -> Result<Option<Vec<AggregateRoundStat>>> {
        self.network(None).await;
        Ok(self.precomputed.lock().unwrap().clone())
    }

    async fn increment_round_counter(&self, round_number: u32, is_correct: bool) -> Result<()> {
        self.network(None).await;
        self.check_round(round_number)?;
        self.atomic_increments.fetch_add(1, Ordering::SeqCst);
        let mut map = self.counters.lock().unwrap();
        let current = map
            .get(&round_number)
            .cloned()
            .unwrap_or_else(|| RoundCounters::empty(round_number));
        map.insert(
            round_number,
            current.incremented(is_correct, chrono::Utc::now()),
        );
        Ok(())
    }
}

/// Stats cache kept in memory.
#[derive(Default)]
pub struct MemoryCache {
    pub entry: Mutex<Option<CachedStats>>,
    pub fail_load: Mutex<bool>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(entry: CachedStats) -> Self {
        let cache = Self::new();
        *cache.entry.lock().unwrap() = Some(entry);
        cache
    }

    pub fn current(&self) -> Option<CachedStats> {
        self.entry.lock().unwrap().clone()
    }
}

#[async_trait]
impl StatsCache for MemoryCache {
    async fn load(&self) -> Result<Option<CachedStats>> {
        if *self.fail_load.lock().unwrap() {
            return Err(SpotaiError::io("cache directory unreadable"));
        }
        Ok(self.current())
    }

    async fn save(&self, entry: &CachedStats) -> Result<()> {
        *self.entry.lock().unwrap() = Some(entry.clone());
        Ok(())
    }
}
