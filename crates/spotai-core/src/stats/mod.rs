//! Cross-player round statistics.

pub mod cache;
pub mod model;

pub use cache::{STATS_CACHE_KEY, STATS_TIMESTAMP_KEY, StatsCache};
pub use model::{AggregateRoundStat, CachedStats, RoundCounters, aggregate, correct_percentage};
