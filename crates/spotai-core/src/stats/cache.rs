//! Local statistics cache trait.

use async_trait::async_trait;

use super::model::CachedStats;
use crate::error::Result;

/// Key of the serialized aggregate stats entry.
pub const STATS_CACHE_KEY: &str = "round_stats_cache";
/// Key of the entry holding the time the stats were cached.
pub const STATS_TIMESTAMP_KEY: &str = "round_stats_cache_timestamp";

/// Device-local storage for the last fetched aggregate stats.
///
/// The cache is a pair of entries ([`STATS_CACHE_KEY`] and
/// [`STATS_TIMESTAMP_KEY`]) that survives across sessions.
///
/// # Implementation Notes
///
/// - A missing entry, or an entry that cannot be decoded, is a cache miss and
///   must be reported as `Ok(None)`.
/// - `Err` is reserved for the storage itself being unusable.
#[async_trait]
pub trait StatsCache: Send + Sync {
    /// Loads the cached stats and their timestamp.
    async fn load(&self) -> Result<Option<CachedStats>>;

    /// Replaces both cache entries.
    async fn save(&self, entry: &CachedStats) -> Result<()>;
}
