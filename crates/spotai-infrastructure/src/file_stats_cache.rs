//! File-backed stats cache.
//!
//! Stores the two cache entries as JSON files named after their keys inside
//! one directory. Writes go through a temp file + rename so a crash never
//! leaves a half-written entry behind.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use spotai_core::error::Result;
use spotai_core::stats::{
    AggregateRoundStat, CachedStats, STATS_CACHE_KEY, STATS_TIMESTAMP_KEY, StatsCache,
};
use std::path::{Path, PathBuf};

use crate::paths::SpotaiPaths;

/// [`StatsCache`] persisted under a directory on the local device.
pub struct FileStatsCache {
    dir: PathBuf,
}

impl FileStatsCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Uses `~/.cache/spotai/stats`.
    pub fn new_default() -> Result<Self> {
        Ok(Self::new(SpotaiPaths::stats_cache_dir()?))
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Reads and decodes one entry. Missing or undecodable entries are `None`.
    async fn read_entry<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.entry_path(key);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(
                    "[FileStatsCache] Ignoring malformed cache entry {}: {}",
                    path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    async fn write_entry(&self, key: &str, json: String) -> Result<()> {
        let path = self.entry_path(key);
        let tmp_path = temp_path(&path);
        tokio::fs::write(&tmp_path, json).await?;
        tokio::fs::rename(&tmp_path, &path).await?;
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{file_name}.tmp"))
}

#[async_trait]
impl StatsCache for FileStatsCache {
    async fn load(&self) -> Result<Option<CachedStats>> {
        let Some(cached_at) = self.read_entry::<DateTime<Utc>>(STATS_TIMESTAMP_KEY).await? else {
            return Ok(None);
        };
        let Some(stats) = self.read_entry::<Vec<AggregateRoundStat>>(STATS_CACHE_KEY).await? else {
            return Ok(None);
        };
        Ok(Some(CachedStats::new(stats, cached_at)))
    }

    async fn save(&self, entry: &CachedStats) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        // Stats first: a timestamp must never describe older stats than it claims.
        self.write_entry(STATS_CACHE_KEY, serde_json::to_string(&entry.stats)?)
            .await?;
        self.write_entry(STATS_TIMESTAMP_KEY, serde_json::to_string(&entry.cached_at)?)
            .await?;
        tracing::debug!(
            "[FileStatsCache] Cached {} round stats at {}",
            entry.stats.len(),
            entry.cached_at
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn entry() -> CachedStats {
        CachedStats::new(
            vec![
                AggregateRoundStat {
                    round_number: 1,
                    correct_percentage: 64,
                    total_plays: 25,
                },
                AggregateRoundStat {
                    round_number: 2,
                    correct_percentage: 0,
                    total_plays: 0,
                },
            ],
            Utc.with_ymd_and_hms(2025, 4, 3, 12, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let cache = FileStatsCache::new(dir.path().join("stats"));

        cache.save(&entry()).await.unwrap();
        let loaded = cache.load().await.unwrap();

        assert_eq!(loaded, Some(entry()));
        assert!(dir.path().join("stats/round_stats_cache.json").exists());
        assert!(
            dir.path()
                .join("stats/round_stats_cache_timestamp.json")
                .exists()
        );
        assert!(!dir.path().join("stats/.round_stats_cache.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_missing_entries_are_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = FileStatsCache::new(dir.path());
        assert_eq!(cache.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_malformed_entry_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = FileStatsCache::new(dir.path());
        cache.save(&entry()).await.unwrap();

        tokio::fs::write(dir.path().join("round_stats_cache.json"), "{not json")
            .await
            .unwrap();
        assert_eq!(cache.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_timestamp_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = FileStatsCache::new(dir.path());
        cache.save(&entry()).await.unwrap();

        tokio::fs::remove_file(dir.path().join("round_stats_cache_timestamp.json"))
            .await
            .unwrap();
        assert_eq!(cache.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let cache = FileStatsCache::new(dir.path());
        cache.save(&entry()).await.unwrap();

        let newer = CachedStats::new(Vec::new(), entry().cached_at + chrono::Duration::minutes(6));
        cache.save(&newer).await.unwrap();

        assert_eq!(cache.load().await.unwrap(), Some(newer));
    }
}
