//! Aggregate statistics types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cumulative answer counters for one canonical round, as stored remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundCounters {
    pub round_number: u32,
    pub correct_count: u64,
    pub incorrect_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RoundCounters {
    /// Zeroed counters for a round that has never been recorded.
    pub fn empty(round_number: u32) -> Self {
        Self {
            round_number,
            correct_count: 0,
            incorrect_count: 0,
            updated_at: None,
        }
    }

    pub fn total_plays(&self) -> u64 {
        self.correct_count + self.incorrect_count
    }

    /// Returns a copy with one more correct or incorrect answer.
    pub fn incremented(&self, is_correct: bool, at: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        if is_correct {
            next.correct_count += 1;
        } else {
            next.incorrect_count += 1;
        }
        next.updated_at = Some(at);
        next
    }

    pub fn to_aggregate(&self) -> AggregateRoundStat {
        AggregateRoundStat {
            round_number: self.round_number,
            correct_percentage: correct_percentage(self.correct_count, self.incorrect_count),
            total_plays: self.total_plays(),
        }
    }
}

/// Cross-player success rate for one canonical round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRoundStat {
    pub round_number: u32,
    /// Whole percent, 0..=100.
    pub correct_percentage: u8,
    pub total_plays: u64,
}

/// Aggregate stats together with the moment they were fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedStats {
    pub stats: Vec<AggregateRoundStat>,
    pub cached_at: DateTime<Utc>,
}

impl CachedStats {
    pub fn new(stats: Vec<AggregateRoundStat>, cached_at: DateTime<Utc>) -> Self {
        Self { stats, cached_at }
    }

    /// True while `now - cached_at` is below `ttl`.
    ///
    /// A timestamp in the future (clock moved backwards) counts as stale.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        let age = now - self.cached_at;
        age >= chrono::Duration::zero() && age < ttl
    }
}

/// `round(100 * correct / (correct + incorrect))`, 0 when nothing was played.
pub fn correct_percentage(correct: u64, incorrect: u64) -> u8 {
    let total = correct + incorrect;
    if total == 0 {
        return 0;
    }
    ((correct as f64 * 100.0) / total as f64).round() as u8
}

/// Converts raw counter rows into aggregate stats ordered by round number.
pub fn aggregate(counters: &[RoundCounters]) -> Vec<AggregateRoundStat> {
    let mut stats: Vec<AggregateRoundStat> =
        counters.iter().map(RoundCounters::to_aggregate).collect();
    stats.sort_by_key(|s| s.round_number);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_percentage_without_plays_is_zero() {
        assert_eq!(correct_percentage(0, 0), 0);
        assert_eq!(RoundCounters::empty(3).to_aggregate().correct_percentage, 0);
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(correct_percentage(1, 2), 33);
        assert_eq!(correct_percentage(2, 1), 67);
        assert_eq!(correct_percentage(1, 1), 50);
        assert_eq!(correct_percentage(5, 0), 100);
        assert_eq!(correct_percentage(0, 4), 0);
    }

    #[test]
    fn test_incremented() {
        let at = Utc.with_ymd_and_hms(2025, 4, 3, 12, 0, 0).unwrap();
        let counters = RoundCounters::empty(1)
            .incremented(true, at)
            .incremented(false, at)
            .incremented(true, at);
        assert_eq!(counters.correct_count, 2);
        assert_eq!(counters.incorrect_count, 1);
        assert_eq!(counters.updated_at, Some(at));
        assert_eq!(counters.total_plays(), 3);
    }

    #[test]
    fn test_aggregate_sorted_by_round() {
        let rows = vec![
            RoundCounters {
                round_number: 2,
                correct_count: 3,
                incorrect_count: 1,
                updated_at: None,
            },
            RoundCounters {
                round_number: 1,
                correct_count: 0,
                incorrect_count: 0,
                updated_at: None,
            },
        ];
        let stats = aggregate(&rows);
        assert_eq!(stats[0].round_number, 1);
        assert_eq!(stats[0].correct_percentage, 0);
        assert_eq!(stats[1].correct_percentage, 75);
        assert_eq!(stats[1].total_plays, 4);
    }

    #[test]
    fn test_cache_freshness() {
        let cached_at = Utc.with_ymd_and_hms(2025, 4, 3, 12, 0, 0).unwrap();
        let entry = CachedStats::new(Vec::new(), cached_at);
        let ttl = chrono::Duration::minutes(5);

        assert!(entry.is_fresh(cached_at, ttl));
        assert!(entry.is_fresh(cached_at + chrono::Duration::seconds(299), ttl));
        assert!(!entry.is_fresh(cached_at + chrono::Duration::minutes(5), ttl));
        assert!(!entry.is_fresh(cached_at - chrono::Duration::seconds(1), ttl));
    }
}
