/*!
 * Streaming size statistics
 *
 * Both accumulators are plain values folded one entry at a time, so memory
 * stays constant however many entries a bucket holds.
 */

use crate::listing::EntryRecord;
use serde::Serialize;

/// Running count, sum, min and max over a stream of sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningStats {
    count: u64,
    sum: u128,
    min: u64,
    max: u64,
}

impl Default for RunningStats {
    fn default() -> Self {
        Self {
            count: 0,
            sum: 0,
            min: u64::MAX,
            max: 0,
        }
    }
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one more size
    #[must_use]
    pub fn fold(self, size: u64) -> Self {
        Self {
            count: self.count + 1,
            sum: self.sum + size as u128,
            min: self.min.min(size),
            max: self.max.max(size),
        }
    }

    /// Combine two disjoint streams
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            count: self.count + other.count,
            sum: self.sum + other.sum,
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn sum(&self) -> u128 {
        self.sum
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn min(&self) -> Option<u64> {
        (!self.is_empty()).then_some(self.min)
    }

    pub fn max(&self) -> Option<u64> {
        (!self.is_empty()).then_some(self.max)
    }

    /// Integer mean, truncated toward zero
    pub fn mean(&self) -> Option<u128> {
        (!self.is_empty()).then(|| self.sum / self.count as u128)
    }
}

/// Statistics for a whole bucket listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketStats {
    /// Every entry, including delete markers
    pub all: RunningStats,
    /// Delete markers plus versions that are not the latest
    pub noncurrent: RunningStats,
    pub delete_markers: u64,
}

impl BucketStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn fold(self, entry: &EntryRecord) -> Self {
        let mut next = self;
        next.all = next.all.fold(entry.size);
        if entry.is_delete_marker() {
            next.delete_markers += 1;
        }
        if entry.is_noncurrent() {
            next.noncurrent = next.noncurrent.fold(entry.size);
        }
        next
    }

    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            all: self.all.merge(other.all),
            noncurrent: self.noncurrent.merge(other.noncurrent),
            delete_markers: self.delete_markers + other.delete_markers,
        }
    }

    /// Bytes held by the latest version of each key
    pub fn current_bytes(&self) -> u128 {
        self.all.sum() - self.noncurrent.sum()
    }

    pub fn noncurrent_bytes(&self) -> u128 {
        self.noncurrent.sum()
    }

    /// Serializable snapshot with `None` for undefined values
    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            count: self.all.count(),
            total_bytes: self.all.sum(),
            min_bytes: self.all.min(),
            max_bytes: self.all.max(),
            mean_bytes: self.all.mean(),
            noncurrent_count: self.noncurrent.count(),
            noncurrent_bytes: self.noncurrent_bytes(),
            current_bytes: self.current_bytes(),
            delete_markers: self.delete_markers,
        }
    }
}

/// Flat view of [`BucketStats`] for JSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSummary {
    pub count: u64,
    pub total_bytes: u128,
    pub min_bytes: Option<u64>,
    pub max_bytes: Option<u64>,
    pub mean_bytes: Option<u128>,
    pub noncurrent_count: u64,
    pub noncurrent_bytes: u128,
    pub current_bytes: u128,
    pub delete_markers: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold_all(sizes: &[u64]) -> RunningStats {
        sizes.iter().fold(RunningStats::new(), |s, &n| s.fold(n))
    }

    #[test]
    fn test_running_stats_basic() {
        let stats = fold_all(&[10, 20, 30]);
        assert_eq!(stats.count(), 3);
        assert_eq!(stats.sum(), 60);
        assert_eq!(stats.min(), Some(10));
        assert_eq!(stats.max(), Some(30));
        assert_eq!(stats.mean(), Some(20));
    }

    #[test]
    fn test_empty_stats_are_undefined() {
        let stats = RunningStats::new();
        assert!(stats.is_empty());
        assert_eq!(stats.min(), None);
        assert_eq!(stats.max(), None);
        assert_eq!(stats.mean(), None);
        assert_eq!(stats.sum(), 0);
    }

    #[test]
    fn test_first_size_wins_min_and_max() {
        let stats = RunningStats::new().fold(0);
        assert_eq!(stats.min(), Some(0));
        assert_eq!(stats.max(), Some(0));

        let stats = RunningStats::new().fold(u64::MAX);
        assert_eq!(stats.min(), Some(u64::MAX));
        assert_eq!(stats.max(), Some(u64::MAX));
    }

    #[test]
    fn test_mean_truncates() {
        assert_eq!(fold_all(&[1, 2]).mean(), Some(1));
        assert_eq!(fold_all(&[7, 7, 8]).mean(), Some(7));
    }

    #[test]
    fn test_sum_does_not_overflow_u64() {
        let stats = fold_all(&[u64::MAX, u64::MAX, 2]);
        assert_eq!(stats.sum(), 2 * u64::MAX as u128 + 2);
    }

    #[test]
    fn test_merge_matches_single_stream() {
        let sizes = [5, 1, 9, 3, 3, 12, 0, 7];
        let whole = fold_all(&sizes);

        for split in 0..=sizes.len() {
            let (a, b) = sizes.split_at(split);
            assert_eq!(fold_all(a).merge(fold_all(b)), whole, "split at {}", split);
        }
    }

    #[test]
    fn test_merge_is_associative() {
        let a = fold_all(&[4, 8]);
        let b = fold_all(&[]);
        let c = fold_all(&[1, 100, 50]);
        assert_eq!(a.merge(b).merge(c), a.merge(b.merge(c)));
        assert_eq!(a.merge(c), c.merge(a));
    }

    #[test]
    fn test_bucket_stats_classification() {
        let entries = [
            EntryRecord::version("a", 10, Some("1".to_string()), true),
            EntryRecord::version("a", 5, Some("0".to_string()), false),
            EntryRecord::delete_marker("b", Some("2".to_string()), true),
            EntryRecord::version("b", 7, Some("1".to_string()), false),
        ];
        let stats = entries.iter().fold(BucketStats::new(), |s, e| s.fold(e));

        assert_eq!(stats.all.count(), 4);
        assert_eq!(stats.all.sum(), 22);
        assert_eq!(stats.noncurrent.count(), 3);
        assert_eq!(stats.noncurrent.sum(), 12);
        assert_eq!(stats.delete_markers, 1);
        assert_eq!(stats.current_bytes(), 10);
    }

    #[test]
    fn test_object_entries_only_touch_all() {
        let stats = BucketStats::new()
            .fold(&EntryRecord::object("x", 10))
            .fold(&EntryRecord::object("y", 20));
        assert_eq!(stats.all.count(), 2);
        assert!(stats.noncurrent.is_empty());
        assert_eq!(stats.delete_markers, 0);
        assert_eq!(stats.current_bytes(), 30);
    }

    #[test]
    fn test_fold_is_not_idempotent() {
        let entry = EntryRecord::object("x", 10);
        let once = BucketStats::new().fold(&entry);
        let twice = once.fold(&entry);
        assert_ne!(once, twice);
        assert_eq!(twice.all.count(), 2);
    }

    #[test]
    fn test_summary_of_empty_bucket() {
        let summary = BucketStats::new().summary();
        assert_eq!(summary.count, 0);
        assert_eq!(summary.min_bytes, None);
        assert_eq!(summary.mean_bytes, None);
        assert_eq!(summary.current_bytes, 0);
    }
}
