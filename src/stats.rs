//! Operation counters for fragmentation diagnostics.
//!
//! The compaction counters are the primary tuning signal: frequent
//! `l1_compaction` means releases are leaving adjacent runs unmerged
//! (normal), frequent `l2_compaction` means fragmentation is
//! non-adjacent and the pool is paying for byte copies; consider a
//! larger capacity or fewer size classes.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonically increasing operation counters.
///
/// Counters are bumped while the pool lock is held; outside readers may
/// observe stale values and should treat them as eventually consistent.
#[derive(Debug, Default)]
pub struct PoolStats {
    commits: AtomicU64,
    failed_commits: AtomicU64,
    reads: AtomicU64,
    read_locks: AtomicU64,
    l1_compaction: AtomicU64,
    l2_compaction: AtomicU64,
    releases: AtomicU64,
}

impl PoolStats {
    pub(crate) fn record_commit(&self) {
        self.commits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed_commit(&self) {
        self.failed_commits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_read_lock(&self) {
        self.read_locks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_l1_compaction(&self) {
        self.l1_compaction.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_l2_compaction(&self) {
        self.l2_compaction.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_release(&self) {
        self.releases.fetch_add(1, Ordering::Relaxed);
    }

    /// Completed commits.
    pub fn commits(&self) -> u64 {
        self.commits.load(Ordering::Relaxed)
    }

    /// Commits rejected as out of space.
    pub fn failed_commits(&self) -> u64 {
        self.failed_commits.load(Ordering::Relaxed)
    }

    /// Completed reads.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Lock acquisitions by read-path operations.
    ///
    /// Diverges from [`reads`] exactly when a read-path call finds an
    /// unknown handle after acquiring the lock.
    ///
    /// [`reads`]: Self::reads
    pub fn read_locks(&self) -> u64 {
        self.read_locks.load(Ordering::Relaxed)
    }

    /// Tier-1 (coalescing) compactions run.
    pub fn l1_compaction(&self) -> u64 {
        self.l1_compaction.load(Ordering::Relaxed)
    }

    /// Tier-2 (relocating) compactions run.
    pub fn l2_compaction(&self) -> u64 {
        self.l2_compaction.load(Ordering::Relaxed)
    }

    /// Completed releases.
    pub fn releases(&self) -> u64 {
        self.releases.load(Ordering::Relaxed)
    }

    /// Take a point-in-time copy of all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            commits: self.commits(),
            failed_commits: self.failed_commits(),
            reads: self.reads(),
            read_locks: self.read_locks(),
            l1_compaction: self.l1_compaction(),
            l2_compaction: self.l2_compaction(),
            releases: self.releases(),
        }
    }
}

/// Point-in-time copy of the pool counters, suitable for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Completed commits.
    pub commits: u64,
    /// Commits rejected as out of space.
    pub failed_commits: u64,
    /// Completed reads.
    pub reads: u64,
    /// Lock acquisitions by read-path operations.
    pub read_locks: u64,
    /// Tier-1 (coalescing) compactions run.
    pub l1_compaction: u64,
    /// Tier-2 (relocating) compactions run.
    pub l2_compaction: u64,
    /// Completed releases.
    pub releases: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let stats = PoolStats::default();
        stats.record_commit();
        stats.record_commit();
        stats.record_failed_commit();
        stats.record_l1_compaction();

        assert_eq!(stats.commits(), 2);
        assert_eq!(stats.failed_commits(), 1);
        assert_eq!(stats.l1_compaction(), 1);
        assert_eq!(stats.l2_compaction(), 0);
    }

    #[test]
    fn snapshot_is_a_copy() {
        let stats = PoolStats::default();
        stats.record_read_lock();
        stats.record_read();

        let snapshot = stats.snapshot();
        stats.record_read();

        assert_eq!(snapshot.reads, 1);
        assert_eq!(snapshot.read_locks, 1);
        assert_eq!(stats.reads(), 2);
    }

    #[test]
    fn snapshot_serializes() {
        let stats = PoolStats::default();
        stats.record_commit();

        let json = serde_json::to_value(stats.snapshot()).unwrap();
        assert_eq!(json["commits"], 1);
        assert_eq!(json["releases"], 0);
    }
}
