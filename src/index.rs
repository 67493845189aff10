//! Free and used segment bookkeeping.
//!
//! The index tracks two populations: an ordered sequence of free
//! segments (ordering by start is only re-established by tier-1
//! coalescing) and a handle-keyed map of used segments. Byte totals for
//! both are maintained incrementally so the allocator's cheap
//! upper-bound check is O(1).

use crate::types::{BlobHandle, Segment};
use std::collections::HashMap;

pub(crate) struct SegmentIndex {
    /// Free segments, unsorted between compactions. Released segments
    /// and take-remainders are appended at the end.
    free: Vec<Segment>,
    /// Used segments keyed by handle.
    used: HashMap<BlobHandle, Segment>,
    /// Sum of free segment lengths.
    free_bytes: usize,
}

impl SegmentIndex {
    /// Create an index covering `[0, capacity)` as one free run.
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            free: vec![Segment::new(0, capacity)],
            used: HashMap::new(),
            free_bytes: capacity,
        }
    }

    pub(crate) fn free_bytes(&self) -> usize {
        self.free_bytes
    }

    pub(crate) fn used_count(&self) -> usize {
        self.used.len()
    }

    #[cfg(test)]
    pub(crate) fn free_segments(&self) -> &[Segment] {
        &self.free
    }

    /// First-fit scan: position of the first free segment with
    /// `len >= n`, or `None`.
    pub(crate) fn find_free_fit(&self, n: usize) -> Option<usize> {
        self.free.iter().position(|seg| seg.len >= n)
    }

    /// Remove the free segment at `index`, carving `n` bytes off its
    /// front. A non-empty remainder is re-appended at the end of the
    /// free sequence. Returns the start of the carved range.
    pub(crate) fn take(&mut self, index: usize, n: usize) -> usize {
        let seg = self.free.remove(index);
        debug_assert!(seg.len >= n);
        if seg.len > n {
            self.free.push(Segment::new(seg.start + n, seg.len - n));
        }
        self.free_bytes -= n;
        seg.start
    }

    /// Append a released segment to the free sequence, unsorted.
    ///
    /// Merging with neighbours is deferred to [`coalesce`], keeping
    /// release O(1). Zero-length segments are dropped on the spot.
    ///
    /// [`coalesce`]: Self::coalesce
    pub(crate) fn release(&mut self, seg: Segment) {
        if seg.is_empty() {
            return;
        }
        self.free_bytes += seg.len;
        self.free.push(seg);
    }

    pub(crate) fn record_used(&mut self, handle: BlobHandle, seg: Segment) {
        self.used.insert(handle, seg);
    }

    pub(crate) fn drop_used(&mut self, handle: BlobHandle) -> Option<Segment> {
        self.used.remove(&handle)
    }

    pub(crate) fn get_used(&self, handle: BlobHandle) -> Option<Segment> {
        self.used.get(&handle).copied()
    }

    /// Tier-1 compaction: sort the free sequence by start and merge
    /// every pair of adjacent runs. No payload bytes move. Zero-length
    /// entries are pruned before merging. Returns the number of
    /// segments merged away.
    pub(crate) fn coalesce(&mut self) -> usize {
        self.free.retain(|seg| !seg.is_empty());
        let before = self.free.len();
        self.free.sort_unstable_by_key(|seg| seg.start);

        let mut merged: Vec<Segment> = Vec::with_capacity(self.free.len());
        for seg in self.free.drain(..) {
            if let Some(last) = merged.last_mut() {
                if last.abuts(&seg) {
                    last.len += seg.len;
                    continue;
                }
            }
            merged.push(seg);
        }
        self.free = merged;
        before - self.free.len()
    }

    /// Snapshot of `(handle, segment)` pairs sorted by start.
    ///
    /// Tier-2 relocation iterates this snapshot rather than the map
    /// itself so start rewrites cannot disturb the walk.
    pub(crate) fn used_sorted_by_start(&self) -> Vec<(BlobHandle, Segment)> {
        let mut entries: Vec<_> = self.used.iter().map(|(h, s)| (*h, *s)).collect();
        entries.sort_unstable_by_key(|(_, seg)| seg.start);
        entries
    }

    /// Rewrite a used segment's start in place. The handle and length
    /// are unchanged.
    pub(crate) fn set_used_start(&mut self, handle: BlobHandle, start: usize) {
        if let Some(seg) = self.used.get_mut(&handle) {
            seg.start = start;
        }
    }

    /// Replace the free sequence wholesale after tier-2 relocation.
    ///
    /// Relocation conserves bytes, so the new sequence must sum to the
    /// current free total.
    pub(crate) fn reset_free(&mut self, free: Vec<Segment>) {
        debug_assert_eq!(
            free.iter().map(|seg| seg.len).sum::<usize>(),
            self.free_bytes
        );
        self.free = free;
    }
}
