//! The memory pool: commit, read, and release over a fixed arena.
//!
//! # Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Arena (capacity bytes, fixed at construction)                │
//! │ ┌────────┬──────┬────────────┬──────┬──────────────────────┐ │
//! │ │ used   │ free │ used       │ free │ used                 │ │
//! │ └────────┴──────┴────────────┴──────┴──────────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//!      ▲ handle-keyed     ▲ ordered free sequence,
//!        used map           unsorted between compactions
//! ```
//!
//! A commit is served by first-fit over the free sequence. When no
//! single run fits, the allocator coalesces adjacent free runs (tier-1)
//! and, failing that, relocates every payload to the low end (tier-2)
//! so all free space becomes one run. A commit only fails when the free
//! total itself is too small.

use crate::arena::Arena;
use crate::compaction;
use crate::config::PoolConfig;
use crate::error::{PoolError, Result};
use crate::handles::{EntropyHandles, HandleSource};
use crate::index::SegmentIndex;
use crate::stats::PoolStats;
use crate::types::{BlobHandle, Segment};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// State protected by the pool lock.
///
/// Compaction invariants span both fields, so the lock scope always
/// covers whole operations, never just index updates.
struct PoolInner {
    arena: Arena,
    index: SegmentIndex,
}

/// Fixed-capacity pool of opaque byte payloads.
///
/// The pool stores committed byte slices inside a single pre-allocated
/// arena and hands back opaque [`BlobHandle`]s. All operations are safe
/// to call from any number of threads; a single mutex serializes them,
/// so every caller observes a linearizable history.
///
/// # Example
///
/// ```
/// use blobpool::{MemoryPool, PoolError};
///
/// let pool = MemoryPool::new(1024)?;
///
/// let handle = pool.commit(b"serialized page")?;
/// assert_eq!(pool.read(handle)?, b"serialized page");
/// assert_eq!(pool.available_space(), 1024 - 15);
///
/// pool.release(handle)?;
/// assert_eq!(pool.available_space(), 1024);
/// # Ok::<(), PoolError>(())
/// ```
///
/// Out-of-space is routine control flow, not a fault:
///
/// ```
/// use blobpool::{MemoryPool, PoolError};
///
/// let pool = MemoryPool::new(8)?;
/// let _held = pool.commit(b"occupies")?;
///
/// match pool.commit(b"overflow") {
///     Err(err) if err.is_out_of_space() => { /* spill to another tier */ }
///     other => panic!("expected out-of-space, got {:?}", other.map(|_| ())),
/// }
/// # Ok::<(), PoolError>(())
/// ```
pub struct MemoryPool {
    inner: Mutex<PoolInner>,
    stats: PoolStats,
    /// Mirror of the free total, maintained under the lock so
    /// `available_space` never has to take it.
    free_space: AtomicUsize,
    handles: Arc<dyn HandleSource>,
    capacity: usize,
    name: String,
}

impl MemoryPool {
    /// Create a pool with the given capacity, the default name, and an
    /// entropy-backed handle source.
    ///
    /// # Errors
    /// Returns [`PoolError::InvalidCapacity`] for a zero capacity and
    /// [`PoolError::OutOfMemory`] when the backing buffer cannot be
    /// allocated.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(PoolConfig::default().with_capacity(capacity))
    }

    /// Create a pool from a configuration, with an entropy-backed
    /// handle source.
    pub fn with_config(config: PoolConfig) -> Result<Self> {
        Self::with_handle_source(config, Arc::new(EntropyHandles::new()))
    }

    /// Create a pool with an injected handle source.
    ///
    /// Inject [`SequentialHandles`] to make commits deterministic in
    /// tests.
    ///
    /// [`SequentialHandles`]: crate::handles::SequentialHandles
    pub fn with_handle_source(config: PoolConfig, handles: Arc<dyn HandleSource>) -> Result<Self> {
        if config.capacity == 0 {
            return Err(PoolError::InvalidCapacity);
        }
        let arena = Arena::new(config.capacity)?;
        let index = SegmentIndex::new(config.capacity);
        Ok(Self {
            inner: Mutex::new(PoolInner { arena, index }),
            stats: PoolStats::default(),
            free_space: AtomicUsize::new(config.capacity),
            handles,
            capacity: config.capacity,
            name: config.name,
        })
    }

    /// Arena capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Diagnostic name given at construction.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Operation counters.
    #[must_use]
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    /// Sum of free-segment lengths.
    ///
    /// Reads an atomic mirror without taking the lock, so a value
    /// observed concurrently with mutations may be stale. Diagnostics
    /// only.
    #[must_use]
    pub fn available_space(&self) -> usize {
        self.free_space.load(Ordering::Acquire)
    }

    /// Number of live handles.
    #[must_use]
    pub fn used_entries(&self) -> usize {
        self.inner.lock().index.used_count()
    }

    /// Store a copy of `data` in the pool and return a fresh handle.
    ///
    /// An empty slice consumes no arena bytes and always succeeds, even
    /// on a full pool.
    ///
    /// # Errors
    /// Returns [`PoolError::OutOfSpace`] when no placement exists even
    /// after tier-2 compaction; the pool state is unchanged and
    /// `failed_commits` is incremented. A payload larger than the whole
    /// arena fails up front without invoking compaction.
    pub fn commit(&self, data: &[u8]) -> Result<BlobHandle> {
        let n = data.len();
        if n > self.capacity {
            self.stats.record_failed_commit();
            return Err(PoolError::OutOfSpace {
                requested: n,
                available: self.available_space(),
            });
        }

        let mut inner = self.inner.lock();

        if n == 0 {
            let handle = self.handles.next_handle();
            inner.index.record_used(handle, Segment::new(0, 0));
            self.stats.record_commit();
            return Ok(handle);
        }

        let Some(start) = self.find_or_make_room(&mut inner, n) else {
            let available = inner.index.free_bytes();
            self.stats.record_failed_commit();
            tracing::debug!(
                pool = %self.name,
                requested = n,
                available,
                "commit rejected, free total too small"
            );
            return Err(PoolError::OutOfSpace {
                requested: n,
                available,
            });
        };

        inner.arena.write(start, data);
        let handle = self.handles.next_handle();
        inner.index.record_used(handle, Segment::new(start, n));
        self.stats.record_commit();
        self.publish_free_space(&inner);
        Ok(handle)
    }

    /// Read back a committed payload as a fresh copy.
    ///
    /// Copies, never views: a later tier-2 compaction cannot invalidate
    /// what the caller holds.
    ///
    /// # Errors
    /// Returns [`PoolError::InvalidHandle`] for a handle with no live
    /// entry.
    pub fn read(&self, handle: BlobHandle) -> Result<Vec<u8>> {
        let inner = self.inner.lock();
        self.stats.record_read_lock();
        let seg = inner
            .index
            .get_used(handle)
            .ok_or(PoolError::InvalidHandle { handle })?;
        let bytes = inner.arena.read(seg.start, seg.len).to_vec();
        self.stats.record_read();
        Ok(bytes)
    }

    /// Read back a payload and release its handle in one critical
    /// section.
    ///
    /// Equivalent to `read` followed by `release`, but with a single
    /// lock acquisition; the consumer drain path of a reader pipeline
    /// wants exactly this.
    ///
    /// # Errors
    /// Returns [`PoolError::InvalidHandle`] for a handle with no live
    /// entry; nothing is released in that case.
    pub fn read_and_release(&self, handle: BlobHandle) -> Result<Vec<u8>> {
        let mut inner = self.inner.lock();
        self.stats.record_read_lock();
        let seg = inner
            .index
            .drop_used(handle)
            .ok_or(PoolError::InvalidHandle { handle })?;
        let bytes = inner.arena.read(seg.start, seg.len).to_vec();
        inner.index.release(seg);
        self.stats.record_read();
        self.stats.record_release();
        self.publish_free_space(&inner);
        Ok(bytes)
    }

    /// Release a handle, returning its bytes to the free sequence.
    ///
    /// O(1): the freed segment is appended unsorted; merging with
    /// neighbours is deferred until a commit cannot be served.
    ///
    /// # Errors
    /// Returns [`PoolError::InvalidHandle`] for a handle with no live
    /// entry, including a handle that was already released.
    pub fn release(&self, handle: BlobHandle) -> Result<()> {
        let mut inner = self.inner.lock();
        let seg = inner
            .index
            .drop_used(handle)
            .ok_or(PoolError::InvalidHandle { handle })?;
        inner.index.release(seg);
        self.stats.record_release();
        self.publish_free_space(&inner);
        Ok(())
    }

    /// Find a free run of `n` bytes, manufacturing one by compaction if
    /// needed. Returns the start of the carved range, or `None` when
    /// the free total itself is smaller than `n`.
    fn find_or_make_room(&self, inner: &mut PoolInner, n: usize) -> Option<usize> {
        // Fast path: first fit over the free sequence as-is.
        if let Some(at) = inner.index.find_free_fit(n) {
            return Some(inner.index.take(at, n));
        }

        // Cheap upper bound: compaction cannot conjure bytes.
        if inner.index.free_bytes() < n {
            return None;
        }

        // Tier-1: merge adjacent free runs, no payload movement.
        let merged = inner.index.coalesce();
        self.stats.record_l1_compaction();
        tracing::debug!(pool = %self.name, merged, "tier-1 compaction");
        if let Some(at) = inner.index.find_free_fit(n) {
            return Some(inner.index.take(at, n));
        }

        // Tier-2: relocate payloads so all free space becomes one run.
        let summary = compaction::relocate(&mut inner.index, &mut inner.arena);
        self.stats.record_l2_compaction();
        tracing::debug!(
            pool = %self.name,
            moved = summary.moved,
            free_after = summary.free_after,
            "tier-2 compaction"
        );
        inner
            .index
            .find_free_fit(n)
            .map(|at| inner.index.take(at, n))
    }

    fn publish_free_space(&self, inner: &PoolInner) {
        self.free_space
            .store(inner.index.free_bytes(), Ordering::Release);
    }
}

impl fmt::Debug for MemoryPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryPool")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("available", &self.available_space())
            .finish()
    }
}
