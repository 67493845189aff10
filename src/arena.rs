//! The fixed byte buffer backing the pool.
//!
//! The arena is a dumb backing store: it owns the bytes and exposes the
//! offset-addressed copies the allocator needs, nothing else. All
//! bookkeeping lives in the segment index.

use crate::error::{PoolError, Result};

/// Fixed-capacity byte buffer.
///
/// Backed by a boxed slice rather than a growable container so payload
/// addresses stay valid for the pool's lifetime.
pub(crate) struct Arena {
    buf: Box<[u8]>,
}

impl Arena {
    /// Allocate an arena of exactly `capacity` bytes.
    ///
    /// Allocation failure surfaces as [`PoolError::OutOfMemory`] instead
    /// of aborting the process.
    pub(crate) fn new(capacity: usize) -> Result<Self> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(capacity)
            .map_err(|_| PoolError::OutOfMemory {
                requested: capacity,
            })?;
        buf.resize(capacity, 0);
        Ok(Self {
            buf: buf.into_boxed_slice(),
        })
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Copy `data` into the arena at `start`.
    ///
    /// Callers guarantee `start + data.len() <= capacity`.
    pub(crate) fn write(&mut self, start: usize, data: &[u8]) {
        debug_assert!(start + data.len() <= self.buf.len());
        self.buf[start..start + data.len()].copy_from_slice(data);
    }

    /// Borrow `len` bytes starting at `start`.
    pub(crate) fn read(&self, start: usize, len: usize) -> &[u8] {
        debug_assert!(start + len <= self.buf.len());
        &self.buf[start..start + len]
    }

    /// Move `len` bytes from `src` to `dst` within the arena.
    ///
    /// Overlap is fine; relocation only ever moves payloads toward lower
    /// addresses.
    pub(crate) fn shift(&mut self, src: usize, dst: usize, len: usize) {
        debug_assert!(src + len <= self.buf.len());
        debug_assert!(dst + len <= self.buf.len());
        self.buf.copy_within(src..src + len, dst);
    }
}
