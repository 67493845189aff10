//! Handle generation as an injected capability.
//!
//! Keeping handle minting outside the pool makes the pool deterministic
//! in tests (inject [`SequentialHandles`]) while production injects a
//! high-entropy source. The pool depends on nothing about the
//! distribution beyond collision rarity.

use crate::types::BlobHandle;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of fresh 64-bit handles for committed payloads.
///
/// Contract: returned values are drawn from a space large enough that
/// collisions with live handles are negligible for expected working-set
/// sizes. The pool does not check for collisions on insert.
pub trait HandleSource: Send + Sync {
    /// Mint the next handle.
    fn next_handle(&self) -> BlobHandle;
}

/// Handle source backed by the system's entropy.
pub struct EntropyHandles {
    rng: Mutex<StdRng>,
}

impl EntropyHandles {
    /// Create a new entropy-backed source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }
}

impl Default for EntropyHandles {
    fn default() -> Self {
        Self::new()
    }
}

impl HandleSource for EntropyHandles {
    fn next_handle(&self) -> BlobHandle {
        BlobHandle::new(self.rng.lock().r#gen())
    }
}

/// Deterministic handle source for tests: 1, 2, 3, ...
///
/// # Example
///
/// ```
/// use blobpool::handles::{HandleSource, SequentialHandles};
///
/// let source = SequentialHandles::new();
/// assert_eq!(source.next_handle().as_u64(), 1);
/// assert_eq!(source.next_handle().as_u64(), 2);
/// ```
pub struct SequentialHandles {
    next: AtomicU64,
}

impl SequentialHandles {
    /// Create a source that counts up from 1.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Create a source that counts up from `first`.
    #[must_use]
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialHandles {
    fn default() -> Self {
        Self::new()
    }
}

impl HandleSource for SequentialHandles {
    fn next_handle(&self) -> BlobHandle {
        BlobHandle::new(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
