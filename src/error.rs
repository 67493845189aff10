//! Error types for the pool.
//!
//! Every failure mode carries a stable `E###` code in its display string
//! plus the identifiers needed to act on it (requested sizes, the
//! offending handle). Out-of-space is deliberately an ordinary variant:
//! callers are expected to match on it and spill to another tier.

use crate::types::BlobHandle;
use thiserror::Error;

/// The error type for all pool operations.
#[derive(Error, Debug)]
pub enum PoolError {
    /// Pool constructed with a zero capacity.
    #[error("E001: pool capacity must be greater than zero")]
    InvalidCapacity,

    /// The host allocator could not provide the backing buffer.
    #[error("E002: failed to allocate {requested} bytes for the arena")]
    OutOfMemory {
        /// Number of bytes requested from the allocator.
        requested: usize,
    },

    /// A commit could not be serviced even after tier-2 compaction.
    ///
    /// This is routine control flow, not a fault; the pool state is
    /// unchanged apart from the `failed_commits` counter.
    #[error("E003: out of space: requested {requested} bytes, {available} bytes free")]
    OutOfSpace {
        /// Size of the payload that could not be placed.
        requested: usize,
        /// Total free bytes at the time of the failure.
        available: usize,
    },

    /// A read or release named a handle with no live entry.
    ///
    /// Handles are valid from `commit` until the matching release; seeing
    /// this error indicates a bug in the caller.
    #[error("E004: unknown handle {handle}")]
    InvalidHandle {
        /// The handle that was not found in the used map.
        handle: BlobHandle,
    },
}

impl PoolError {
    /// Get the error code (e.g., "E003").
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCapacity => "E001",
            Self::OutOfMemory { .. } => "E002",
            Self::OutOfSpace { .. } => "E003",
            Self::InvalidHandle { .. } => "E004",
        }
    }

    /// Check whether this is the routine out-of-space condition.
    #[must_use]
    pub fn is_out_of_space(&self) -> bool {
        matches!(self, Self::OutOfSpace { .. })
    }
}

/// Result type alias using `PoolError`.
pub type Result<T> = std::result::Result<T, PoolError>;
