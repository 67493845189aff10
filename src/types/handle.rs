//! Opaque handles for committed payloads.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for a committed payload.
///
/// Handles are minted by the pool's injected [`HandleSource`] at commit
/// time and stay valid until the matching release. The pool never
/// re-issues a handle itself; collision defense, if wanted, belongs in
/// the source.
///
/// [`HandleSource`]: crate::handles::HandleSource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlobHandle(u64);

impl BlobHandle {
    /// Create a handle from a raw value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw handle value.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BlobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blob_{:016x}", self.0)
    }
}

impl From<u64> for BlobHandle {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}
