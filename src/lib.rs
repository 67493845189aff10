//! Fixed-capacity byte pool with two-tier compaction.
//!
//! `blobpool` stores opaque binary payloads (serialized pages, spilled
//! fragments) inside a single pre-allocated arena and returns opaque
//! handles by which payloads are read back or released. It bounds and
//! amortizes the cost of many small allocations in a data-processing
//! pipeline; the hard part is keeping variable-sized commits serviceable
//! as free space scatters.
//!
//! # Key Components
//!
//! - **Pool**: `commit`/`read`/`release` under a single mutex,
//!   linearizable from any number of threads
//! - **Two-tier compactor**: cheap coalescing of adjacent free runs
//!   first, payload relocation only when fragmentation is non-adjacent
//! - **Handles**: opaque 64-bit identifiers minted by an injected
//!   source, deterministic in tests
//! - **Stats**: monotonic counters exposing how often each compaction
//!   tier fires
//!
//! # Example
//!
//! ```
//! use blobpool::{MemoryPool, PoolError};
//!
//! let pool = MemoryPool::new(1 << 20)?;
//!
//! let handle = pool.commit(b"intermediate result bytes")?;
//! let bytes = pool.read(handle)?;
//! assert_eq!(bytes, b"intermediate result bytes");
//!
//! pool.release(handle)?;
//! # Ok::<(), PoolError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod arena;
mod compaction;
mod index;

pub mod config;
pub mod error;
pub mod handles;
pub mod pool;
pub mod prelude;
pub mod stats;
pub mod types;

// Re-export key types at crate root for convenience
pub use config::PoolConfig;
pub use error::{PoolError, Result};
pub use handles::{EntropyHandles, HandleSource, SequentialHandles};
pub use pool::MemoryPool;
pub use stats::{PoolStats, StatsSnapshot};
pub use types::{BlobHandle, Segment};
