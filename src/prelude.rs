//! Prelude for convenient imports.
//!
//! ```
//! use blobpool::prelude::*;
//! ```

// Core types
pub use crate::types::{BlobHandle, Segment};

// Error handling
pub use crate::error::{PoolError, Result};

// Pool
pub use crate::config::PoolConfig;
pub use crate::pool::MemoryPool;

// Handle sources
pub use crate::handles::{EntropyHandles, HandleSource, SequentialHandles};

// Diagnostics
pub use crate::stats::{PoolStats, StatsSnapshot};
