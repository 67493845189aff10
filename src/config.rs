//! Pool configuration.

use serde::{Deserialize, Serialize};

/// Default pool capacity: 8 MB.
pub const DEFAULT_POOL_CAPACITY: usize = 8 * 1024 * 1024;

/// Default diagnostic name for a pool.
pub const DEFAULT_POOL_NAME: &str = "Memory Pool";

/// Configuration for pool creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Arena capacity in bytes, fixed for the pool's lifetime.
    pub capacity: usize,
    /// Diagnostic name, surfaced in log events and `Debug` output.
    pub name: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_POOL_CAPACITY,
            name: DEFAULT_POOL_NAME.to_string(),
        }
    }
}

impl PoolConfig {
    /// Create config with custom capacity.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Create config with a custom diagnostic name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PoolConfig::default();
        assert_eq!(config.capacity, DEFAULT_POOL_CAPACITY);
        assert_eq!(config.name, "Memory Pool");
    }

    #[test]
    fn builder_methods() {
        let config = PoolConfig::default()
            .with_capacity(1024)
            .with_name("ReadBuffer <taxi>");
        assert_eq!(config.capacity, 1024);
        assert_eq!(config.name, "ReadBuffer <taxi>");
    }
}
