//! Buffer pool configuration

use serde::{Deserialize, Serialize};

use crate::error::{PoolError, Result};

/// Configuration for a buffer pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Name of the buffer pool
    pub name: String,
    /// Size of each buffer in bytes
    pub buffer_size: usize,
    /// Number of buffers to create and free-list at pool creation
    pub preallocate: u32,
    /// Maximum number of buffers the pool may ever hold (0 = unlimited)
    pub max_buffers: u32,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            buffer_size: 4096,
            preallocate: 0,
            max_buffers: 0,
        }
    }
}

impl PoolConfig {
    /// Create a new configuration with a custom name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set buffer size
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Set the preallocation count
    pub fn with_preallocate(mut self, count: u32) -> Self {
        self.preallocate = count;
        self
    }

    /// Set the maximum buffer count (0 = unlimited)
    pub fn with_max_buffers(mut self, count: u32) -> Self {
        self.max_buffers = count;
        self
    }

    /// Validate the configuration
    ///
    /// All creation preconditions are enforced here and reported as
    /// [`PoolError::InvalidConfiguration`]; bad caller configuration never
    /// panics.
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(PoolError::invalid_configuration(
                "buffer_size",
                "buffer size cannot be zero",
            ));
        }

        if self.max_buffers != 0 && self.preallocate > self.max_buffers {
            return Err(PoolError::invalid_configuration(
                "preallocate",
                format!(
                    "preallocation count {} exceeds max buffers {}",
                    self.preallocate, self.max_buffers
                ),
            ));
        }

        Ok(())
    }
}

/// Builder pattern for buffer pool configuration
pub struct PoolConfigBuilder {
    config: PoolConfig,
}

impl PoolConfigBuilder {
    /// Create a new builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            config: PoolConfig::new(name),
        }
    }

    /// Set buffer size
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.config.buffer_size = size;
        self
    }

    /// Set preallocation count
    pub fn preallocate(mut self, count: u32) -> Self {
        self.config.preallocate = count;
        self
    }

    /// Set maximum buffer count
    pub fn max_buffers(mut self, count: u32) -> Self {
        self.config.max_buffers = count;
        self
    }

    /// Remove the buffer count ceiling
    pub fn unlimited(mut self) -> Self {
        self.config.max_buffers = 0;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<PoolConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
