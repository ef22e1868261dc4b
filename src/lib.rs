//! # bufpool - Fixed-Size Buffer Pool Allocator
//!
//! bufpool manages pools of equally-sized byte buffers on top of the global
//! allocator, reusing released buffers through a per-pool free list instead
//! of returning them to the allocator, with an optional hard ceiling on how
//! many buffers a pool may ever hold concurrently. It targets long-running
//! or resource-constrained programs that repeatedly need same-sized buffers
//! and want to avoid allocation churn and fragmentation.
//!
//! ## Features
//!
//! - **Free-list reuse**: released buffers are handed out again before the
//!   backing allocator is consulted
//! - **Growth limits**: per-pool buffer ceiling, with distinct
//!   out-of-buffers and out-of-memory accounting
//! - **Validated handles**: every buffer carries a `{pool, token, slot,
//!   generation}` handle checked at release; cross-pool, stale, or forged
//!   returns are refused and logged instead of corrupting a free list
//! - **Purge**: return all free-listed buffers to the backing allocator
//!   while leaving checked-out buffers untouched
//! - **Registry**: an explicit registry object creates pools, routes
//!   releases by pool id, and enumerates pools for stats dumps
//! - **Thread-safe**: pool state sits behind a per-pool mutex; pools and
//!   the registry can be shared across worker threads
//!
//! ## Example
//!
//! ```
//! use bufpool::{PoolConfig, PoolRegistry};
//!
//! let registry = PoolRegistry::new();
//! let pool = registry
//!     .create_pool(PoolConfig::new("packets").with_buffer_size(1500).with_max_buffers(64))
//!     .unwrap();
//!
//! let mut buffer = pool.calloc().unwrap();
//! buffer.as_mut_slice()[..4].copy_from_slice(b"ping");
//! pool.release(buffer).unwrap();
//!
//! assert_eq!(pool.stats().free_buffers, 1);
//! ```

pub mod buffer;
pub mod config;
pub mod error;
pub mod pool;
pub mod registry;
pub mod stats;

// Main API re-exports
pub use buffer::{BufferHandle, PooledBuffer};
pub use config::{PoolConfig, PoolConfigBuilder};
pub use error::{HandleFault, PoolError, Result};
pub use pool::{BufferPool, PoolId};
pub use registry::PoolRegistry;
pub use stats::PoolStats;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
