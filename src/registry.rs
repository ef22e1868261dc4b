//! Registry of buffer pools for creation, routing, and diagnostics

use std::{
    collections::HashMap,
    fmt::Write as _,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc, RwLock,
    },
};

use rand::Rng;
use tracing::{error, info};

use crate::{
    buffer::PooledBuffer,
    config::PoolConfig,
    error::{PoolError, Result},
    pool::{BufferPool, PoolId},
};

/// Registry owning every created [`BufferPool`]
///
/// An explicit object rather than process-global state: the embedding
/// program creates one (typically at subsystem init, alive for the
/// program's duration), creates pools through it, and uses it to route
/// releases by pool id and to enumerate pools for diagnostics.
#[derive(Debug)]
pub struct PoolRegistry {
    /// Registered pools by id
    pools: RwLock<HashMap<PoolId, Arc<BufferPool>>>,
    /// Next available pool id
    next_pool_id: AtomicU32,
}

impl PoolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            pools: RwLock::new(HashMap::new()),
            next_pool_id: AtomicU32::new(1),
        }
    }

    /// Create a buffer pool and register it
    ///
    /// Validates the configuration, assigns a fresh pool id and a random
    /// per-pool token, and best-effort preallocates `config.preallocate`
    /// buffers.
    pub fn create_pool(&self, config: PoolConfig) -> Result<Arc<BufferPool>> {
        let pool_id = self.next_pool_id.fetch_add(1, Ordering::SeqCst);
        let token = rand::thread_rng().gen::<u64>();

        let pool = Arc::new(BufferPool::new(pool_id, token, config)?);

        let mut pools = self.pools.write().unwrap();
        pools.insert(pool_id, Arc::clone(&pool));

        info!(
            pool = %pool.name(),
            pool_id,
            buffer_size = pool.buffer_size(),
            max_buffers = pool.max_buffers(),
            "created buffer pool"
        );

        Ok(pool)
    }

    /// Look up a pool by id
    pub fn pool(&self, pool_id: PoolId) -> Option<Arc<BufferPool>> {
        self.pools.read().unwrap().get(&pool_id).cloned()
    }

    /// Return a buffer to its owning pool, located via the handle's pool id
    ///
    /// A buffer whose pool id is not registered (stale pool, forged handle)
    /// is abandoned with a diagnostic, like any other untrusted release.
    pub fn release(&self, buffer: PooledBuffer) -> Result<()> {
        let pool_id = buffer.handle().pool_id();
        let pool = match self.pool(pool_id) {
            Some(pool) => pool,
            None => {
                error!(pool_id, "release for unknown pool, abandoning buffer");
                return Err(PoolError::pool_not_found(pool_id));
            }
        };
        pool.release(buffer)
    }

    /// Remove a pool from the registry
    ///
    /// Refuses while the pool has buffers checked out; free-listed buffers
    /// are dropped with the pool once the last `Arc` goes away.
    pub fn remove_pool(&self, pool_id: PoolId) -> Result<()> {
        let mut pools = self.pools.write().unwrap();
        let pool = pools
            .remove(&pool_id)
            .ok_or_else(|| PoolError::pool_not_found(pool_id))?;

        let checked_out = pool.checked_out();
        if checked_out > 0 {
            let name = pool.name().to_string();
            pools.insert(pool_id, pool); // put it back
            return Err(PoolError::pool_busy(name, checked_out));
        }

        info!(pool = %pool.name(), pool_id, "removed buffer pool");
        Ok(())
    }

    /// Number of registered pools
    pub fn pool_count(&self) -> usize {
        self.pools.read().unwrap().len()
    }

    /// List all registered pools as (id, name) pairs
    pub fn list_pools(&self) -> Vec<(PoolId, String)> {
        let pools = self.pools.read().unwrap();
        let mut listing: Vec<_> = pools
            .iter()
            .map(|(id, pool)| (*id, pool.name().to_string()))
            .collect();
        listing.sort_by_key(|(id, _)| *id);
        listing
    }

    /// Human-readable stats for every registered pool
    pub fn dump_stats(&self) -> String {
        let pools = self.pools.read().unwrap();
        let mut ids: Vec<_> = pools.keys().copied().collect();
        ids.sort_unstable();

        let mut out = String::from("Dumping stats for all buffer pools\n");
        for id in &ids {
            let _ = writeln!(out, "\n{}", pools[id].format_stats());
        }
        let _ = write!(out, "\nTotal buffer pools: {}", ids.len());
        out
    }
}

impl Default for PoolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry() {
        let registry = PoolRegistry::new();
        assert_eq!(registry.pool_count(), 0);
        assert!(registry.pool(1).is_none());
        assert!(registry.list_pools().is_empty());
    }

    #[test]
    fn test_pools_get_distinct_ids() {
        let registry = PoolRegistry::new();
        let a = registry
            .create_pool(PoolConfig::new("a").with_buffer_size(8))
            .unwrap();
        let b = registry
            .create_pool(PoolConfig::new("b").with_buffer_size(8))
            .unwrap();
        assert_ne!(a.pool_id(), b.pool_id());
        assert_eq!(registry.pool_count(), 2);
    }

    #[test]
    fn test_invalid_config_creates_nothing() {
        let registry = PoolRegistry::new();
        let result = registry.create_pool(PoolConfig::new("bad").with_buffer_size(0));
        assert!(matches!(
            result,
            Err(PoolError::InvalidConfiguration { .. })
        ));
        assert_eq!(registry.pool_count(), 0);
    }

    #[test]
    fn test_release_routes_by_pool_id() {
        let registry = PoolRegistry::new();
        let a = registry
            .create_pool(PoolConfig::new("a").with_buffer_size(8))
            .unwrap();
        let b = registry
            .create_pool(PoolConfig::new("b").with_buffer_size(8))
            .unwrap();

        let from_a = a.alloc().unwrap();
        let from_b = b.alloc().unwrap();
        registry.release(from_a).unwrap();
        registry.release(from_b).unwrap();

        assert_eq!(a.stats().free_buffers, 1);
        assert_eq!(b.stats().free_buffers, 1);
    }

    #[test]
    fn test_release_for_unknown_pool() {
        let registry = PoolRegistry::new();
        let pool = registry
            .create_pool(PoolConfig::new("gone").with_buffer_size(8))
            .unwrap();
        let buffer = pool.alloc().unwrap();
        let pool_id = pool.pool_id();

        // Removing fails while the buffer is out; release it, then remove.
        assert!(matches!(
            registry.remove_pool(pool_id),
            Err(PoolError::PoolBusy { .. })
        ));
        pool.release(buffer).unwrap();
        registry.remove_pool(pool_id).unwrap();

        // A buffer allocated before removal can no longer be routed.
        let stale = pool.alloc().unwrap();
        assert!(matches!(
            registry.release(stale),
            Err(PoolError::PoolNotFound { .. })
        ));
    }
}
