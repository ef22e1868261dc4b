//! Tests for the pool registry: creation, routing, teardown, stats dumps

#[cfg(test)]
mod tests {
    use bufpool::{PoolConfig, PoolConfigBuilder, PoolError, PoolRegistry};

    #[test]
    fn test_create_registers_pool() {
        let registry = PoolRegistry::new();
        let pool = registry
            .create_pool(PoolConfig::new("events").with_buffer_size(128))
            .unwrap();

        assert_eq!(registry.pool_count(), 1);
        let listed = registry.list_pools();
        assert_eq!(listed, vec![(pool.pool_id(), "events".to_string())]);

        let looked_up = registry.pool(pool.pool_id()).unwrap();
        assert_eq!(looked_up.name(), "events");
    }

    #[test]
    fn test_invalid_configuration_reported_not_registered() {
        let registry = PoolRegistry::new();

        let err = registry
            .create_pool(PoolConfig::new("zero").with_buffer_size(0))
            .unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfiguration { .. }));

        let err = registry
            .create_pool(
                PoolConfig::new("lopsided")
                    .with_buffer_size(8)
                    .with_preallocate(4)
                    .with_max_buffers(2),
            )
            .unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfiguration { .. }));

        assert_eq!(registry.pool_count(), 0);
    }

    #[test]
    fn test_builder_through_registry() {
        let registry = PoolRegistry::new();
        let config = PoolConfigBuilder::new("frames")
            .buffer_size(1500)
            .preallocate(4)
            .max_buffers(16)
            .build()
            .unwrap();
        let pool = registry.create_pool(config).unwrap();

        let stats = pool.stats();
        assert_eq!(stats.buffer_size, 1500);
        assert_eq!(stats.free_buffers, 4);
        assert_eq!(stats.max_buffers, 16);
    }

    #[test]
    fn test_cross_pool_release_is_abandoned() {
        let registry = PoolRegistry::new();
        let a = registry
            .create_pool(PoolConfig::new("a").with_buffer_size(8))
            .unwrap();
        let b = registry
            .create_pool(PoolConfig::new("b").with_buffer_size(8))
            .unwrap();

        let from_a = a.alloc().unwrap();
        let err = b.release(from_a).unwrap_err();
        assert!(matches!(err, PoolError::UntrustedHandle { .. }));

        // Neither free list gained an entry; the buffer stays accounted as
        // checked out by its true owner.
        assert_eq!(a.stats().free_buffers, 0);
        assert_eq!(a.checked_out(), 1);
        assert_eq!(b.stats().free_buffers, 0);
    }

    #[test]
    fn test_registry_release_reaches_right_pool() {
        let registry = PoolRegistry::new();
        let a = registry
            .create_pool(PoolConfig::new("a").with_buffer_size(8))
            .unwrap();
        let b = registry
            .create_pool(PoolConfig::new("b").with_buffer_size(8))
            .unwrap();

        let from_b = b.alloc().unwrap();
        registry.release(from_b).unwrap();
        assert_eq!(a.stats().free_buffers, 0);
        assert_eq!(b.stats().free_buffers, 1);
    }

    #[test]
    fn test_remove_pool_lifecycle() {
        let registry = PoolRegistry::new();
        let pool = registry
            .create_pool(PoolConfig::new("short-lived").with_buffer_size(8))
            .unwrap();
        let pool_id = pool.pool_id();

        let buffer = pool.alloc().unwrap();
        let err = registry.remove_pool(pool_id).unwrap_err();
        assert!(matches!(err, PoolError::PoolBusy { checked_out: 1, .. }));

        pool.release(buffer).unwrap();
        registry.remove_pool(pool_id).unwrap();
        assert_eq!(registry.pool_count(), 0);
        assert!(registry.pool(pool_id).is_none());

        assert!(matches!(
            registry.remove_pool(pool_id),
            Err(PoolError::PoolNotFound { .. })
        ));
    }

    #[test]
    fn test_dump_stats_lists_every_pool() {
        let registry = PoolRegistry::new();
        registry
            .create_pool(PoolConfig::new("alpha").with_buffer_size(8))
            .unwrap();
        registry
            .create_pool(PoolConfig::new("beta").with_buffer_size(16).with_preallocate(2))
            .unwrap();

        let dump = registry.dump_stats();
        assert!(dump.contains("Buffer pool name            : alpha"));
        assert!(dump.contains("Buffer pool name            : beta"));
        assert!(dump.contains("Total buffer pools: 2"));

        let empty = PoolRegistry::new().dump_stats();
        assert!(empty.contains("Total buffer pools: 0"));
    }
}
