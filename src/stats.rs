//! Buffer pool statistics snapshots

use std::fmt;

use serde::{Deserialize, Serialize};

/// Point-in-time snapshot of a pool's counters and configuration
///
/// Produced by [`BufferPool::stats`](crate::BufferPool::stats); all
/// reporting (per-pool print, registry-wide dump) is derived from this
/// record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Size of the buffers in this pool, in bytes
    pub buffer_size: usize,
    /// Total number of buffers currently allocated (free + checked out)
    pub allocated_buffers: u32,
    /// Number of buffers currently on the free list
    pub free_buffers: u32,
    /// Maximum allowed number of buffers (0 = unlimited)
    pub max_buffers: u32,
    /// How many allocation requests were denied by the max buffer limit
    pub out_of_buffers: u32,
    /// How many allocation requests failed in the backing allocator
    pub out_of_memory: u32,
    /// Total number of allocation requests, regardless of outcome
    pub total_allocation_requests: u64,
}

impl PoolStats {
    /// Number of buffers currently checked out to callers
    pub fn checked_out(&self) -> u32 {
        self.allocated_buffers - self.free_buffers
    }

    /// Fraction of allocated buffers currently checked out (0.0 to 1.0)
    pub fn utilization(&self) -> f64 {
        if self.allocated_buffers == 0 {
            return 0.0;
        }
        f64::from(self.checked_out()) / f64::from(self.allocated_buffers)
    }
}

impl fmt::Display for PoolStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Buffer size               : {} bytes", self.buffer_size)?;
        writeln!(
            f,
            "  Max buffers               : {} (0 means unlimited)",
            self.max_buffers
        )?;
        writeln!(f, "  Allocated buffers         : {}", self.allocated_buffers)?;
        writeln!(f, "  Free buffers              : {}", self.free_buffers)?;
        writeln!(
            f,
            "  Total allocation requests : {}",
            self.total_allocation_requests
        )?;
        writeln!(f, "  Unable to allocate:")?;
        writeln!(f, "    Max buffers reached     : {}", self.out_of_buffers)?;
        write!(f, "    Out of memory           : {}", self.out_of_memory)
    }
}
