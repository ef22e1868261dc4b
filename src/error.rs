//! Error types and handling for bufpool

/// Result type alias for buffer pool operations
pub type Result<T> = std::result::Result<T, PoolError>;

/// Errors reported by buffer pools and the pool registry
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// Creation-time precondition violated (zero buffer size, preallocation
    /// above a non-zero maximum)
    #[error("invalid configuration: {parameter} - {message}")]
    InvalidConfiguration {
        parameter: &'static str,
        message: String,
    },

    /// The backing allocator could not supply a new buffer
    #[error("out of memory: failed to allocate {requested} bytes")]
    OutOfMemory { requested: usize },

    /// The pool is at its configured maximum buffer count
    #[error("capacity exceeded: pool '{pool}' is at its limit of {max_buffers} buffers")]
    CapacityExceeded { pool: String, max_buffers: u32 },

    /// A released buffer failed identity/ownership validation and was abandoned
    #[error("untrusted handle: {fault}")]
    UntrustedHandle { fault: HandleFault },

    /// No pool with the given id is registered
    #[error("pool not found: id {pool_id}")]
    PoolNotFound { pool_id: u32 },

    /// The pool still has buffers checked out and cannot be removed
    #[error("pool busy: '{pool}' still has {checked_out} buffers checked out")]
    PoolBusy { pool: String, checked_out: u32 },
}

/// The specific validation step a released handle failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HandleFault {
    /// The handle names a different pool than the one it was released to
    #[error("handle belongs to pool {actual}, not pool {expected}")]
    PoolMismatch { expected: u32, actual: u32 },

    /// The handle's pool token does not match the pool's current token
    #[error("pool token mismatch")]
    TokenMismatch,

    /// The handle's slot index is outside the pool's slab
    #[error("slot index {slot} out of range")]
    SlotOutOfRange { slot: u32 },

    /// The slot has been recycled since the handle was issued
    #[error("stale handle for slot {slot} (expected generation {expected}, got {actual})")]
    StaleGeneration {
        slot: u32,
        expected: u32,
        actual: u32,
    },

    /// The slot is not currently checked out
    #[error("slot {slot} is not checked out")]
    NotCheckedOut { slot: u32 },
}

impl PoolError {
    /// Create an invalid configuration error
    pub fn invalid_configuration(parameter: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            parameter,
            message: message.into(),
        }
    }

    /// Create an out of memory error
    pub fn out_of_memory(requested: usize) -> Self {
        Self::OutOfMemory { requested }
    }

    /// Create a capacity exceeded error
    pub fn capacity_exceeded(pool: impl Into<String>, max_buffers: u32) -> Self {
        Self::CapacityExceeded {
            pool: pool.into(),
            max_buffers,
        }
    }

    /// Create an untrusted handle error
    pub fn untrusted(fault: HandleFault) -> Self {
        Self::UntrustedHandle { fault }
    }

    /// Create a pool not found error
    pub fn pool_not_found(pool_id: u32) -> Self {
        Self::PoolNotFound { pool_id }
    }

    /// Create a pool busy error
    pub fn pool_busy(pool: impl Into<String>, checked_out: u32) -> Self {
        Self::PoolBusy {
            pool: pool.into(),
            checked_out,
        }
    }
}
