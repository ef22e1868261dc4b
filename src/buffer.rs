//! Checked-out buffers and their validated handles

use crate::pool::PoolId;

/// Identity of a checked-out buffer: which pool issued it, the pool's
/// token at issue time, and the slab slot/generation backing it
///
/// Handles are only constructed by a pool, and release validates every
/// field against the pool's slab before the buffer is accepted back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle {
    pub(crate) pool_id: PoolId,
    pub(crate) token: u64,
    pub(crate) slot: u32,
    pub(crate) generation: u32,
}

impl BufferHandle {
    /// The pool this buffer was allocated from
    pub fn pool_id(&self) -> PoolId {
        self.pool_id
    }

    /// The slab slot backing this buffer
    pub fn slot(&self) -> u32 {
        self.slot
    }

    /// The slot generation at allocation time
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// A fixed-size buffer checked out from a [`BufferPool`](crate::BufferPool)
///
/// The buffer owns its payload bytes while checked out; returning it via
/// [`BufferPool::release`](crate::BufferPool::release) (or
/// [`PoolRegistry::release`](crate::PoolRegistry::release)) moves the bytes
/// back onto the pool's free list. Dropping a `PooledBuffer` without
/// releasing it frees the bytes but permanently retires its slot in the
/// owning pool, which continues to count it as checked out.
#[derive(Debug)]
pub struct PooledBuffer {
    pub(crate) handle: BufferHandle,
    pub(crate) data: Box<[u8]>,
}

impl PooledBuffer {
    /// The validated handle identifying this buffer
    pub fn handle(&self) -> BufferHandle {
        self.handle
    }

    /// Buffer contents as a byte slice
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Buffer contents as a mutable byte slice
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Size of the buffer in bytes (always the pool's configured size)
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer holds zero bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Zero the entire buffer contents
    pub fn zero(&mut self) {
        self.data.fill(0);
    }
}

impl AsRef<[u8]> for PooledBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsMut<[u8]> for PooledBuffer {
    fn as_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}
