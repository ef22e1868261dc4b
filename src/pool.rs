//! Fixed-size buffer pool: slab, free list, and counters

use std::sync::Mutex;

use tracing::{debug, error, warn};

use crate::{
    buffer::{BufferHandle, PooledBuffer},
    config::PoolConfig,
    error::{HandleFault, PoolError, Result},
    stats::PoolStats,
};

/// Unique identifier for buffer pools, assigned by the registry
pub type PoolId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    /// No buffer backs this slot (never used, or purged)
    Vacant,
    /// A buffer is parked here and linked on the free list
    Free,
    /// The buffer is held by a caller
    CheckedOut,
}

/// One slab entry. `payload` is `Some` exactly while the slot is `Free`;
/// a checked-out buffer's bytes travel with the caller's [`PooledBuffer`].
#[derive(Debug)]
struct Slot {
    generation: u32,
    state: SlotState,
    payload: Option<Box<[u8]>>,
}

#[derive(Debug, Default)]
struct PoolInner {
    slots: Vec<Slot>,
    /// Indices of `Free` slots, reused LIFO
    free: Vec<u32>,
    /// Indices of `Vacant` slots, refilled before the slab grows
    vacant: Vec<u32>,
    allocated_buffers: u32,
    out_of_buffers: u32,
    out_of_memory: u32,
    total_allocation_requests: u64,
}

impl PoolInner {
    /// Park a fresh payload on the free list, reusing a vacant slot if any.
    fn park_new(&mut self, data: Box<[u8]>) {
        let idx = self.take_slot();
        let slot = &mut self.slots[idx as usize];
        slot.state = SlotState::Free;
        slot.payload = Some(data);
        self.free.push(idx);
        self.allocated_buffers += 1;
    }

    /// Claim a slot for a buffer that is checked out immediately.
    fn checkout_new(&mut self) -> u32 {
        let idx = self.take_slot();
        self.slots[idx as usize].state = SlotState::CheckedOut;
        self.allocated_buffers += 1;
        idx
    }

    fn take_slot(&mut self) -> u32 {
        if let Some(idx) = self.vacant.pop() {
            idx
        } else {
            let idx = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                state: SlotState::Vacant,
                payload: None,
            });
            idx
        }
    }
}

/// A pool of reusable fixed-size buffers
///
/// Released buffers are kept on a per-pool free list and handed out again
/// before the backing allocator is consulted. `max_buffers` (when non-zero)
/// caps how many buffers may exist concurrently, free or checked out.
///
/// All slab, free-list, and counter state sits behind one mutex, so a pool
/// may be shared across threads; every operation is a single short critical
/// section.
#[derive(Debug)]
pub struct BufferPool {
    pool_id: PoolId,
    name: String,
    /// Per-pool token baked into every issued handle; release rejects
    /// handles whose token does not match
    token: u64,
    buffer_size: usize,
    max_buffers: u32,
    inner: Mutex<PoolInner>,
}

impl BufferPool {
    /// Create a new pool. Preallocation is best-effort: attempts that fail
    /// in the backing allocator bump `out_of_memory` and are logged, and
    /// the pool is returned with fewer free buffers than requested.
    pub(crate) fn new(pool_id: PoolId, token: u64, config: PoolConfig) -> Result<Self> {
        config.validate()?;

        let pool = Self {
            pool_id,
            name: config.name,
            token,
            buffer_size: config.buffer_size,
            max_buffers: config.max_buffers,
            inner: Mutex::new(PoolInner::default()),
        };

        if config.preallocate > 0 {
            let mut inner = pool.inner.lock().unwrap();
            for _ in 0..config.preallocate {
                match allocate_payload(pool.buffer_size) {
                    Some(data) => inner.park_new(data),
                    None => {
                        inner.out_of_memory += 1;
                        warn!(
                            pool = %pool.name,
                            buffer_size = pool.buffer_size,
                            "preallocation attempt failed, pool will start short"
                        );
                    }
                }
            }
        }

        Ok(pool)
    }

    /// Allocate a buffer, reusing a free-listed one if available
    ///
    /// Counts the request unconditionally. A free-list hit changes no
    /// counter besides the free count. On a miss the limit policy applies:
    /// at the cap the request is rejected with [`PoolError::CapacityExceeded`]
    /// without touching the backing allocator; otherwise a new buffer is
    /// created or [`PoolError::OutOfMemory`] is reported.
    ///
    /// The returned contents are unspecified (a reused buffer carries the
    /// previous caller's bytes); use [`calloc`](Self::calloc) for zeroed
    /// buffers.
    pub fn alloc(&self) -> Result<PooledBuffer> {
        let mut inner = self.inner.lock().unwrap();
        inner.total_allocation_requests += 1;

        if let Some(idx) = inner.free.pop() {
            let slot = &mut inner.slots[idx as usize];
            let data = slot.payload.take().expect("free-listed slot has no payload");
            slot.state = SlotState::CheckedOut;
            let generation = slot.generation;
            return Ok(PooledBuffer {
                handle: self.handle_for(idx, generation),
                data,
            });
        }

        if self.max_buffers != 0 && inner.allocated_buffers >= self.max_buffers {
            inner.out_of_buffers += 1;
            return Err(PoolError::capacity_exceeded(&self.name, self.max_buffers));
        }

        match allocate_payload(self.buffer_size) {
            Some(data) => {
                let idx = inner.checkout_new();
                let generation = inner.slots[idx as usize].generation;
                Ok(PooledBuffer {
                    handle: self.handle_for(idx, generation),
                    data,
                })
            }
            None => {
                inner.out_of_memory += 1;
                Err(PoolError::out_of_memory(self.buffer_size))
            }
        }
    }

    /// Allocate a buffer with every byte zeroed
    ///
    /// Same counter and limit behavior as [`alloc`](Self::alloc); reused
    /// buffers are scrubbed of the previous caller's contents.
    pub fn calloc(&self) -> Result<PooledBuffer> {
        let mut buffer = self.alloc()?;
        buffer.zero();
        Ok(buffer)
    }

    /// Return a buffer to the pool's free list
    ///
    /// The handle is validated (owning pool, token, slot, generation, slot
    /// state) before the buffer is accepted. On any validation failure the
    /// buffer is abandoned: it is not linked onto any free list, the owning
    /// pool continues to count it as checked out, a diagnostic is logged,
    /// and [`PoolError::UntrustedHandle`] is returned. Contents of a
    /// successfully released buffer are left as-is.
    pub fn release(&self, buffer: PooledBuffer) -> Result<()> {
        let PooledBuffer { handle, data } = buffer;
        match self.validate_and_park(handle, data) {
            None => Ok(()),
            Some(fault) => {
                error!(
                    pool = %self.name,
                    %fault,
                    "refusing to release untrusted buffer, abandoning it"
                );
                Err(PoolError::untrusted(fault))
            }
        }
    }

    /// Release every free-listed buffer back to the backing allocator
    ///
    /// Purged slots are vacated and their generation bumped, so any stale
    /// handle still naming them is provably invalid. Checked-out buffers
    /// are untouched, and the historical counters (`total_allocation_requests`,
    /// `out_of_buffers`, `out_of_memory`) survive. Returns whether anything
    /// was purged.
    pub fn purge_free_list(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let count = inner.free.len();
        while let Some(idx) = inner.free.pop() {
            let slot = &mut inner.slots[idx as usize];
            slot.payload = None;
            slot.state = SlotState::Vacant;
            slot.generation = slot.generation.wrapping_add(1);
            inner.vacant.push(idx);
            inner.allocated_buffers -= 1;
        }

        if count > 0 {
            debug!(pool = %self.name, purged = count, "purged free list");
        }
        count > 0
    }

    /// Snapshot the pool's counters and configuration
    pub fn stats(&self) -> PoolStats {
        let inner = self.inner.lock().unwrap();
        PoolStats {
            buffer_size: self.buffer_size,
            allocated_buffers: inner.allocated_buffers,
            free_buffers: inner.free.len() as u32,
            max_buffers: self.max_buffers,
            out_of_buffers: inner.out_of_buffers,
            out_of_memory: inner.out_of_memory,
            total_allocation_requests: inner.total_allocation_requests,
        }
    }

    /// Human-readable stats block for this pool
    pub fn format_stats(&self) -> String {
        format!("Buffer pool name            : {}\n{}", self.name, self.stats())
    }

    /// Number of buffers currently held by callers
    pub fn checked_out(&self) -> u32 {
        self.stats().checked_out()
    }

    /// The pool's registry-assigned id
    pub fn pool_id(&self) -> PoolId {
        self.pool_id
    }

    /// The pool's immutable label
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configured payload size in bytes
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Configured buffer ceiling (0 = unlimited)
    pub fn max_buffers(&self) -> u32 {
        self.max_buffers
    }

    fn handle_for(&self, slot: u32, generation: u32) -> BufferHandle {
        BufferHandle {
            pool_id: self.pool_id,
            token: self.token,
            slot,
            generation,
        }
    }

    /// Validate a returned handle and park its payload. Returns the fault
    /// on failure, in which case the payload is dropped and the slot (if it
    /// exists here at all) is left untouched.
    fn validate_and_park(&self, handle: BufferHandle, data: Box<[u8]>) -> Option<HandleFault> {
        if handle.pool_id != self.pool_id {
            return Some(HandleFault::PoolMismatch {
                expected: self.pool_id,
                actual: handle.pool_id,
            });
        }
        if handle.token != self.token {
            return Some(HandleFault::TokenMismatch);
        }

        let mut inner = self.inner.lock().unwrap();
        let slot = match inner.slots.get_mut(handle.slot as usize) {
            Some(slot) => slot,
            None => return Some(HandleFault::SlotOutOfRange { slot: handle.slot }),
        };
        if slot.generation != handle.generation {
            return Some(HandleFault::StaleGeneration {
                slot: handle.slot,
                expected: slot.generation,
                actual: handle.generation,
            });
        }
        if slot.state != SlotState::CheckedOut {
            return Some(HandleFault::NotCheckedOut { slot: handle.slot });
        }

        slot.state = SlotState::Free;
        slot.payload = Some(data);
        // Bump the generation so any forged or duplicated copy of this
        // handle is stale from here on.
        slot.generation = slot.generation.wrapping_add(1);
        inner.free.push(handle.slot);
        None
    }
}

/// Fallibly allocate a payload region of exactly `size` bytes.
fn allocate_payload(size: usize) -> Option<Box<[u8]>> {
    let mut data: Vec<u8> = Vec::new();
    data.try_reserve_exact(size).ok()?;
    data.resize(size, 0);
    Some(data.into_boxed_slice())
}
