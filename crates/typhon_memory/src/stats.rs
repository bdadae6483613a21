//! # Bookkeeping Snapshots
//!
//! Cheap point-in-time counters for diagnostics overlays and budget tuning.
//! Snapshots are plain copyable data - no history, no sampling machinery.

/// Snapshot of a [`RegionAllocator`](crate::RegionAllocator)'s bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegionStats {
    /// Extent of the managed span in bytes.
    pub total: u64,
    /// Bytes not yet handed to a caller (alignment waste included).
    pub available: u64,
    /// Number of blocks in the free list.
    pub free_blocks: usize,
    /// Size of the largest single free block.
    pub largest_free_block: u64,
    /// Outstanding allocations.
    pub live_allocations: usize,
}

/// Snapshot of an [`ObjectPool`](crate::ObjectPool)'s bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Total slot count, 0 before creation.
    pub capacity: usize,
    /// Slots currently holding a live object.
    pub live: usize,
    /// Slots on the free stack.
    pub free: usize,
    /// Highest live count ever observed.
    pub high_water: usize,
}

impl RegionStats {
    /// Bytes currently handed out to callers.
    #[inline]
    #[must_use]
    pub const fn in_use(&self) -> u64 {
        self.total - self.available
    }
}
