//! # Region Allocator
//!
//! Variable-size sub-allocation out of one fixed byte span.

use super::free_list::{FreeList, FreeRange};
use crate::config::RegionConfig;
use crate::error::ConfigError;
use crate::stats::RegionStats;

/// Sub-allocates aligned byte ranges out of a fixed span `[0, total)`.
///
/// The allocator is pure bookkeeping: it hands out numeric offsets, never
/// touches real memory, and performs no OS calls. The owner is responsible
/// for backing the span (a GPU heap, an audio sample bank) and for pairing
/// every offset with its size when freeing.
///
/// # Allocation Policy
///
/// First-fit over an offset-ordered free list. Splitting keeps alignment
/// waste as a separate free block; freeing coalesces byte-adjacent
/// neighbors, so the list never holds two touching blocks.
///
/// # Thread Safety
///
/// NOT internally synchronized. One instance must be serialized by its
/// owner; distinct instances share no state.
///
/// # Example
///
/// ```rust,ignore
/// let mut region = RegionAllocator::new(64 * 1024 * 1024);
///
/// let offset = region.allocate(4096, 256).expect("heap exhausted");
/// // ... bind [offset, offset + 4096) to a GPU resource ...
/// region.deallocate(offset, 4096);
/// ```
#[derive(Debug)]
pub struct RegionAllocator {
    /// Offset-ordered free blocks, index-linked.
    free: FreeList,
    /// Immutable extent of the managed span.
    total: u64,
    /// Bytes not yet handed to a caller. See [`Self::available`].
    available: u64,
    /// Outstanding allocations, for diagnostics only.
    live_allocations: usize,
}

impl RegionAllocator {
    /// Creates an allocator managing the span `[0, total)`.
    ///
    /// # Arguments
    ///
    /// * `total` - Extent of the managed span in bytes
    ///
    /// # Panics
    ///
    /// Panics if `total` is zero.
    #[must_use]
    pub fn new(total: u64) -> Self {
        assert!(total > 0, "Region size must be greater than zero");
        tracing::debug!(total, "region allocator created");
        Self {
            free: FreeList::with_initial(0, total),
            total,
            available: total,
            live_allocations: 0,
        }
    }

    /// Creates an allocator from a validated startup budget.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] produced by [`RegionConfig::validate`].
    pub fn from_config(config: &RegionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config.size))
    }

    /// Returns the extent of the managed span in bytes.
    #[inline]
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Returns the bytes not yet handed to a caller.
    ///
    /// This counter equals the sum of all free block sizes, alignment waste
    /// included. It does NOT promise that a single request of this size can
    /// succeed - fragmentation and waste fragments may make the largest
    /// servable request much smaller. Use [`Self::largest_free_block`] for
    /// that question.
    #[inline]
    #[must_use]
    pub const fn available(&self) -> u64 {
        self.available
    }

    /// Returns the size of the largest single free block.
    ///
    /// An upper bound on the biggest request that could currently succeed
    /// (the exact bound also depends on the requested alignment).
    #[must_use]
    pub fn largest_free_block(&self) -> u64 {
        self.free.largest()
    }

    /// Returns the free list as an offset-sorted snapshot.
    ///
    /// Intended for diagnostics and tests; the snapshot allocates.
    #[must_use]
    pub fn free_blocks(&self) -> Vec<FreeRange> {
        self.free.iter().collect()
    }

    /// Returns a point-in-time snapshot of the allocator's bookkeeping.
    #[must_use]
    pub fn stats(&self) -> RegionStats {
        RegionStats {
            total: self.total,
            available: self.available,
            free_blocks: self.free.len(),
            largest_free_block: self.free.largest(),
            live_allocations: self.live_allocations,
        }
    }

    /// Allocates `size` bytes at the requested alignment.
    ///
    /// Scans the free list first-fit and splits the chosen block; any bytes
    /// skipped to reach the aligned start remain in the free list as a
    /// (possibly unusable) waste fragment.
    ///
    /// # Arguments
    ///
    /// * `size` - Number of bytes, must be greater than zero
    /// * `alignment` - Required alignment, must be a power of two
    ///
    /// # Returns
    ///
    /// The offset of the allocated range, or `None` if no free block can
    /// hold the request. Never panics on exhaustion, never blocks.
    pub fn allocate(&mut self, size: u64, alignment: u64) -> Option<u64> {
        debug_assert!(size > 0, "allocation size must be greater than zero");
        debug_assert!(
            alignment.is_power_of_two(),
            "alignment must be a power of two"
        );

        let Some(offset) = self.free.claim_first_fit(size, alignment) else {
            tracing::trace!(size, alignment, "region allocation failed, no fitting block");
            return None;
        };

        // Only the bytes handed out are subtracted; alignment waste stays
        // in the free list and keeps counting as available.
        self.available -= size;
        self.live_allocations += 1;
        debug_assert_eq!(self.free.total_free(), self.available);

        Some(offset)
    }

    /// Returns the range `[offset, offset + size)` to the free list.
    ///
    /// Merges with the immediately preceding free block if it ends exactly
    /// at `offset`, and with the immediately following one if it begins
    /// exactly at `offset + size`; touching both collapses all three into
    /// one block.
    ///
    /// The caller must pass back exactly the `(offset, size)` pair of a
    /// prior [`Self::allocate`] that has not already been freed.
    ///
    /// # Panics
    ///
    /// Panics if the range falls outside the managed span or overlaps a
    /// block that is already free. Both indicate caller misuse (double free
    /// or corrupted bookkeeping) from which the structure cannot safely
    /// continue.
    pub fn deallocate(&mut self, offset: u64, size: u64) {
        debug_assert!(size > 0, "deallocation size must be greater than zero");
        assert!(
            offset.checked_add(size).is_some_and(|end| end <= self.total),
            "freed range at offset {offset} (+{size} bytes) exceeds the managed span"
        );

        if let Err(overlap) = self.free.insert_merged(offset, size) {
            panic!("region corruption: {overlap}");
        }

        self.available += size;
        self.live_allocations = self.live_allocations.saturating_sub(1);
        debug_assert_eq!(self.free.total_free(), self.available);
    }

    /// Resets the allocator to its initial single-block state.
    ///
    /// Every outstanding offset becomes invalid. This is the owner-driven
    /// bulk free for span teardown or level transitions.
    pub fn reset(&mut self) {
        self.free = FreeList::with_initial(0, self.total);
        self.available = self.total;
        self.live_allocations = 0;
        tracing::debug!(total = self.total, "region allocator reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(region: &RegionAllocator) -> Vec<(u64, u64)> {
        region
            .free_blocks()
            .iter()
            .map(|r| (r.offset, r.size))
            .collect()
    }

    #[test]
    fn test_alignment_split_scenario() {
        let mut region = RegionAllocator::new(1024);

        assert_eq!(region.allocate(100, 16), Some(0));
        assert_eq!(region.available(), 924);

        // round_up(100, 32) = 128: 28 bytes of waste stay free.
        assert_eq!(region.allocate(50, 32), Some(128));
        assert_eq!(region.available(), 874);
        assert_eq!(ranges(&region), vec![(100, 28), (178, 846)]);

        // Freeing [0, 100) merges with the waste fragment at 100.
        region.deallocate(0, 100);
        assert_eq!(ranges(&region), vec![(0, 128), (178, 846)]);
        assert_eq!(region.available(), 974);
    }

    #[test]
    fn test_round_trip_restores_topology() {
        let mut region = RegionAllocator::new(4096);
        let before = region.free_blocks();
        let available = region.available();

        let offset = region.allocate(512, 1).unwrap();
        region.deallocate(offset, 512);

        assert_eq!(region.available(), available);
        assert_eq!(region.free_blocks(), before);
    }

    #[test]
    fn test_first_fit_prefers_lowest_offset() {
        let mut region = RegionAllocator::new(1024);
        let a = region.allocate(128, 1).unwrap();
        let b = region.allocate(128, 1).unwrap();
        let _c = region.allocate(128, 1).unwrap();

        region.deallocate(a, 128);
        region.deallocate(b, 128);

        // The coalesced hole at offset 0 is found before the tail block.
        assert_eq!(region.allocate(200, 1), Some(0));
    }

    #[test]
    fn test_exhaustion_returns_none() {
        let mut region = RegionAllocator::new(256);
        assert_eq!(region.allocate(256, 1), Some(0));
        assert_eq!(region.allocate(1, 1), None);
        assert_eq!(region.available(), 0);

        region.deallocate(0, 256);
        assert_eq!(region.allocate(1, 1), Some(0));
    }

    #[test]
    fn test_fragmented_available_can_fail_large_requests() {
        let mut region = RegionAllocator::new(300);
        let a = region.allocate(100, 1).unwrap();
        let _b = region.allocate(100, 1).unwrap();
        let c = region.allocate(100, 1).unwrap();

        region.deallocate(a, 100);
        region.deallocate(c, 100);

        // 200 bytes available, but split across two 100-byte holes.
        assert_eq!(region.available(), 200);
        assert_eq!(region.largest_free_block(), 100);
        assert_eq!(region.allocate(150, 1), None);
    }

    #[test]
    fn test_coalesce_three_way() {
        let mut region = RegionAllocator::new(300);
        let a = region.allocate(100, 1).unwrap();
        let b = region.allocate(100, 1).unwrap();
        let c = region.allocate(100, 1).unwrap();

        region.deallocate(a, 100);
        region.deallocate(c, 100);
        assert_eq!(region.free_blocks().len(), 2);

        region.deallocate(b, 100);
        assert_eq!(ranges(&region), vec![(0, 300)]);
    }

    #[test]
    #[should_panic(expected = "region corruption")]
    fn test_double_free_panics() {
        let mut region = RegionAllocator::new(1024);
        let offset = region.allocate(100, 1).unwrap();
        region.deallocate(offset, 100);
        region.deallocate(offset, 100);
    }

    #[test]
    #[should_panic(expected = "exceeds the managed span")]
    fn test_out_of_span_free_panics() {
        let mut region = RegionAllocator::new(1024);
        region.deallocate(1000, 100);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut region = RegionAllocator::new(1024);
        let _ = region.allocate(100, 16);
        let _ = region.allocate(50, 32);

        region.reset();
        assert_eq!(region.available(), 1024);
        assert_eq!(ranges(&region), vec![(0, 1024)]);
        assert_eq!(region.stats().live_allocations, 0);
    }

    #[test]
    fn test_stats_snapshot() {
        let mut region = RegionAllocator::new(1024);
        let _ = region.allocate(100, 16).unwrap();
        let _ = region.allocate(50, 32).unwrap();

        let stats = region.stats();
        assert_eq!(stats.total, 1024);
        assert_eq!(stats.available, 874);
        assert_eq!(stats.free_blocks, 2);
        assert_eq!(stats.largest_free_block, 846);
        assert_eq!(stats.live_allocations, 2);
    }
}
