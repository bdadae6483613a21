//! # Pool Handles
//!
//! Slot handles are lightweight identifiers consisting of:
//! - An index into the pool's slot array
//! - A generation counter for safe slot reuse

/// Handle to an object in an [`ObjectPool`](super::ObjectPool).
///
/// The handle packs two parts:
/// - Lower 32 bits: slot index into the pool
/// - Upper 32 bits: generation counter for detecting stale handles
///
/// A handle stays valid until its slot is freed; once the slot is reused
/// the generation no longer matches and every pool operation rejects it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct PoolHandle(u64);

impl PoolHandle {
    /// Creates a handle from a slot index and generation.
    ///
    /// # Arguments
    ///
    /// * `index` - The slot index (0 to 2^32-1)
    /// * `generation` - The slot's generation counter (0 to 2^32-1)
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the slot index portion of the handle.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation portion of the handle.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Null/invalid handle.
    pub const NULL: Self = Self(u64::MAX);

    /// Checks if this handle is null/invalid.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for PoolHandle {
    fn default() -> Self {
        Self::NULL
    }
}
