//! # Object Pool
//!
//! Fixed-capacity typed slot allocation behind a single mutex.

use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};

use super::handle::PoolHandle;
use super::mask::LiveMask;
use crate::stats::PoolStats;

/// Lock-holding reference to a live pooled object.
///
/// Dereferences to `T`. The pool's mutex is held for the guard's lifetime,
/// so keep these short-lived - every other pool operation blocks until the
/// guard drops.
pub type PoolGuard<'a, T> = MappedMutexGuard<'a, T>;

/// A thread-safe pool of fixed-size typed slots.
///
/// Storage for exactly `capacity` objects is reserved once by
/// [`Self::create`]; afterwards [`Self::allocate`] and [`Self::free`] are
/// O(1) slot operations with no heap traffic. Freed slots are reused in
/// LIFO order - the most recently freed slot goes out first, which keeps
/// churny workloads (particles, transient task state, audio voices) on warm
/// cache lines.
///
/// # Thread Safety
///
/// Internally synchronized: one mutex covers every operation. Exhaustion is
/// reported immediately as `None` - there is no growth, no blocking, and no
/// retry policy; the caller decides.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct Voice { frequency: f32, amplitude: f32 }
///
/// let voices: ObjectPool<Voice> = ObjectPool::with_capacity(64);
///
/// let handle = voices.allocate().expect("voice pool exhausted");
/// voices.get(handle).unwrap().frequency = 440.0;
/// assert!(voices.free(handle));
/// ```
#[derive(Debug)]
pub struct ObjectPool<T> {
    /// `None` until [`Self::create`] runs; the mutex covers creation too.
    inner: Mutex<Option<PoolInner<T>>>,
}

/// One slot: the (possibly absent) object plus its reuse generation.
#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    generation: u32,
}

#[derive(Debug)]
struct PoolInner<T> {
    slots: Box<[Slot<T>]>,
    /// Unused slot indices, popped from the back (LIFO reuse).
    free_indices: Vec<u32>,
    /// One bit per slot, set iff the slot holds a constructed object.
    live: LiveMask,
    /// Running count of set bits in `live`.
    live_count: usize,
    /// Highest `live_count` ever observed, for budget tuning.
    high_water: usize,
}

impl<T> ObjectPool<T> {
    /// Creates an empty, uninitialized pool.
    ///
    /// No storage is reserved until [`Self::create`] is called; every
    /// operation on an uncreated pool reports failure (`None`/`false`).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    /// Creates a pool and reserves its storage in one step.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        let pool = Self::new();
        let created = pool.create(capacity);
        debug_assert!(created);
        pool
    }

    /// One-time storage reservation for exactly `capacity` objects.
    ///
    /// Initializes the free-index stack to `[capacity-1 .. 0]` so the first
    /// [`Self::allocate`] hands out slot 0.
    ///
    /// # Returns
    ///
    /// `false` (and does nothing) if the pool was already created or
    /// `capacity` is zero.
    pub fn create(&self, capacity: usize) -> bool {
        let mut guard = self.inner.lock();
        if guard.is_some() || capacity == 0 {
            return false;
        }
        let Ok(capacity_u32) = u32::try_from(capacity) else {
            return false;
        };

        *guard = Some(PoolInner {
            slots: (0..capacity)
                .map(|_| Slot {
                    value: None,
                    generation: 0,
                })
                .collect(),
            free_indices: (0..capacity_u32).rev().collect(),
            live: LiveMask::with_slots(capacity),
            live_count: 0,
            high_water: 0,
        });
        tracing::debug!(
            capacity,
            type_name = std::any::type_name::<T>(),
            "object pool created"
        );
        true
    }

    /// Whether [`Self::create`] has run.
    #[must_use]
    pub fn is_created(&self) -> bool {
        self.inner.lock().is_some()
    }

    /// Places `value` into a free slot.
    ///
    /// The LIFO twin of [`Self::allocate`] for callers that build the
    /// object themselves; `None` means the pool is exhausted (or not yet
    /// created) and `value` is dropped.
    pub fn allocate_with(&self, value: T) -> Option<PoolHandle> {
        let mut guard = self.inner.lock();
        let handle = guard.as_mut().and_then(|inner| inner.install(|| value));
        if handle.is_none() {
            tracing::trace!(
                type_name = std::any::type_name::<T>(),
                "object pool exhausted"
            );
        }
        handle
    }

    /// Frees the object behind `handle`, dropping it in place.
    ///
    /// # Returns
    ///
    /// `false` if the handle is null, out of bounds, stale (the slot has
    /// been reused since), or already free - the double-free guard. The
    /// pool is unchanged in every failure case.
    pub fn free(&self, handle: PoolHandle) -> bool {
        let mut guard = self.inner.lock();
        let Some(inner) = guard.as_mut() else {
            return false;
        };
        let Some(idx) = inner.validate(handle) else {
            return false;
        };

        let dropped = inner.slots[idx].value.take();
        debug_assert!(dropped.is_some(), "live slot held no value");
        drop(dropped);

        let was_live = inner.live.clear(idx);
        debug_assert!(was_live, "freed slot was not live");
        inner.live_count -= 1;
        inner.free_indices.push(handle.index());
        inner.check_invariant();

        true
    }

    /// Locks the pool and returns a guard to the object behind `handle`.
    ///
    /// # Returns
    ///
    /// `None` if the handle is null, out of bounds, stale, or free.
    pub fn get(&self, handle: PoolHandle) -> Option<PoolGuard<'_, T>> {
        let guard = self.inner.lock();
        MutexGuard::try_map(guard, |inner| {
            let inner = inner.as_mut()?;
            let idx = inner.validate(handle)?;
            inner.slots[idx].value.as_mut()
        })
        .ok()
    }

    /// Whether `handle` currently refers to a live object.
    #[must_use]
    pub fn is_live(&self, handle: PoolHandle) -> bool {
        self.inner
            .lock()
            .as_ref()
            .is_some_and(|inner| inner.validate(handle).is_some())
    }

    /// Returns the pool capacity, or 0 before [`Self::create`].
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.lock().as_ref().map_or(0, |inner| inner.slots.len())
    }

    /// Returns the number of live objects.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.inner.lock().as_ref().map_or(0, |inner| inner.live_count)
    }

    /// Returns the number of free slots.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.inner
            .lock()
            .as_ref()
            .map_or(0, |inner| inner.free_indices.len())
    }

    /// Returns a point-in-time snapshot of the pool's bookkeeping.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.inner.lock().as_ref().map_or_else(PoolStats::default, |inner| PoolStats {
            capacity: inner.slots.len(),
            live: inner.live_count,
            free: inner.free_indices.len(),
            high_water: inner.high_water,
        })
    }

    /// Drops every live object and resets all slots to free.
    ///
    /// Outstanding handles become stale. Storage is kept - the pool is
    /// immediately reusable at full capacity. A no-op before
    /// [`Self::create`].
    pub fn clear(&self) {
        let mut guard = self.inner.lock();
        let Some(inner) = guard.as_mut() else {
            return;
        };
        for slot in &mut inner.slots {
            slot.value = None;
        }
        inner.live.clear_all();
        inner.live_count = 0;
        let capacity = u32::try_from(inner.slots.len()).unwrap_or(u32::MAX);
        inner.free_indices.clear();
        inner.free_indices.extend((0..capacity).rev());
        inner.check_invariant();
    }
}

impl<T: Default> ObjectPool<T> {
    /// Constructs a `T::default()` into a free slot.
    ///
    /// Pops the top of the free-index stack (LIFO - the most recently freed
    /// slot is reused first) and constructs the object in place.
    ///
    /// # Returns
    ///
    /// A handle for the slot's current generation, or `None` if the pool is
    /// exhausted (or not yet created). Exhaustion never blocks and never
    /// panics.
    pub fn allocate(&self) -> Option<PoolHandle> {
        let mut guard = self.inner.lock();
        let handle = guard.as_mut().and_then(|inner| inner.install(T::default));
        if handle.is_none() {
            tracing::trace!(
                type_name = std::any::type_name::<T>(),
                "object pool exhausted"
            );
        }
        handle
    }
}

impl<T> Default for ObjectPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PoolInner<T> {
    /// Pops a free slot and constructs into it.
    ///
    /// `make` runs only after a slot has been secured, so exhaustion never
    /// constructs-and-drops.
    fn install(&mut self, make: impl FnOnce() -> T) -> Option<PoolHandle> {
        let index = self.free_indices.pop()?;
        let idx = index as usize;

        let slot = &mut self.slots[idx];
        // Bumping on reuse invalidates every handle to the slot's previous
        // occupant.
        slot.generation = slot.generation.wrapping_add(1);
        let generation = slot.generation;
        slot.value = Some(make());

        let was_live = self.live.set(idx);
        debug_assert!(!was_live, "allocated slot was already live");
        self.live_count += 1;
        self.high_water = self.high_water.max(self.live_count);
        self.check_invariant();

        Some(PoolHandle::new(index, generation))
    }

    /// Resolves `handle` to a slot index iff it refers to a live object of
    /// the slot's current generation.
    fn validate(&self, handle: PoolHandle) -> Option<usize> {
        if handle.is_null() {
            return None;
        }
        let idx = handle.index() as usize;
        if idx >= self.slots.len() || !self.live.get(idx) {
            return None;
        }
        if self.slots[idx].generation != handle.generation() {
            return None;
        }
        Some(idx)
    }

    /// Every slot is exactly one of free-listed or live.
    fn check_invariant(&self) {
        debug_assert_eq!(
            self.free_indices.len() + self.live_count,
            self.slots.len(),
            "free indices and live slots must partition the pool"
        );
        debug_assert_eq!(self.live.count_set(), self.live_count);
    }
}
