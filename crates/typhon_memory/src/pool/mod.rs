//! # Object Pools
//!
//! Fixed-capacity typed slot allocation: storage for every instance is
//! reserved once, then slots cycle through allocate/free in LIFO order
//! under a single mutex. Handles carry a generation counter so stale
//! references are rejected instead of corrupting a reused slot.

mod handle;
mod mask;
mod object_pool;

pub use handle::PoolHandle;
pub use object_pool::{ObjectPool, PoolGuard};
