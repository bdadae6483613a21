//! # TYPHON Memory Layer
//!
//! Manual memory-management primitives the rest of the engine sits on:
//! GPU heaps, task-state pools, and audio sample pools all suballocate
//! from these two structures instead of the global allocator.
//!
//! - [`RegionAllocator`] - variable-size aligned sub-ranges out of one
//!   fixed span, first-fit with splitting and coalescing. Externally
//!   synchronized; pure bookkeeping, no OS calls.
//! - [`ObjectPool`] - fixed-capacity typed slots behind a single mutex,
//!   LIFO slot reuse, generation-checked handles.
//!
//! ## Architecture Rules
//!
//! 1. **Budgets are fixed at startup** - no growth, no GC, no reclamation
//!    heuristics
//! 2. **Exhaustion is data, not an event** - callers get `None`/`false`
//!    and decide for themselves
//! 3. **Misuse is fatal** - a free that corrupts the bookkeeping panics
//!    immediately rather than limping on
//!
//! ## Example
//!
//! ```rust,ignore
//! use typhon_memory::{MemoryConfig, ObjectPool, RegionAllocator};
//!
//! let config = MemoryConfig::from_toml_str(include_str!("memory.toml"))?;
//! let mut gpu_heap = RegionAllocator::from_config(&config.region)?;
//! let particles: ObjectPool<Particle> =
//!     ObjectPool::with_capacity(config.pools["particles"].capacity);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod pool;
pub mod region;
pub mod stats;

pub use config::{MemoryConfig, PoolConfig, RegionConfig};
pub use error::ConfigError;
pub use pool::{ObjectPool, PoolGuard, PoolHandle};
pub use region::{FreeRange, RegionAllocator};
pub use stats::{PoolStats, RegionStats};
