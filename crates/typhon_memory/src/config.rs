//! # Startup Memory Budgets
//!
//! All budgets are loaded from external TOML files once at startup and
//! validated before any allocator exists. Nothing here is consulted again
//! after initialization - the allocators own their fixed capacities.
//!
//! ## Example config
//!
//! ```toml
//! [region]
//! size = 67108864
//! default_alignment = 256
//!
//! [pools.particles]
//! capacity = 65536
//!
//! [pools.audio_voices]
//! capacity = 64
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::ConfigError;

fn default_alignment() -> u64 {
    16
}

/// Budget for one region allocator span.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct RegionConfig {
    /// Extent of the managed span in bytes.
    pub size: u64,
    /// Alignment the span's owner should request by default.
    #[serde(default = "default_alignment")]
    pub default_alignment: u64,
}

/// Budget for one fixed-capacity object pool.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of slots reserved at creation.
    pub capacity: usize,
}

/// The memory layer's complete startup budget.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct MemoryConfig {
    /// The region allocator span.
    pub region: RegionConfig,
    /// Named pool budgets, keyed by subsystem (sorted for determinism).
    #[serde(default)]
    pub pools: BTreeMap<String, PoolConfig>,
}

impl RegionConfig {
    /// Checks the budget for values no allocator can honor.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroRegionSize`] for an empty span,
    /// [`ConfigError::InvalidAlignment`] for a non-power-of-two alignment.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::ZeroRegionSize);
        }
        if !self.default_alignment.is_power_of_two() {
            return Err(ConfigError::InvalidAlignment(self.default_alignment));
        }
        Ok(())
    }
}

impl MemoryConfig {
    /// Parses and validates a budget from TOML source.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed TOML, plus every error
    /// [`Self::validate`] produces.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every budget in the file.
    ///
    /// # Errors
    ///
    /// The first failing budget's error: region errors per
    /// [`RegionConfig::validate`], [`ConfigError::ZeroPoolCapacity`] for an
    /// empty pool.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.region.validate()?;
        for (name, pool) in &self.pools {
            if pool.capacity == 0 {
                return Err(ConfigError::ZeroPoolCapacity { name: name.clone() });
            }
        }
        Ok(())
    }
}
