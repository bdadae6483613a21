//! # Memory Configuration Errors
//!
//! Failures surfaced while validating startup budgets. Runtime outcomes
//! (exhaustion, invalid frees) are ordinary return values, never errors.

use thiserror::Error;

/// Errors produced when validating or parsing a memory configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Region budget declared with a zero-byte span.
    #[error("region size must be greater than zero")]
    ZeroRegionSize,

    /// Region default alignment is not a power of two.
    #[error("default alignment must be a power of two, got {0}")]
    InvalidAlignment(u64),

    /// A pool budget declared with zero capacity.
    #[error("pool `{name}` capacity must be greater than zero")]
    ZeroPoolCapacity {
        /// The pool's name in the config file.
        name: String,
    },

    /// The TOML source failed to parse.
    #[error("failed to parse memory config: {0}")]
    Parse(#[from] toml::de::Error),
}
