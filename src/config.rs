//! Configuration for TierKV
//!
//! Centralized configuration with sensible defaults.

use crate::error::{Result, TierError};

/// Highest `max_level` a skip list may be configured with
pub const MAX_LEVEL_LIMIT: usize = 32;

/// Default level capacity of a skip list
pub const DEFAULT_MAX_LEVEL: usize = 16;

/// Main configuration for a TierKV memtable
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Skip List Configuration
    // -------------------------------------------------------------------------
    /// Level capacity of every skip list (active and frozen)
    pub max_level: usize,

    /// Seed for the leveling policy. `None` seeds from OS entropy.
    ///
    /// Each new active layer derives its own seed from this one, so a seeded
    /// memtable is reproducible across freezes.
    pub rng_seed: Option<u64>,

    // -------------------------------------------------------------------------
    // MemTable Configuration
    // -------------------------------------------------------------------------
    /// Active layer size (in bytes) at which the flush side should freeze
    pub memtable_size_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_level: DEFAULT_MAX_LEVEL,
            rng_seed: None,
            memtable_size_limit: 64 * 1024 * 1024, // 64 MB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the values can back a memtable
    pub fn validate(&self) -> Result<()> {
        if self.max_level == 0 || self.max_level > MAX_LEVEL_LIMIT {
            return Err(TierError::Config(format!(
                "max_level must be in 1..={}, got {}",
                MAX_LEVEL_LIMIT, self.max_level
            )));
        }

        if self.memtable_size_limit == 0 {
            return Err(TierError::Config(
                "memtable_size_limit must be non-zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the level capacity of each skip list
    pub fn max_level(mut self, levels: usize) -> Self {
        self.config.max_level = levels;
        self
    }

    /// Seed the leveling policy (deterministic level assignment)
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.config.rng_seed = Some(seed);
        self
    }

    /// Set the memtable size limit (in bytes)
    pub fn memtable_size_limit(mut self, size: usize) -> Self {
        self.config.memtable_size_limit = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
