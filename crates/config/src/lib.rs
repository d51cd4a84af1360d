//! # Config - table format settings
//!
//! Settings that every writer and reader of a given table must agree on.
//! The membership filter is persisted as raw bytes with no size prefix, so
//! the capacity used to build a table has to be supplied again to open it.
//!
//! ## Environment
//!
//! [`TableConfig::from_env`] reads:
//!
//! ```text
//! SST_FILTER_BITS   filter capacity in bits  (default: 81920 = 10 KiB)
//! SST_HASH_SEED     filter hash seed         (default: 1)
//! ```

use thiserror::Error;

/// Default filter capacity in bits (10 240 bytes on disk).
pub const DEFAULT_FILTER_BITS: u64 = 81_920;

/// Default seed for the filter hash.
pub const DEFAULT_HASH_SEED: u32 = 1;

/// Errors produced by [`TableConfig::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The filter must hold at least one bit.
    #[error("filter_bits must be > 0")]
    ZeroFilterBits,

    /// The filter size must fit the platform's address space.
    #[error("filter_bits {0} is too large")]
    FilterTooLarge(u64),
}

/// Per-table format settings shared by the builder and the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Membership filter capacity in bits.
    pub filter_bits: u64,
    /// Seed passed to the filter hash.
    pub hash_seed: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            filter_bits: DEFAULT_FILTER_BITS,
            hash_seed: DEFAULT_HASH_SEED,
        }
    }
}

/// Reads a configuration value from the environment, falling back to `default`.
fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl TableConfig {
    /// Creates a config with the given filter capacity and the default seed.
    #[must_use]
    pub fn new(filter_bits: u64) -> Self {
        Self {
            filter_bits,
            ..Self::default()
        }
    }

    /// Returns a copy with `hash_seed` replaced.
    #[must_use]
    pub fn with_hash_seed(mut self, hash_seed: u32) -> Self {
        self.hash_seed = hash_seed;
        self
    }

    /// Loads settings from `SST_FILTER_BITS` and `SST_HASH_SEED`.
    ///
    /// Missing or unparseable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let filter_bits = env_or("SST_FILTER_BITS", "81920")
            .parse()
            .unwrap_or(DEFAULT_FILTER_BITS);
        let hash_seed = env_or("SST_HASH_SEED", "1")
            .parse()
            .unwrap_or(DEFAULT_HASH_SEED);
        Self {
            filter_bits,
            hash_seed,
        }
    }

    /// Number of bytes the filter occupies on disk: `ceil(filter_bits / 8)`.
    #[must_use]
    pub fn filter_bytes(&self) -> u64 {
        self.filter_bits.div_ceil(8)
    }

    /// Checks that the settings describe a usable table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroFilterBits`] for an empty filter and
    /// [`ConfigError::FilterTooLarge`] if the byte size overflows `usize`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.filter_bits == 0 {
            return Err(ConfigError::ZeroFilterBits);
        }
        if usize::try_from(self.filter_bytes()).is_err() {
            return Err(ConfigError::FilterTooLarge(self.filter_bits));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_constants() {
        let cfg = TableConfig::default();
        assert_eq!(cfg.filter_bits, DEFAULT_FILTER_BITS);
        assert_eq!(cfg.hash_seed, DEFAULT_HASH_SEED);
        assert_eq!(cfg.filter_bytes(), 10_240);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn filter_bytes_rounds_up() {
        assert_eq!(TableConfig::new(1).filter_bytes(), 1);
        assert_eq!(TableConfig::new(8).filter_bytes(), 1);
        assert_eq!(TableConfig::new(9).filter_bytes(), 2);
    }

    #[test]
    fn zero_bits_rejected() {
        assert_eq!(
            TableConfig::new(0).validate(),
            Err(ConfigError::ZeroFilterBits)
        );
    }

    #[test]
    fn with_hash_seed_keeps_capacity() {
        let cfg = TableConfig::new(4096).with_hash_seed(7);
        assert_eq!(cfg.filter_bits, 4096);
        assert_eq!(cfg.hash_seed, 7);
    }

    #[test]
    fn from_env_reads_and_falls_back() {
        std::env::set_var("SST_FILTER_BITS", "2048");
        std::env::set_var("SST_HASH_SEED", "not-a-number");
        let cfg = TableConfig::from_env();
        std::env::remove_var("SST_FILTER_BITS");
        std::env::remove_var("SST_HASH_SEED");

        assert_eq!(cfg.filter_bits, 2048);
        assert_eq!(cfg.hash_seed, DEFAULT_HASH_SEED);
    }
}
