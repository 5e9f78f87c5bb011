//! Configuration for dexters operations
//!
//! This module controls the tunable parts of the oracle: how many pool
//! addresses are fetched concurrently during enumeration, how long a single RPC
//! request may take, and which stablecoins are left out of USD price feeds.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use dexters::OracleConfig;
//!
//! // 64 requests per enumeration batch, 30s RPC timeout, no exclusions
//! let config = OracleConfig::default();
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use dexters::OracleConfigBuilder;
//! use std::time::Duration;
//!
//! let config = OracleConfigBuilder::new()
//!     .enumeration_batch_size(32)
//!     .rpc_timeout(Duration::from_secs(10))
//!     .exclude_stablecoin("BUSD")
//!     .build();
//! ```

use std::collections::HashSet;
use std::time::Duration;

use crate::types::config::BatchSize;

pub mod constants;

use constants::DEFAULT_RPC_TIMEOUT;

/// Configuration for dexters operations
///
/// Use [`OracleConfigBuilder`] for a fluent API to construct instances.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Number of pool addresses fetched concurrently per enumeration batch
    /// Default: 64
    pub enumeration_batch_size: BatchSize,

    /// Timeout for a single RPC request
    /// Default: 30 seconds
    pub rpc_timeout: Duration,

    /// Stablecoin symbols (upper-cased) ignored by USD price feeds
    /// Default: empty
    pub excluded_stablecoins: HashSet<String>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            enumeration_batch_size: BatchSize::default(),
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
            excluded_stablecoins: HashSet::new(),
        }
    }
}

impl OracleConfig {
    /// Returns `true` if the stablecoin with this symbol should be left out of
    /// USD price feeds. Matching is case-insensitive.
    ///
    /// # Example
    ///
    /// ```rust
    /// use dexters::OracleConfigBuilder;
    ///
    /// let config = OracleConfigBuilder::new().exclude_stablecoin("busd").build();
    /// assert!(config.is_stablecoin_excluded("BUSD"));
    /// assert!(!config.is_stablecoin_excluded("USDC"));
    /// ```
    pub fn is_stablecoin_excluded(&self, symbol: &str) -> bool {
        self.excluded_stablecoins
            .contains(&symbol.to_ascii_uppercase())
    }
}

/// Builder for [`OracleConfig`]
///
/// # Example
///
/// ```rust
/// use dexters::OracleConfigBuilder;
///
/// let config = OracleConfigBuilder::new()
///     .enumeration_batch_size(16)
///     .build();
/// assert_eq!(config.enumeration_batch_size.get(), 16);
/// ```
#[derive(Debug, Default)]
pub struct OracleConfigBuilder {
    config: OracleConfig,
}

impl OracleConfigBuilder {
    /// Create a new builder with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the enumeration batch size (clamped to at least 1)
    pub fn enumeration_batch_size(mut self, size: usize) -> Self {
        self.config.enumeration_batch_size = BatchSize::new(size);
        self
    }

    /// Set the RPC timeout
    pub fn rpc_timeout(mut self, timeout: Duration) -> Self {
        self.config.rpc_timeout = timeout;
        self
    }

    /// Leave a stablecoin (by symbol) out of USD price feeds
    pub fn exclude_stablecoin(mut self, symbol: impl AsRef<str>) -> Self {
        self.config
            .excluded_stablecoins
            .insert(symbol.as_ref().to_ascii_uppercase());
        self
    }

    /// Build the final configuration
    pub fn build(self) -> OracleConfig {
        self.config
    }
}
