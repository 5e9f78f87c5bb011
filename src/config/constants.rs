//! Well-known addresses and constants
//!
//! This module centralizes magic constants used throughout the dexters crate.

use std::time::Duration;

use alloy_primitives::Address;

/// Address returned by UniswapV2-style factories when no pool exists.
pub const NO_POOL_SENTINEL: Address = Address::ZERO;

/// Number of `allPairs(i)` requests issued concurrently per enumeration batch.
pub const DEFAULT_ENUMERATION_BATCH_SIZE: usize = 64;

/// Largest `allPairsLength()` answer enumeration will accept.
pub const MAX_ENUMERABLE_POOLS: u64 = 100_000_000;

/// Default timeout applied to every request sent through
/// [`AlloyConnection`](crate::AlloyConnection).
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// Contract names used by the dataset for factory shapes.
pub mod factories {
    /// UniswapV2 factory and its forks (SushiSwap, QuickSwap, PancakeSwap V2, ...)
    pub const UNISWAP_V2: &str = "UniswapV2Factory";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_is_zero_address() {
        assert_eq!(NO_POOL_SENTINEL, Address::ZERO);
        assert!(NO_POOL_SENTINEL.is_zero());
    }

    #[test]
    fn test_default_batch_size() {
        assert_eq!(DEFAULT_ENUMERATION_BATCH_SIZE, 64);
    }
}
