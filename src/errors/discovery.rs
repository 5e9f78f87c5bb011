// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for pool discovery and reserve subscriptions.

use alloy_primitives::Address;

use super::RpcError;

/// Errors that can occur while resolving pools through a factory or
/// subscribing to a pool's reserve updates.
///
/// # Examples
///
/// ```rust,ignore
/// use dexters::DiscoveryError;
///
/// match dex.resolve_pool_address(weth, usdc).await {
///     Ok(pool) => println!("pool: {pool}"),
///     Err(DiscoveryError::NoPoolExists { .. }) => println!("no liquidity for this pair"),
///     Err(e) => return Err(e.into()),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// The factory returned the zero address for the requested pair.
    ///
    /// Recoverable: best-effort callers (stablecoin pool discovery) skip it,
    /// callers asking for one explicit pair surface it.
    #[error("No pool exists for {token_a} and {token_b}")]
    NoPoolExists {
        /// First token of the requested pair
        token_a: Address,
        /// Second token of the requested pair
        token_b: Address,
    },

    /// The factory contract does not support the requested operation.
    #[error("Unsupported factory {factory}: {operation} is not available")]
    UnsupportedFactory {
        /// Factory contract name from the dataset
        factory: String,
        /// Operation that was requested
        operation: &'static str,
    },

    /// The factory reported more pools than can be enumerated.
    #[error("Factory {factory} reports {count} pools, more than can be enumerated")]
    ImplausiblePoolCount {
        /// Factory address
        factory: Address,
        /// Pool count returned by `allPairsLength()`
        count: u64,
    },

    /// The pool does not implement `token0()`/`token1()`.
    #[error("Could not resolve the token pair of pool {pool}")]
    PoolTokensUnavailable {
        /// Pool address
        pool: Address,
    },

    /// RPC error when talking to the factory or pool contracts.
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),
}

impl DiscoveryError {
    /// Create a `NoPoolExists` error for a token pair.
    pub fn no_pool_exists(token_a: Address, token_b: Address) -> Self {
        DiscoveryError::NoPoolExists { token_a, token_b }
    }

    /// Create an `UnsupportedFactory` error.
    pub fn unsupported_factory(factory: impl Into<String>, operation: &'static str) -> Self {
        DiscoveryError::UnsupportedFactory {
            factory: factory.into(),
            operation,
        }
    }

    /// Create an `ImplausiblePoolCount` error.
    pub fn implausible_pool_count(factory: Address, count: u64) -> Self {
        DiscoveryError::ImplausiblePoolCount { factory, count }
    }

    /// Returns `true` when this error only means "no pool for this pair".
    pub fn is_no_pool(&self) -> bool {
        matches!(self, DiscoveryError::NoPoolExists { .. })
    }
}
