// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for price feeds and one-shot price queries.

use alloy_primitives::Address;

use super::{DiscoveryError, RpcError};

/// Errors that can occur while setting up a price feed or computing a
/// one-shot price.
///
/// Errors that happen while a feed is already running (a failed block fetch,
/// a zero reserve) never surface here: the affected event is dropped and the
/// feed keeps running.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// None of the DEX's stablecoins has a pool against the token.
    #[error("No stablecoin pool found for token {token}")]
    NoStablecoinLiquidity {
        /// Token whose USD price was requested
        token: Address,
    },

    /// The chain metadata has no wrapped native token address.
    #[error("Wrapped native token is not set for chain {chain}")]
    MissingWrappedNativeToken {
        /// Chain name or id
        chain: String,
    },

    /// A price could not be computed from the pool's current reserves.
    #[error("Price unavailable for pool {pool}: {reason}")]
    PriceUnavailable {
        /// Pool the price was read from
        pool: Address,
        /// Why no price could be derived
        reason: String,
    },

    /// Pool discovery failed.
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    /// RPC error outside of pool discovery (e.g. fetching decimals).
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),
}

impl OracleError {
    /// Create a `PriceUnavailable` error.
    pub fn price_unavailable(pool: Address, reason: impl Into<String>) -> Self {
        OracleError::PriceUnavailable {
            pool,
            reason: reason.into(),
        }
    }
}
