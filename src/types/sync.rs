// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Reserve snapshots produced by pool `Sync` events and `getReserves()` calls

use alloy_primitives::{Address, BlockNumber, U256};
use serde::{Deserialize, Serialize};

use super::pair::TokenPair;

/// Raw reserve of one token in a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenReserve {
    /// Token address
    pub token: Address,
    /// Raw reserve in the token's smallest unit
    pub reserve: U256,
}

impl TokenReserve {
    /// Create a new token reserve
    pub const fn new(token: Address, reserve: U256) -> Self {
        Self { token, reserve }
    }
}

/// Canonical record of one reserve update (`Sync` event) of a pool
///
/// Produced by the [`ReserveListener`](crate::ReserveListener) for every
/// decoded event and handed straight to the subscriber; it is not retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRecord {
    /// Pool that emitted the event
    pub pool: Address,
    /// Block that contains the event, if the node reported it
    pub block_number: Option<BlockNumber>,
    /// Unix timestamp of that block, `None` if the node has no such block
    pub timestamp: Option<u64>,
    /// Reserve of the pool's `token0`
    pub token0: TokenReserve,
    /// Reserve of the pool's `token1`
    pub token1: TokenReserve,
}

impl SyncRecord {
    /// The pool's tokens in on-chain order
    pub fn pair(&self) -> TokenPair {
        TokenPair::new(self.token0.token, self.token1.token)
    }

    /// Reserve of `token`, if it belongs to this pool
    pub fn reserve_of(&self, token: Address) -> Option<U256> {
        if token == self.token0.token {
            Some(self.token0.reserve)
        } else if token == self.token1.token {
            Some(self.token1.reserve)
        } else {
            None
        }
    }
}

/// Current reserves of a pool, read with a one-shot `getReserves()` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolReserves {
    /// Pool address
    pub pool: Address,
    /// Reserve of the pool's `token0`
    pub token0: TokenReserve,
    /// Reserve of the pool's `token1`
    pub token1: TokenReserve,
    /// `blockTimestampLast` as reported by the pool (seconds, mod 2^32)
    pub block_timestamp_last: u32,
}

impl PoolReserves {
    /// Reserve of `token`, if it belongs to this pool
    pub fn reserve_of(&self, token: Address) -> Option<U256> {
        if token == self.token0.token {
            Some(self.token0.reserve)
        } else if token == self.token1.token {
            Some(self.token1.reserve)
        } else {
            None
        }
    }

    /// View these reserves as a sync record (without block information)
    pub fn to_sync_record(&self) -> SyncRecord {
        SyncRecord {
            pool: self.pool,
            block_number: None,
            timestamp: Some(u64::from(self.block_timestamp_last)),
            token0: self.token0,
            token1: self.token1,
        }
    }
}
