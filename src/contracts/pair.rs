// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! UniswapV2-style pair (pool) contracts

use std::fmt;
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use alloy_rpc_types::{Filter, Log};
use alloy_sol_types::SolEvent;
use futures::future;

use super::{read, IUniswapV2Pair};
use crate::connection::{Connection, LogStream};
use crate::errors::RpcError;
use crate::types::pair::TokenPair;
use crate::types::sync::{PoolReserves, TokenReserve};

/// Handle for one pair contract
pub struct PairContract {
    address: Address,
    connection: Arc<dyn Connection>,
}

impl PairContract {
    /// Create a handle for the pair at `address`
    pub fn new(address: Address, connection: Arc<dyn Connection>) -> Self {
        Self {
            address,
            connection,
        }
    }

    /// Pair contract address
    pub fn address(&self) -> Address {
        self.address
    }

    /// `token0()`
    pub async fn token0(&self) -> Result<Address, RpcError> {
        read(self.connection.as_ref(), self.address, IUniswapV2Pair::token0Call {}).await
    }

    /// `token1()`
    pub async fn token1(&self) -> Result<Address, RpcError> {
        read(self.connection.as_ref(), self.address, IUniswapV2Pair::token1Call {}).await
    }

    /// Both tokens, read concurrently
    pub async fn tokens(&self) -> Result<TokenPair, RpcError> {
        let (token0, token1) = future::try_join(self.token0(), self.token1()).await?;
        Ok(TokenPair::new(token0, token1))
    }

    /// Current reserves, attributed to the given (already resolved) tokens
    pub async fn reserves(&self, tokens: TokenPair) -> Result<PoolReserves, RpcError> {
        let reserves = read(
            self.connection.as_ref(),
            self.address,
            IUniswapV2Pair::getReservesCall {},
        )
        .await?;

        Ok(PoolReserves {
            pool: self.address,
            token0: TokenReserve::new(tokens.token0, U256::from(reserves.reserve0)),
            token1: TokenReserve::new(tokens.token1, U256::from(reserves.reserve1)),
            block_timestamp_last: reserves.blockTimestampLast,
        })
    }

    /// Log filter matching this pair's `Sync` events
    pub fn sync_filter(&self) -> Filter {
        Filter::new()
            .address(self.address)
            .event_signature(IUniswapV2Pair::Sync::SIGNATURE_HASH)
    }

    /// Live stream of this pair's `Sync` logs
    pub async fn subscribe_sync(&self) -> Result<LogStream, RpcError> {
        self.connection.subscribe_logs(self.sync_filter()).await
    }
}

impl fmt::Debug for PairContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairContract")
            .field("address", &self.address)
            .finish()
    }
}

/// Decode a `Sync(uint112,uint112)` log into `(reserve0, reserve1)`
pub fn decode_sync(log: &Log) -> Result<(U256, U256), alloy_sol_types::Error> {
    let event = IUniswapV2Pair::Sync::decode_log(&log.inner)?;
    Ok((U256::from(event.data.reserve0), U256::from(event.data.reserve1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, aliases::U112, LogData};

    const POOL: Address = address!("00000000000000000000000000000000000000aa");

    fn sync_log(reserve0: u64, reserve1: u64) -> Log {
        let event = IUniswapV2Pair::Sync {
            reserve0: U112::from(reserve0),
            reserve1: U112::from(reserve1),
        };
        Log {
            inner: alloy_primitives::Log {
                address: POOL,
                data: event.encode_log_data(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_sync() {
        let (reserve0, reserve1) = decode_sync(&sync_log(1_000, 2_000)).unwrap();
        assert_eq!(reserve0, U256::from(1_000u64));
        assert_eq!(reserve1, U256::from(2_000u64));
    }

    #[test]
    fn test_decode_sync_rejects_other_events() {
        let log = Log {
            inner: alloy_primitives::Log {
                address: POOL,
                data: LogData::new_unchecked(vec![], Default::default()),
            },
            ..Default::default()
        };
        assert!(decode_sync(&log).is_err());
    }
}
