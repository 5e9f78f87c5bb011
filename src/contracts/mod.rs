// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Typed access to factory, pair and ERC-20 contracts
//!
//! Contract interfaces are declared with [`sol!`] and every read goes through
//! the [`Connection`] as an ABI-encoded `eth_call`. The [`ContractAccessor`]
//! hands out one memoized handle per contract address.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::{sol, SolCall};

use crate::connection::Connection;
use crate::errors::RpcError;

pub mod erc20;
pub mod factory;
pub mod pair;

pub use erc20::TokenContract;
pub use factory::{factory_for_contract, Factory, PairLookupFactory, UniswapV2Factory};
pub use pair::{decode_sync, PairContract};

sol! {
    /// UniswapV2-style factory
    interface IUniswapV2Factory {
        function getPair(address tokenA, address tokenB) external view returns (address pair);
        function allPairs(uint256 index) external view returns (address pair);
        function allPairsLength() external view returns (uint256);
    }

    /// UniswapV2-style pair (pool)
    interface IUniswapV2Pair {
        event Sync(uint112 reserve0, uint112 reserve1);

        function token0() external view returns (address);
        function token1() external view returns (address);
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
    }

    /// ERC-20 metadata extension
    interface IERC20Metadata {
        function decimals() external view returns (uint8);
        function symbol() external view returns (string);
    }
}

/// Execute a read-only call and decode its return value
pub(crate) async fn read<C: SolCall>(
    connection: &dyn Connection,
    to: Address,
    call: C,
) -> Result<C::Return, RpcError> {
    let output = connection
        .call(to, Bytes::from(call.abi_encode()))
        .await
        .map_err(|e| match e {
            RpcError::CallFailed { source, .. } => RpcError::CallFailed {
                contract: to,
                method: C::SIGNATURE,
                source,
            },
            other => other,
        })?;

    C::abi_decode_returns(&output)
        .map_err(|e| RpcError::decode_failed(to, C::SIGNATURE, e.to_string()))
}

/// Lazily created, memoized contract handles for one DEX
///
/// Holds a single factory handle plus one handle per pair and per token
/// address, all sharing the same connection.
pub struct ContractAccessor {
    connection: Arc<dyn Connection>,
    factory: Arc<dyn Factory>,
    pairs: Mutex<HashMap<Address, Arc<PairContract>>>,
    tokens: Mutex<HashMap<Address, Arc<TokenContract>>>,
}

impl ContractAccessor {
    /// Create an accessor around an already constructed factory handle
    pub fn new(connection: Arc<dyn Connection>, factory: Arc<dyn Factory>) -> Self {
        Self {
            connection,
            factory,
            pairs: Mutex::new(HashMap::new()),
            tokens: Mutex::new(HashMap::new()),
        }
    }

    /// Create an accessor for the factory contract `factory_name` at `address`
    pub fn for_factory(
        connection: Arc<dyn Connection>,
        factory_name: &str,
        address: Address,
    ) -> Self {
        let factory = factory_for_contract(factory_name, address, Arc::clone(&connection));
        Self::new(connection, factory)
    }

    /// The underlying connection
    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    /// The DEX factory
    pub fn factory(&self) -> Arc<dyn Factory> {
        Arc::clone(&self.factory)
    }

    /// Handle for the pair contract at `address`
    pub fn pair(&self, address: Address) -> Arc<PairContract> {
        let mut pairs = self.pairs.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            pairs
                .entry(address)
                .or_insert_with(|| Arc::new(PairContract::new(address, Arc::clone(&self.connection)))),
        )
    }

    /// Handle for the ERC-20 contract at `address`
    pub fn token(&self, address: Address) -> Arc<TokenContract> {
        let mut tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(tokens.entry(address).or_insert_with(|| {
            Arc::new(TokenContract::new(address, Arc::clone(&self.connection)))
        }))
    }
}

impl std::fmt::Debug for ContractAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractAccessor")
            .field("factory", &self.factory)
            .finish_non_exhaustive()
    }
}
