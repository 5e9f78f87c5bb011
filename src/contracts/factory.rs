// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! DEX factory contracts
//!
//! Every supported factory can look up the pool of a token pair. Only
//! UniswapV2-shaped factories can also enumerate every pool they created;
//! other shapes report [`DiscoveryError::UnsupportedFactory`] for enumeration.

use std::fmt;
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;

use super::{read, IUniswapV2Factory};
use crate::config::constants::factories;
use crate::connection::Connection;
use crate::errors::{DiscoveryError, RpcError};

/// A DEX factory contract
#[async_trait]
pub trait Factory: Send + Sync + fmt::Debug {
    /// Factory contract address
    fn address(&self) -> Address;

    /// Contract name from the DEX metadata (e.g. `UniswapV2Factory`)
    fn name(&self) -> &str;

    /// Pool address for a token pair; the zero address if no pool exists
    async fn get_pair(&self, token_a: Address, token_b: Address) -> Result<Address, RpcError>;

    /// Returns `true` if the factory can enumerate its pools
    fn supports_enumeration(&self) -> bool {
        false
    }

    /// Number of pools created by the factory
    async fn all_pairs_length(&self) -> Result<u64, DiscoveryError> {
        Err(DiscoveryError::unsupported_factory(self.name(), "allPairsLength"))
    }

    /// Address of the pool at `index` in creation order
    async fn pair_at(&self, _index: u64) -> Result<Address, DiscoveryError> {
        Err(DiscoveryError::unsupported_factory(self.name(), "allPairs"))
    }
}

/// Pick the factory implementation for a contract name from the DEX metadata
pub fn factory_for_contract(
    name: &str,
    address: Address,
    connection: Arc<dyn Connection>,
) -> Arc<dyn Factory> {
    match name {
        factories::UNISWAP_V2 => Arc::new(UniswapV2Factory::new(address, connection)),
        other => Arc::new(PairLookupFactory::new(other, address, connection)),
    }
}

/// UniswapV2 factory: pair lookup and full enumeration
pub struct UniswapV2Factory {
    address: Address,
    connection: Arc<dyn Connection>,
}

impl UniswapV2Factory {
    /// Create a handle for the factory at `address`
    pub fn new(address: Address, connection: Arc<dyn Connection>) -> Self {
        Self {
            address,
            connection,
        }
    }
}

impl fmt::Debug for UniswapV2Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniswapV2Factory")
            .field("address", &self.address)
            .finish()
    }
}

#[async_trait]
impl Factory for UniswapV2Factory {
    fn address(&self) -> Address {
        self.address
    }

    fn name(&self) -> &str {
        factories::UNISWAP_V2
    }

    async fn get_pair(&self, token_a: Address, token_b: Address) -> Result<Address, RpcError> {
        get_pair(self.connection.as_ref(), self.address, token_a, token_b).await
    }

    fn supports_enumeration(&self) -> bool {
        true
    }

    async fn all_pairs_length(&self) -> Result<u64, DiscoveryError> {
        let length = read(
            self.connection.as_ref(),
            self.address,
            IUniswapV2Factory::allPairsLengthCall {},
        )
        .await?;

        u64::try_from(length).map_err(|_| {
            RpcError::decode_failed(
                self.address,
                "allPairsLength()",
                format!("pool count {length} does not fit in u64"),
            )
            .into()
        })
    }

    async fn pair_at(&self, index: u64) -> Result<Address, DiscoveryError> {
        let pair = read(
            self.connection.as_ref(),
            self.address,
            IUniswapV2Factory::allPairsCall {
                index: U256::from(index),
            },
        )
        .await?;
        Ok(pair)
    }
}

/// Factory of any other shape: pair lookup through `getPair` only
pub struct PairLookupFactory {
    name: String,
    address: Address,
    connection: Arc<dyn Connection>,
}

impl PairLookupFactory {
    /// Create a handle for the factory contract `name` at `address`
    pub fn new(name: impl Into<String>, address: Address, connection: Arc<dyn Connection>) -> Self {
        Self {
            name: name.into(),
            address,
            connection,
        }
    }
}

impl fmt::Debug for PairLookupFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairLookupFactory")
            .field("name", &self.name)
            .field("address", &self.address)
            .finish()
    }
}

#[async_trait]
impl Factory for PairLookupFactory {
    fn address(&self) -> Address {
        self.address
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn get_pair(&self, token_a: Address, token_b: Address) -> Result<Address, RpcError> {
        get_pair(self.connection.as_ref(), self.address, token_a, token_b).await
    }
}

async fn get_pair(
    connection: &dyn Connection,
    factory: Address,
    token_a: Address,
    token_b: Address,
) -> Result<Address, RpcError> {
    read(
        connection,
        factory,
        IUniswapV2Factory::getPairCall {
            tokenA: token_a,
            tokenB: token_b,
        },
    )
    .await
}
