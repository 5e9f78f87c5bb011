// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Chain-level entry point

use std::collections::HashMap;
use std::sync::Arc;

use alloy_chains::Chain;
use alloy_primitives::Address;
use tracing::info;

use crate::config::OracleConfig;
use crate::connection::{Connection, RootConnection};
use crate::dataset::{find_token, ChainDataset, ChainMetadata, TokenInfo};
use crate::dex::Dex;
use crate::errors::{DatasetError, DextersError, RpcError};

/// DEX price oracles for one chain
///
/// Owns one [`Dex`] per DEX listed in the chain metadata, all sharing one
/// node connection.
///
/// # Examples
///
/// ```rust,no_run
/// use dexters::{ChainDataset, Dexters, OracleConfig};
///
/// # async fn example() -> Result<(), dexters::DextersError> {
/// let dataset = ChainDataset::from_dir("blockchain-datasets/data", 137).await?;
/// let dexters = Dexters::connect_http(dataset, OracleConfig::default())?;
///
/// let sushiswap = dexters.dex("sushiswap")?;
/// let wmatic = sushiswap.token("WMATIC").map(|t| t.address);
/// # Ok(())
/// # }
/// ```
pub struct Dexters {
    metadata: ChainMetadata,
    tokens: HashMap<Address, TokenInfo>,
    dexes: HashMap<String, Dex>,
}

impl Dexters {
    /// Build the oracles of every DEX listed by the chain
    ///
    /// # Errors
    ///
    /// - [`DatasetError::UnsupportedChainOrDex`] if a listed DEX has no metadata
    /// - [`DatasetError::MissingContract`] if a DEX factory has no address
    pub fn new(
        mut dataset: ChainDataset,
        connection: Arc<dyn Connection>,
        config: OracleConfig,
    ) -> Result<Self, DatasetError> {
        let chain = dataset.chain();
        let mut dexes = HashMap::with_capacity(dataset.metadata.dexes.len());

        for dex_id in &dataset.metadata.dexes {
            let dex = dataset
                .dexes
                .remove(dex_id)
                .ok_or_else(|| DatasetError::unsupported_dex(chain, dex_id))?;
            dexes.insert(
                dex_id.clone(),
                Dex::new(&dataset, dex, Arc::clone(&connection), &config)?,
            );
        }

        info!(chain = %chain, dexes = dexes.len(), "Dexters ready");

        Ok(Self {
            metadata: dataset.metadata,
            tokens: dataset.tokens,
            dexes,
        })
    }

    /// Connect over HTTP to the chain's first RPC endpoint
    ///
    /// HTTP connections serve one-shot queries; live feeds need
    /// [`connect_ws`](Self::connect_ws).
    pub fn connect_http(dataset: ChainDataset, config: OracleConfig) -> Result<Self, DextersError> {
        let url = first_rpc(&dataset)?;
        let connection = RootConnection::connect_http(url, config.rpc_timeout)?;
        Ok(Self::new(dataset, Arc::new(connection), config)?)
    }

    /// Connect over WebSocket to `url`
    #[cfg(feature = "ws")]
    pub async fn connect_ws(
        dataset: ChainDataset,
        url: &str,
        config: OracleConfig,
    ) -> Result<Self, DextersError> {
        let connection = RootConnection::connect_ws(url, config.rpc_timeout).await?;
        Ok(Self::new(dataset, Arc::new(connection), config)?)
    }

    /// The chain
    pub fn chain(&self) -> Chain {
        self.metadata.chain()
    }

    /// Chain metadata
    pub fn metadata(&self) -> &ChainMetadata {
        &self.metadata
    }

    /// Identifiers of the DEXes on this chain, in dataset order
    pub fn dex_ids(&self) -> &[String] {
        &self.metadata.dexes
    }

    /// The DEX with identifier `id`
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::UnsupportedChainOrDex`] for unknown ids.
    pub fn dex(&self, id: &str) -> Result<&Dex, DatasetError> {
        self.dexes
            .get(id)
            .ok_or_else(|| DatasetError::unsupported_dex(self.chain(), id))
    }

    /// Chain-wide token by symbol or address
    pub fn token(&self, symbol_or_address: &str) -> Option<&TokenInfo> {
        find_token(&self.tokens, symbol_or_address)
    }

    /// The chain's wrapped native token, if known
    pub fn wrapped_native_token(&self) -> Option<Address> {
        self.metadata.wrapped_native_token_address
    }
}

impl std::fmt::Debug for Dexters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dexters")
            .field("chain", &self.chain())
            .field("dexes", &self.metadata.dexes)
            .finish()
    }
}

fn first_rpc(dataset: &ChainDataset) -> Result<&str, RpcError> {
    dataset
        .metadata
        .rpc
        .first()
        .map(String::as_str)
        .ok_or_else(|| RpcError::ProviderUrlInvalid(format!("no RPC endpoint for {}", dataset.chain())))
}
