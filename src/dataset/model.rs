// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Serde model of chain and DEX metadata files

use std::collections::HashMap;

use alloy_chains::Chain;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::errors::DatasetError;
use crate::types::tokens::decimals::TokenDecimals;

/// Static metadata of one token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Token contract address
    pub address: Address,
    /// Ticker symbol (e.g. `USDC`)
    pub symbol: String,
    /// Token decimals
    pub decimals: TokenDecimals,
    /// Human readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl TokenInfo {
    /// Create token metadata without a name
    pub fn new(address: Address, symbol: impl Into<String>, decimals: TokenDecimals) -> Self {
        Self {
            address,
            symbol: symbol.into(),
            decimals,
            name: None,
        }
    }
}

/// Tokens keyed by address, as stored in `tokens.json`/`stablecoins.json`
pub type TokenMap = HashMap<Address, TokenInfo>;

/// Build a [`TokenMap`] from a list of tokens
pub fn token_map(tokens: impl IntoIterator<Item = TokenInfo>) -> TokenMap {
    tokens
        .into_iter()
        .map(|token| (token.address, token))
        .collect()
}

/// Find a token by symbol, then by address string
pub(crate) fn find_token<'a>(tokens: &'a TokenMap, symbol_or_address: &str) -> Option<&'a TokenInfo> {
    tokens
        .values()
        .find(|token| token.symbol == symbol_or_address)
        .or_else(|| {
            symbol_or_address
                .parse::<Address>()
                .ok()
                .and_then(|address| tokens.get(&address))
        })
}

/// Native currency of a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    /// Currency name
    pub name: String,
    /// Currency symbol (e.g. `MATIC`)
    pub symbol: String,
    /// Currency decimals
    pub decimals: u8,
}

/// `blockchains/<chain>/metadata.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainMetadata {
    /// EIP-155 chain id
    pub chain_id: u64,
    /// Chain name
    pub name: String,
    /// JSON-RPC endpoints, preferred first
    #[serde(default)]
    pub rpc: Vec<String>,
    /// Identifiers of the DEXes deployed on this chain
    #[serde(default)]
    pub dexes: Vec<String>,
    /// Wrapped native token (e.g. WMATIC)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapped_native_token_address: Option<Address>,
    /// Native currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_currency: Option<NativeCurrency>,
}

impl ChainMetadata {
    /// The chain as an alloy [`Chain`]
    pub fn chain(&self) -> Chain {
        Chain::from_id(self.chain_id)
    }
}

/// Contract names used by a DEX, by contract role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractTypes {
    /// Factory contract name (e.g. `UniswapV2Factory`)
    pub factory: String,
    /// Pair contract name (e.g. `UniswapV2Pair`)
    pub pair: String,
    /// Router contract name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router: Option<String>,
}

/// `dexes/<dex>/metadata.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexMetadata {
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Contract names by role
    pub contract_type_to_contract_name: ContractTypes,
}

/// One entry of `dexes/<dex>/contracts/<chain>.json`
///
/// Other fields (ABI, deployment block) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfo {
    /// Deployed contract address
    pub address: Address,
}

/// Metadata of one DEX on one chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DexDataset {
    /// DEX identifier (e.g. `sushiswap`)
    pub id: String,
    /// DEX metadata
    pub metadata: DexMetadata,
    /// Deployed contracts by contract name
    pub contracts: HashMap<String, ContractInfo>,
    /// Tokens traded on this DEX
    pub tokens: TokenMap,
    /// Stablecoins used for USD price feeds
    pub stablecoins: TokenMap,
}

impl DexDataset {
    /// Contract name of the DEX factory
    pub fn factory_name(&self) -> &str {
        &self.metadata.contract_type_to_contract_name.factory
    }

    /// Address of the DEX factory
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::MissingContract`] if the factory contract has
    /// no deployed address on this chain.
    pub fn factory_address(&self) -> Result<Address, DatasetError> {
        self.contracts
            .get(self.factory_name())
            .map(|contract| contract.address)
            .ok_or_else(|| DatasetError::missing_contract(&self.id, "factory"))
    }
}

/// Metadata of one chain and every DEX it lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainDataset {
    /// Chain metadata
    pub metadata: ChainMetadata,
    /// Chain-wide token list
    pub tokens: TokenMap,
    /// Chain-wide stablecoin list
    pub stablecoins: TokenMap,
    /// DEX metadata by DEX id
    pub dexes: HashMap<String, DexDataset>,
}

impl ChainDataset {
    /// The chain as an alloy [`Chain`]
    pub fn chain(&self) -> Chain {
        self.metadata.chain()
    }
}
