// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! One DEX on one chain
//!
//! [`Dex`] owns the per-DEX state (pair registry, contract handles, decimals
//! and symbol caches, active listeners) and exposes the oracle operations.
//!
//! # Example
//!
//! ```rust,ignore
//! use dexters::{Callback, Dexters, OracleConfig};
//!
//! let dexters = Dexters::connect_ws(dataset, "wss://polygon.example/ws", OracleConfig::default()).await?;
//! let sushiswap = dexters.dex("sushiswap")?;
//!
//! let feed = sushiswap
//!     .subscribe_native_usd_price(Callback::from_fn(|update| {
//!         println!("native token: {update}");
//!     }))
//!     .await?;
//! ```

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use alloy_chains::Chain;
use alloy_primitives::Address;
use tracing::debug;

use crate::callback::{PriceCallback, ReserveCallback, UsdPriceCallback};
use crate::config::OracleConfig;
use crate::connection::Connection;
use crate::contracts::{ContractAccessor, Factory};
use crate::dataset::{find_token, ChainDataset, DexDataset, TokenInfo, TokenMap};
use crate::discovery::PoolDiscovery;
use crate::errors::{DatasetError, DiscoveryError, OracleError, RpcError};
use crate::listener::ReserveListener;
use crate::oracle::{relative_prices, DecimalsCache, PriceNormalizer, UsdAggregator, UsdPriceFeed};
use crate::registry::PairRegistry;
use crate::subscription::Subscription;
use crate::types::pair::{PairTokens, TokenPair};
use crate::types::price::RelativePrices;
use crate::types::sync::{PoolReserves, SyncRecord};
use crate::types::tokens::decimals::TokenDecimals;

/// Price oracle for one DEX
pub struct Dex {
    id: String,
    chain: Chain,
    wrapped_native_token: Option<Address>,
    tokens: TokenMap,
    stablecoins: TokenMap,
    known_tokens: TokenMap,
    symbols: RwLock<HashMap<Address, String>>,
    contracts: Arc<ContractAccessor>,
    discovery: Arc<PoolDiscovery>,
    listener: Arc<ReserveListener>,
    normalizer: Arc<PriceNormalizer>,
    aggregator: UsdAggregator,
}

impl Dex {
    /// Wire up the oracle components for `dex`
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::MissingContract`] if the DEX factory has no
    /// address on this chain.
    pub fn new(
        chain: &ChainDataset,
        dex: DexDataset,
        connection: Arc<dyn Connection>,
        config: &OracleConfig,
    ) -> Result<Self, DatasetError> {
        let factory_address = dex.factory_address()?;
        let contracts = Arc::new(ContractAccessor::for_factory(
            connection,
            dex.factory_name(),
            factory_address,
        ));

        // Chain-wide entries first so DEX entries win on conflict
        let known_tokens: TokenMap = chain
            .tokens
            .values()
            .chain(chain.stablecoins.values())
            .chain(dex.tokens.values())
            .chain(dex.stablecoins.values())
            .map(|token| (token.address, token.clone()))
            .collect();

        let decimals = Arc::new(DecimalsCache::seeded(
            known_tokens
                .values()
                .map(|token| (token.address, token.decimals)),
        ));

        let registry = Arc::new(PairRegistry::new());
        let discovery = Arc::new(PoolDiscovery::new(
            registry,
            Arc::clone(&contracts),
            config.enumeration_batch_size,
        ));
        let listener = Arc::new(ReserveListener::new(
            Arc::clone(&discovery),
            Arc::clone(&contracts),
        ));
        let normalizer = Arc::new(PriceNormalizer::new(Arc::clone(&contracts), decimals));

        let stablecoin_source = if dex.stablecoins.is_empty() {
            &chain.stablecoins
        } else {
            &dex.stablecoins
        };
        let mut stablecoins: Vec<TokenInfo> = stablecoin_source.values().cloned().collect();
        stablecoins.sort_by_key(|token| token.address);

        let aggregator = UsdAggregator::new(
            Arc::clone(&discovery),
            Arc::clone(&listener),
            Arc::clone(&normalizer),
            stablecoins,
            config.clone(),
        );

        debug!(
            dex = %dex.id,
            factory = %factory_address,
            known_tokens = known_tokens.len(),
            "Initialized DEX"
        );

        Ok(Self {
            id: dex.id,
            chain: chain.chain(),
            wrapped_native_token: chain.metadata.wrapped_native_token_address,
            tokens: dex.tokens,
            stablecoins: dex.stablecoins,
            known_tokens,
            symbols: RwLock::new(HashMap::new()),
            contracts,
            discovery,
            listener,
            normalizer,
            aggregator,
        })
    }

    /// DEX identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Chain the DEX is deployed on
    pub fn chain(&self) -> Chain {
        self.chain
    }

    /// The DEX factory
    pub fn factory(&self) -> Arc<dyn Factory> {
        self.contracts.factory()
    }

    /// Pair registry filled by discovery
    pub fn registry(&self) -> &Arc<PairRegistry> {
        self.discovery.registry()
    }

    /// Tokens listed for this DEX
    pub fn tokens(&self) -> &TokenMap {
        &self.tokens
    }

    /// Stablecoins listed for this DEX
    pub fn stablecoins(&self) -> &TokenMap {
        &self.stablecoins
    }

    /// Token of this DEX by symbol or address
    pub fn token(&self, symbol_or_address: &str) -> Option<&TokenInfo> {
        find_token(&self.tokens, symbol_or_address)
    }

    /// Decimals of `token`: dataset first, then `decimals()` (memoized)
    pub async fn token_decimals(&self, token: Address) -> Result<TokenDecimals, RpcError> {
        self.normalizer.token_decimals(token).await
    }

    /// Symbol of `token`: dataset first, then `symbol()` (memoized)
    pub async fn token_symbol(&self, token: Address) -> Result<String, RpcError> {
        if let Some(info) = self.known_tokens.get(&token) {
            return Ok(info.symbol.clone());
        }
        if let Some(symbol) = self
            .symbols
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&token)
        {
            return Ok(symbol.clone());
        }

        let symbol = self.contracts.token(token).symbol().await?;
        self.symbols
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token, symbol.clone());
        Ok(symbol)
    }

    /// Pool address of `(token_a, token_b)`
    pub async fn resolve_pool_address(
        &self,
        token_a: Address,
        token_b: Address,
    ) -> Result<Address, DiscoveryError> {
        self.discovery.resolve_pool_address(token_a, token_b).await
    }

    /// Token pair of `pool`
    pub async fn resolve_pool_tokens(&self, pool: Address) -> PairTokens {
        self.discovery.resolve_pool_tokens(pool).await
    }

    /// Every pool of the factory with its token pair
    pub async fn enumerate_all_pools(&self) -> Result<HashMap<Address, TokenPair>, DiscoveryError> {
        self.discovery.enumerate_all_pools().await
    }

    /// Current reserves of `pool`
    pub async fn pool_reserves(&self, pool: Address) -> Result<PoolReserves, DiscoveryError> {
        let tokens = self.discovery.require_pool_tokens(pool).await?;
        Ok(self.contracts.pair(pool).reserves(tokens).await?)
    }

    /// Raw reserve updates of `pool`
    pub async fn subscribe_reserves(
        &self,
        pool: Address,
        callback: ReserveCallback,
    ) -> Result<Subscription, DiscoveryError> {
        self.listener.subscribe(pool, callback).await
    }

    /// Relative price updates of `pool`
    ///
    /// Updates where neither token has a price are not delivered.
    pub async fn subscribe_pool_price(
        &self,
        pool: Address,
        callback: PriceCallback,
    ) -> Result<Subscription, DiscoveryError> {
        let normalizer = Arc::clone(&self.normalizer);
        let on_reserves = ReserveCallback::with_id(callback.id(), move |record: SyncRecord| {
            let normalizer = Arc::clone(&normalizer);
            let callback = callback.clone();
            async move {
                if let Some(observation) = normalizer.normalize(&record).await {
                    callback.call(observation).await;
                }
            }
        });

        self.listener.subscribe(pool, on_reserves).await
    }

    /// Relative price updates of the `(token_a, token_b)` pool
    pub async fn subscribe_relative_price(
        &self,
        token_a: Address,
        token_b: Address,
        callback: PriceCallback,
    ) -> Result<Subscription, DiscoveryError> {
        let pool = self.resolve_pool_address(token_a, token_b).await?;
        self.subscribe_pool_price(pool, callback).await
    }

    /// Reserve-weighted USD price of `token` over the DEX's stablecoin pools
    pub async fn subscribe_usd_price(
        &self,
        token: Address,
        callback: UsdPriceCallback,
    ) -> Result<UsdPriceFeed, OracleError> {
        self.aggregator.subscribe(token, callback).await
    }

    /// USD price of the chain's wrapped native token
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::MissingWrappedNativeToken`] if the chain
    /// metadata has no wrapped native token.
    pub async fn subscribe_native_usd_price(
        &self,
        callback: UsdPriceCallback,
    ) -> Result<UsdPriceFeed, OracleError> {
        let token = self
            .wrapped_native_token
            .ok_or_else(|| OracleError::MissingWrappedNativeToken {
                chain: self.chain.to_string(),
            })?;
        self.subscribe_usd_price(token, callback).await
    }

    /// Current relative prices of `token_a` and `token_b` from one reserve read
    ///
    /// # Errors
    ///
    /// - [`OracleError::Discovery`] if no pool exists
    /// - [`OracleError::PriceUnavailable`] if either reserve is zero
    pub async fn current_relative_prices(
        &self,
        token_a: Address,
        token_b: Address,
    ) -> Result<RelativePrices, OracleError> {
        let pool = self.resolve_pool_address(token_a, token_b).await?;
        let reserves = self.pool_reserves(pool).await?;
        let (decimals0, decimals1) = futures::future::try_join(
            self.token_decimals(reserves.token0.token),
            self.token_decimals(reserves.token1.token),
        )
        .await?;

        let observation = relative_prices(&reserves.to_sync_record(), decimals0, decimals1);
        let price_of = |token: Address| {
            observation
                .price_of(token)
                .cloned()
                .ok_or_else(|| OracleError::price_unavailable(pool, format!("zero reserve of {token}")))
        };

        Ok(RelativePrices {
            token_a,
            price_a: price_of(token_a)?,
            token_b,
            price_b: price_of(token_b)?,
        })
    }
}

impl std::fmt::Debug for Dex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dex")
            .field("id", &self.id)
            .field("chain", &self.chain)
            .field("factory", &self.contracts.factory())
            .finish_non_exhaustive()
    }
}
