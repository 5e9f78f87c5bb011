// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Pool discovery
//!
//! Resolves pools for token pairs and token pairs for pools, consulting the
//! [`PairRegistry`] before touching the chain, and enumerates every pool of a
//! UniswapV2-style factory in bounded concurrent batches.
//!
//! # Enumeration
//!
//! Pool addresses are fetched `batch_size` at a time: all `allPairs(i)` calls
//! of a batch run concurrently, then the fetched pools' tokens are resolved
//! concurrently, and only then does the next batch start. A pool whose address
//! cannot be fetched, or whose contract doesn't answer `token0()`/`token1()`,
//! is skipped with a warning instead of failing the whole enumeration.

use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::Address;
use futures::future::join_all;
use tracing::{debug, info, warn, Instrument};

use crate::config::constants::{MAX_ENUMERABLE_POOLS, NO_POOL_SENTINEL};
use crate::contracts::{ContractAccessor, Factory};
use crate::errors::DiscoveryError;
use crate::registry::PairRegistry;
use crate::spans;
use crate::types::config::BatchSize;
use crate::types::pair::{PairTokens, TokenPair};

/// Resolves and enumerates the pools of one DEX
#[derive(Debug)]
pub struct PoolDiscovery {
    registry: Arc<PairRegistry>,
    contracts: Arc<ContractAccessor>,
    batch_size: BatchSize,
}

impl PoolDiscovery {
    /// Create a discovery service over a registry and contract accessor
    pub fn new(
        registry: Arc<PairRegistry>,
        contracts: Arc<ContractAccessor>,
        batch_size: BatchSize,
    ) -> Self {
        Self {
            registry,
            contracts,
            batch_size,
        }
    }

    /// The registry this service fills
    pub fn registry(&self) -> &Arc<PairRegistry> {
        &self.registry
    }

    /// Pool address of `(token_a, token_b)`
    ///
    /// # Errors
    ///
    /// - [`DiscoveryError::NoPoolExists`] if the factory returns the zero address
    /// - [`DiscoveryError::Rpc`] if the factory call fails
    pub async fn resolve_pool_address(
        &self,
        token_a: Address,
        token_b: Address,
    ) -> Result<Address, DiscoveryError> {
        if let Some(pool) = self.registry.lookup_pool(token_a, token_b) {
            debug!(pool = %pool, "Pool address cache hit");
            return Ok(pool);
        }

        let factory = self.contracts.factory();
        let pool = factory
            .get_pair(token_a, token_b)
            .instrument(spans::resolve_pool_address(token_a, token_b))
            .await?;

        if pool == NO_POOL_SENTINEL {
            return Err(DiscoveryError::no_pool_exists(token_a, token_b));
        }

        // UniswapV2 pairs store their tokens sorted by address
        let pair = TokenPair::sorted(token_a, token_b);
        self.registry.register(pool, pair.token0, pair.token1);

        Ok(pool)
    }

    /// Token pair of `pool`, in on-chain order
    ///
    /// Never fails: a contract that doesn't answer as a pair yields
    /// [`PairTokens::Unavailable`].
    pub async fn resolve_pool_tokens(&self, pool: Address) -> PairTokens {
        if let Some(pair) = self.registry.lookup_tokens(pool) {
            return PairTokens::Resolved(pair);
        }

        let result = self
            .contracts
            .pair(pool)
            .tokens()
            .instrument(spans::resolve_pool_tokens(pool))
            .await;

        match result {
            Ok(pair) => {
                self.registry.register(pool, pair.token0, pair.token1);
                PairTokens::Resolved(pair)
            }
            Err(e) => {
                debug!(pool = %pool, error = %e, "Contract did not answer as a pair");
                PairTokens::Unavailable
            }
        }
    }

    /// Token pair of `pool`, failing if it cannot be resolved
    pub async fn require_pool_tokens(&self, pool: Address) -> Result<TokenPair, DiscoveryError> {
        self.resolve_pool_tokens(pool)
            .await
            .pair()
            .ok_or(DiscoveryError::PoolTokensUnavailable { pool })
    }

    /// Every pool created by the factory, keyed by pool address
    ///
    /// # Errors
    ///
    /// - [`DiscoveryError::UnsupportedFactory`] if the factory cannot enumerate
    /// - [`DiscoveryError::ImplausiblePoolCount`] if the factory reports more
    ///   than [`MAX_ENUMERABLE_POOLS`] pools
    /// - [`DiscoveryError::Rpc`] if the pool count cannot be read
    pub async fn enumerate_all_pools(&self) -> Result<HashMap<Address, TokenPair>, DiscoveryError> {
        let factory = self.contracts.factory();
        if !factory.supports_enumeration() {
            return Err(DiscoveryError::unsupported_factory(
                factory.name(),
                "enumerate_all_pools",
            ));
        }

        let span = spans::enumerate_all_pools(factory.address(), self.batch_size.get());
        async move {
            let total = factory.all_pairs_length().await?;
            if total > MAX_ENUMERABLE_POOLS {
                return Err(DiscoveryError::implausible_pool_count(factory.address(), total));
            }
            let step = self.batch_size.get() as u64;
            info!(
                total = total,
                batches = self.batch_size.batches_for(total),
                "Enumerating pools"
            );

            let mut pools = HashMap::new();
            let mut start = 0u64;
            while start < total {
                let end = start.saturating_add(step).min(total);
                self.enumerate_batch(factory.as_ref(), start, end, &mut pools)
                    .instrument(spans::enumerate_batch(start, end))
                    .await;
                info!(
                    processed = end,
                    total = total,
                    pools = pools.len(),
                    "Enumeration batch complete"
                );
                start = end;
            }

            Ok(pools)
        }
        .instrument(span)
        .await
    }

    async fn enumerate_batch(
        &self,
        factory: &dyn Factory,
        start: u64,
        end: u64,
        pools: &mut HashMap<Address, TokenPair>,
    ) {
        let fetched = join_all((start..end).map(|index| factory.pair_at(index))).await;

        let addresses: Vec<Address> = fetched
            .into_iter()
            .zip(start..end)
            .filter_map(|(result, index)| match result {
                Ok(pool) => Some(pool),
                Err(e) => {
                    warn!(index = index, error = %e, "Skipping pool: address fetch failed");
                    None
                }
            })
            .collect();

        let resolved = join_all(addresses.iter().map(|&pool| self.resolve_pool_tokens(pool))).await;

        for (pool, tokens) in addresses.into_iter().zip(resolved) {
            match tokens {
                PairTokens::Resolved(pair) => {
                    pools.insert(pool, pair);
                }
                PairTokens::Unavailable => {
                    warn!(pool = %pool, "Skipping pool: token0/token1 unavailable");
                }
            }
        }
    }
}
