// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Reserve to relative price conversion
//!
//! For a pool holding `r0` of `token0` (`d0` decimals) and `r1` of `token1`
//! (`d1` decimals):
//!
//! ```text
//! price(token0) = 10^(d0 - d1) * r1 / r0      (units of token1 per token0)
//! price(token1) = 10^(d1 - d0) * r0 / r1      (units of token0 per token1)
//! ```
//!
//! A side whose own reserve is zero has no price. An observation where
//! neither side has a price is dropped.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use alloy_primitives::{Address, U256};
use bigdecimal::BigDecimal;
use futures::future;
use tracing::{debug, warn, Instrument};

use crate::contracts::ContractAccessor;
use crate::errors::RpcError;
use crate::spans;
use crate::types::price::{PriceObservation, TokenQuote};
use crate::types::sync::SyncRecord;
use crate::types::tokens::amount::raw_amount_to_decimal;
use crate::types::tokens::decimals::TokenDecimals;

/// Process-lifetime cache of token decimals
///
/// Seeded from the dataset; tokens missing from the dataset are filled in on
/// first use from the token contract. Concurrent first lookups of the same
/// token may both hit the chain; the values are identical.
#[derive(Debug, Default)]
pub struct DecimalsCache {
    known: RwLock<HashMap<Address, TokenDecimals>>,
}

impl DecimalsCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache pre-filled with known decimals
    pub fn seeded(entries: impl IntoIterator<Item = (Address, TokenDecimals)>) -> Self {
        Self {
            known: RwLock::new(entries.into_iter().collect()),
        }
    }

    /// Cached decimals of `token`
    pub fn get(&self, token: Address) -> Option<TokenDecimals> {
        self.known
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&token)
            .copied()
    }

    /// Remember the decimals of `token`
    pub fn insert(&self, token: Address, decimals: TokenDecimals) {
        self.known
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token, decimals);
    }

    /// Number of cached tokens
    pub fn len(&self) -> usize {
        self.known.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Turns reserve updates into decimal-corrected relative prices
#[derive(Debug)]
pub struct PriceNormalizer {
    contracts: Arc<ContractAccessor>,
    decimals: Arc<DecimalsCache>,
}

impl PriceNormalizer {
    /// Create a normalizer reading unknown decimals through `contracts`
    pub fn new(contracts: Arc<ContractAccessor>, decimals: Arc<DecimalsCache>) -> Self {
        Self {
            contracts,
            decimals,
        }
    }

    /// Decimals of `token`, from the cache or the token contract
    pub async fn token_decimals(&self, token: Address) -> Result<TokenDecimals, RpcError> {
        if let Some(decimals) = self.decimals.get(token) {
            return Ok(decimals);
        }

        let decimals = self.contracts.token(token).decimals().await?;
        debug!(token = %token, decimals = decimals.as_u8(), "Fetched token decimals");
        self.decimals.insert(token, decimals);
        Ok(decimals)
    }

    /// Relative prices for a reserve update
    ///
    /// Returns `None` (and logs a warning) when the decimals of either token
    /// cannot be determined or when neither token has a price.
    pub async fn normalize(&self, record: &SyncRecord) -> Option<PriceObservation> {
        let span = spans::normalize_reserves(record.pool);
        async {
            let decimals = future::try_join(
                self.token_decimals(record.token0.token),
                self.token_decimals(record.token1.token),
            )
            .await;

            let (decimals0, decimals1) = match decimals {
                Ok(decimals) => decimals,
                Err(e) => {
                    warn!(pool = %record.pool, error = %e, "No price computed: token decimals unavailable");
                    return None;
                }
            };

            let observation = relative_prices(record, decimals0, decimals1);
            if observation.token0.price.is_none() && observation.token1.price.is_none() {
                warn!(pool = %record.pool, "No price computed: both reserves are zero");
                return None;
            }

            Some(observation)
        }
        .instrument(span)
        .await
    }
}

/// Compute both relative prices of a reserve update
///
/// # Examples
///
/// ```
/// use alloy_primitives::{Address, U256};
/// use bigdecimal::BigDecimal;
/// use dexters::{relative_prices, SyncRecord, TokenDecimals, TokenReserve};
///
/// let weth = Address::repeat_byte(1);
/// let usdc = Address::repeat_byte(2);
/// let record = SyncRecord {
///     pool: Address::repeat_byte(3),
///     block_number: None,
///     timestamp: None,
///     token0: TokenReserve::new(weth, U256::from(1_000_000_000_000_000_000u128)),
///     token1: TokenReserve::new(usdc, U256::from(2_000_000u64)),
/// };
///
/// let observation = relative_prices(&record, TokenDecimals::STANDARD, TokenDecimals::USDC);
/// assert_eq!(observation.price_of(weth), Some(&BigDecimal::from(2)));
/// ```
pub fn relative_prices(
    record: &SyncRecord,
    decimals0: TokenDecimals,
    decimals1: TokenDecimals,
) -> PriceObservation {
    let reserve0 = raw_amount_to_decimal(record.token0.reserve);
    let reserve1 = raw_amount_to_decimal(record.token1.reserve);

    let price0 = side_price(
        record.token0.reserve,
        decimals0.scale_relative_to(decimals1),
        &reserve1,
        &reserve0,
    );
    let price1 = side_price(
        record.token1.reserve,
        decimals1.scale_relative_to(decimals0),
        &reserve0,
        &reserve1,
    );

    PriceObservation {
        pool: record.pool,
        timestamp: record.timestamp,
        token0: TokenQuote {
            token: record.token0.token,
            price: price0,
            reserve: reserve0,
        },
        token1: TokenQuote {
            token: record.token1.token,
            price: price1,
            reserve: reserve1,
        },
    }
}

fn side_price(
    own_raw: U256,
    scale: BigDecimal,
    other: &BigDecimal,
    own: &BigDecimal,
) -> Option<BigDecimal> {
    if own_raw.is_zero() {
        return None;
    }
    Some(scale * other / own)
}
