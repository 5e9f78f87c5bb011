// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Reserve-weighted USD price feeds
//!
//! A feed for token `T` listens to every `T`/stablecoin pool of the DEX. Each
//! pool's latest observation is kept; on every update the feed recomputes
//!
//! ```text
//! price_usd(T) = Σ price_i(T) × reserve_i(T) / Σ reserve_i(T)
//! ```
//!
//! over the pools whose price for `T` is defined, and reports the result to
//! the subscriber. The pool set is fixed when the feed starts.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use alloy_primitives::Address;
use bigdecimal::{BigDecimal, Zero};
use futures::future::join_all;
use tracing::{debug, info, Instrument};

use crate::callback::{ReserveCallback, UsdPriceCallback};
use crate::config::OracleConfig;
use crate::dataset::TokenInfo;
use crate::discovery::PoolDiscovery;
use crate::errors::OracleError;
use crate::listener::ReserveListener;
use crate::spans;
use crate::subscription::Subscription;
use crate::types::price::{PriceObservation, UsdPriceUpdate};
use crate::types::sync::SyncRecord;

use super::normalizer::PriceNormalizer;

/// Lifecycle of a USD price feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    /// Pool subscriptions are being attached
    Initializing,
    /// Every pool subscription is attached
    Active,
    /// Unsubscribed; later events are ignored
    Stopped,
}

#[derive(Debug)]
struct FeedState {
    phase: FeedPhase,
    observations: HashMap<Address, PriceObservation>,
}

type SharedFeedState = Arc<Mutex<FeedState>>;

fn set_phase(state: &SharedFeedState, phase: FeedPhase) {
    state.lock().unwrap_or_else(PoisonError::into_inner).phase = phase;
}

/// A running USD price feed
///
/// Dropping the feed keeps it running; call [`unsubscribe`](Self::unsubscribe).
#[derive(Clone)]
pub struct UsdPriceFeed {
    token: Address,
    pools: Vec<Address>,
    state: SharedFeedState,
    subscription: Subscription,
}

impl UsdPriceFeed {
    /// Token being priced
    pub fn token(&self) -> Address {
        self.token
    }

    /// Stablecoin pools feeding the price
    pub fn pools(&self) -> &[Address] {
        &self.pools
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> FeedPhase {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .phase
    }

    /// Latest aggregated price, if any pool has reported yet
    pub fn latest_price(&self) -> Option<BigDecimal> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        weighted_usd_price(self.token, state.observations.values()).map(|(price, _)| price)
    }

    /// Detach every pool subscription of this feed
    ///
    /// Idempotent.
    pub fn unsubscribe(&self) {
        self.subscription.unsubscribe();
    }
}

impl fmt::Debug for UsdPriceFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsdPriceFeed")
            .field("token", &self.token)
            .field("pools", &self.pools)
            .field("phase", &self.phase())
            .finish()
    }
}

/// Builds USD price feeds from a DEX's stablecoin pools
#[derive(Debug)]
pub struct UsdAggregator {
    discovery: Arc<PoolDiscovery>,
    listener: Arc<ReserveListener>,
    normalizer: Arc<PriceNormalizer>,
    stablecoins: Vec<TokenInfo>,
    config: OracleConfig,
}

impl UsdAggregator {
    /// Create an aggregator over the given stablecoins
    pub fn new(
        discovery: Arc<PoolDiscovery>,
        listener: Arc<ReserveListener>,
        normalizer: Arc<PriceNormalizer>,
        stablecoins: Vec<TokenInfo>,
        config: OracleConfig,
    ) -> Self {
        Self {
            discovery,
            listener,
            normalizer,
            stablecoins,
            config,
        }
    }

    /// Stablecoins a feed for `token` would consult
    pub fn stablecoins_for(&self, token: Address) -> Vec<Address> {
        self.stablecoins
            .iter()
            .filter(|stablecoin| stablecoin.address != token)
            .filter(|stablecoin| !self.config.is_stablecoin_excluded(&stablecoin.symbol))
            .map(|stablecoin| stablecoin.address)
            .collect()
    }

    /// Start a USD price feed for `token`
    ///
    /// # Errors
    ///
    /// - [`OracleError::NoStablecoinLiquidity`] if no stablecoin pool exists
    /// - [`OracleError::Discovery`] if pool lookup or subscription fails
    pub async fn subscribe(
        &self,
        token: Address,
        callback: UsdPriceCallback,
    ) -> Result<UsdPriceFeed, OracleError> {
        let stablecoins = self.stablecoins_for(token);
        let span = spans::subscribe_usd_price(token, stablecoins.len());

        async move {
            let pools = self.stablecoin_pools(token, &stablecoins).await?;
            if pools.is_empty() {
                return Err(OracleError::NoStablecoinLiquidity { token });
            }

            let state: SharedFeedState = Arc::new(Mutex::new(FeedState {
                phase: FeedPhase::Initializing,
                observations: HashMap::new(),
            }));
            let on_reserves = self.reserve_handler(token, Arc::clone(&state), callback);

            let mut subscriptions = Vec::with_capacity(pools.len());
            for &pool in &pools {
                match self.listener.subscribe(pool, on_reserves.clone()).await {
                    Ok(subscription) => subscriptions.push(subscription),
                    Err(e) => {
                        set_phase(&state, FeedPhase::Stopped);
                        subscriptions.iter().for_each(Subscription::unsubscribe);
                        return Err(e.into());
                    }
                }
            }

            set_phase(&state, FeedPhase::Active);
            info!(pools = pools.len(), "USD price feed active");

            let teardown_state = Arc::clone(&state);
            let subscription = Subscription::new(move || {
                set_phase(&teardown_state, FeedPhase::Stopped);
                subscriptions.iter().for_each(Subscription::unsubscribe);
                info!(token = %token, "USD price feed stopped");
            });

            Ok(UsdPriceFeed {
                token,
                pools,
                state,
                subscription,
            })
        }
        .instrument(span)
        .await
    }

    async fn stablecoin_pools(
        &self,
        token: Address,
        stablecoins: &[Address],
    ) -> Result<Vec<Address>, OracleError> {
        let resolved = join_all(
            stablecoins
                .iter()
                .map(|&stablecoin| self.discovery.resolve_pool_address(token, stablecoin)),
        )
        .await;

        let mut pools = Vec::with_capacity(resolved.len());
        for (stablecoin, result) in stablecoins.iter().zip(resolved) {
            match result {
                Ok(pool) => pools.push(pool),
                Err(e) if e.is_no_pool() => {
                    debug!(stablecoin = %stablecoin, "No pool against stablecoin");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(pools)
    }

    fn reserve_handler(
        &self,
        token: Address,
        state: SharedFeedState,
        callback: UsdPriceCallback,
    ) -> ReserveCallback {
        let normalizer = Arc::clone(&self.normalizer);
        ReserveCallback::new(move |record: SyncRecord| {
            let normalizer = Arc::clone(&normalizer);
            let state = Arc::clone(&state);
            let callback = callback.clone();
            async move {
                if is_stopped(&state) {
                    return;
                }
                let Some(observation) = normalizer.normalize(&record).await else {
                    return;
                };

                let aggregate = {
                    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
                    if state.phase == FeedPhase::Stopped {
                        return;
                    }
                    state.observations.insert(record.pool, observation);
                    weighted_usd_price(token, state.observations.values())
                };

                match aggregate {
                    Some((price_usd, pools)) => {
                        callback
                            .call(UsdPriceUpdate {
                                token,
                                timestamp: record.timestamp,
                                price_usd,
                                pools,
                            })
                            .await
                    }
                    None => debug!(pool = %record.pool, "No stablecoin reserve to weight by"),
                }
            }
        })
    }
}

fn is_stopped(state: &SharedFeedState) -> bool {
    state.lock().unwrap_or_else(PoisonError::into_inner).phase == FeedPhase::Stopped
}

/// Reserve-weighted mean price of `token` over a set of observations
///
/// Observations without a price for `token` are skipped. Returns the price and
/// the number of contributing pools, or `None` if the total weight is zero.
///
/// # Examples
///
/// ```
/// use alloy_primitives::Address;
/// use bigdecimal::BigDecimal;
/// use dexters::{weighted_usd_price, PriceObservation, TokenQuote};
/// use std::str::FromStr;
///
/// let token = Address::repeat_byte(1);
/// let observation = |price: &str, reserve: u32| PriceObservation {
///     pool: Address::ZERO,
///     timestamp: None,
///     token0: TokenQuote {
///         token,
///         price: Some(BigDecimal::from_str(price).unwrap()),
///         reserve: BigDecimal::from(reserve),
///     },
///     token1: TokenQuote {
///         token: Address::repeat_byte(2),
///         price: None,
///         reserve: BigDecimal::from(0),
///     },
/// };
///
/// let observations = [observation("1.00", 100), observation("1.02", 300)];
/// let (price, pools) = weighted_usd_price(token, observations.iter()).unwrap();
/// assert_eq!(price, BigDecimal::from_str("1.015").unwrap());
/// assert_eq!(pools, 2);
/// ```
pub fn weighted_usd_price<'a>(
    token: Address,
    observations: impl IntoIterator<Item = &'a PriceObservation>,
) -> Option<(BigDecimal, usize)> {
    let mut weighted = BigDecimal::zero();
    let mut total_reserve = BigDecimal::zero();
    let mut pools = 0usize;

    for quote in observations
        .into_iter()
        .filter_map(|observation| observation.quote(token))
    {
        let Some(price) = &quote.price else {
            continue;
        };
        weighted += price * &quote.reserve;
        total_reserve += &quote.reserve;
        pools += 1;
    }

    if total_reserve.is_zero() {
        return None;
    }
    Some((weighted / total_reserve, pools))
}
