// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Price observation types produced by the oracle

use alloy_primitives::Address;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Price and reserve of one token of a pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenQuote {
    /// Token address
    pub token: Address,
    /// Units of the *other* token per one unit of this token, corrected for
    /// both tokens' decimals. `None` when this token's reserve is zero.
    pub price: Option<BigDecimal>,
    /// Raw reserve of this token (smallest unit)
    pub reserve: BigDecimal,
}

/// Relative prices derived from one reserve snapshot of a pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// Pool the reserves were read from
    pub pool: Address,
    /// Block timestamp of the underlying reserve update
    pub timestamp: Option<u64>,
    /// Quote for the pool's `token0`
    pub token0: TokenQuote,
    /// Quote for the pool's `token1`
    pub token1: TokenQuote,
}

impl PriceObservation {
    /// Quote for `token`, if it belongs to this pool
    pub fn quote(&self, token: Address) -> Option<&TokenQuote> {
        if token == self.token0.token {
            Some(&self.token0)
        } else if token == self.token1.token {
            Some(&self.token1)
        } else {
            None
        }
    }

    /// Price of `token`, if it belongs to this pool and is defined
    pub fn price_of(&self, token: Address) -> Option<&BigDecimal> {
        self.quote(token).and_then(|quote| quote.price.as_ref())
    }
}

/// One-shot relative prices of two tokens, in the caller's order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativePrices {
    /// First requested token
    pub token_a: Address,
    /// Units of `token_b` per one unit of `token_a`
    pub price_a: BigDecimal,
    /// Second requested token
    pub token_b: Address,
    /// Units of `token_a` per one unit of `token_b`
    pub price_b: BigDecimal,
}

impl RelativePrices {
    /// Price of `token`, if it is one of the two requested tokens
    pub fn price_of(&self, token: Address) -> Option<&BigDecimal> {
        if token == self.token_a {
            Some(&self.price_a)
        } else if token == self.token_b {
            Some(&self.price_b)
        } else {
            None
        }
    }
}

/// One update of an aggregated USD price feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsdPriceUpdate {
    /// Token the feed prices
    pub token: Address,
    /// Block timestamp of the reserve update that triggered this recomputation
    pub timestamp: Option<u64>,
    /// Reserve-weighted USD price over every pool observed so far
    pub price_usd: BigDecimal,
    /// Number of pools that contributed to `price_usd`
    pub pools: usize,
}

impl UsdPriceUpdate {
    /// Block time of the triggering update as a UTC datetime
    ///
    /// # Examples
    ///
    /// ```
    /// use alloy_primitives::Address;
    /// use bigdecimal::BigDecimal;
    /// use dexters::UsdPriceUpdate;
    ///
    /// let update = UsdPriceUpdate {
    ///     token: Address::ZERO,
    ///     timestamp: Some(0),
    ///     price_usd: BigDecimal::from(1),
    ///     pools: 1,
    /// };
    /// assert_eq!(update.datetime().unwrap().to_rfc3339(), "1970-01-01T00:00:00+00:00");
    /// ```
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .and_then(|ts| i64::try_from(ts).ok())
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
    }
}

impl std::fmt::Display for UsdPriceUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}", self.price_usd.round(6))
    }
}
