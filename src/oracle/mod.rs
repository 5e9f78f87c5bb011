// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Price derivation from pool reserves
//!
//! - [`normalizer`]: one reserve update → decimal-corrected relative prices
//! - [`aggregator`]: many stablecoin pools → one reserve-weighted USD price

pub mod aggregator;
pub mod normalizer;

pub use aggregator::{weighted_usd_price, FeedPhase, UsdAggregator, UsdPriceFeed};
pub use normalizer::{relative_prices, DecimalsCache, PriceNormalizer};
