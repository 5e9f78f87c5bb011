// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Span creation helpers for dexters operations.
//!
//! Telemetry concerns are kept out of business logic: instead of
//! `#[instrument]` attributes, every instrumented operation has a span helper
//! here, and the operation attaches it to its future.
//!
//! Usage pattern:
//! ```rust,ignore
//! pub async fn my_operation(&self, param: Type) -> Result<T> {
//!     let span = spans::my_operation(param_value);
//!     async move {
//!         // Business logic here
//!     }
//!     .instrument(span)
//!     .await
//! }
//! ```

use alloy_primitives::Address;
use tracing::{Level, Span};

use crate::callback::CallbackId;

/// Create span for loading chain and DEX metadata from disk.
///
/// Parent: None (root span for this operation)
#[inline]
pub(crate) fn load_dataset(chain_id: u64) -> Span {
    tracing::span!(Level::INFO, "dexters.load_dataset", chain_id = chain_id)
}

/// Create span for resolving the pool of a token pair.
///
/// Parent: subscribe_usd_price span, or None when called directly
/// Children: factory `getPair` call
#[inline]
pub(crate) fn resolve_pool_address(token_a: Address, token_b: Address) -> Span {
    tracing::debug_span!(
        "dexters.resolve_pool_address",
        token_a = %token_a,
        token_b = %token_b,
    )
}

/// Create span for resolving the token pair of a pool.
///
/// Parent: enumerate_batch or subscribe_reserves span
/// Children: pair `token0`/`token1` calls
#[inline]
pub(crate) fn resolve_pool_tokens(pool: Address) -> Span {
    tracing::trace_span!("dexters.resolve_pool_tokens", pool = %pool)
}

/// Create span for enumerating every pool of a factory.
///
/// This is the main public API entry point for bulk discovery.
///
/// Parent: None (root span for this operation)
/// Children: enumerate_batch spans (one per batch)
#[inline]
pub(crate) fn enumerate_all_pools(factory: Address, batch_size: usize) -> Span {
    tracing::span!(
        Level::INFO,
        "dexters.enumerate_all_pools",
        factory = %factory,
        batch_size = batch_size,
    )
}

/// Create span for one enumeration batch `[start, end)`.
///
/// Parent: enumerate_all_pools span
/// Children: resolve_pool_tokens spans
#[inline]
pub(crate) fn enumerate_batch(start: u64, end: u64) -> Span {
    tracing::debug_span!("dexters.enumerate_batch", start = start, end = end)
}

/// Create span for attaching a reserve listener to a pool.
///
/// Parent: subscribe_usd_price span, or None when called directly
#[inline]
pub(crate) fn subscribe_reserves(pool: Address, callback: CallbackId) -> Span {
    tracing::span!(
        Level::INFO,
        "dexters.subscribe_reserves",
        pool = %pool,
        callback = %callback,
    )
}

/// Create span for the long-running task that consumes a pool's `Sync` logs.
///
/// Parent: None (detached task)
/// Children: block timestamp lookups
#[inline]
pub(crate) fn reserve_listener(pool: Address, callback: CallbackId) -> Span {
    tracing::debug_span!(
        "dexters.reserve_listener",
        pool = %pool,
        callback = %callback,
    )
}

/// Create span for converting a reserve update into relative prices.
///
/// Parent: reserve_listener span
#[inline]
pub(crate) fn normalize_reserves(pool: Address) -> Span {
    tracing::trace_span!("dexters.normalize_reserves", pool = %pool)
}

/// Create span for building an aggregated USD price feed.
///
/// Parent: None (root span for this operation)
/// Children: resolve_pool_address and subscribe_reserves spans
#[inline]
pub(crate) fn subscribe_usd_price(token: Address, stablecoins: usize) -> Span {
    tracing::span!(
        Level::INFO,
        "dexters.subscribe_usd_price",
        token = %token,
        stablecoins = stablecoins,
    )
}
