// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the dexters library.
//!
//! This module follows a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained error handling
//!   ([`DiscoveryError`], [`OracleError`], ...)
//! - **Unified error type** ([`DextersError`]) for convenience when you don't
//!   need to distinguish between error sources
//!
//! # Architecture
//!
//! - [`DatasetError`] - Dataset loading and facade construction
//! - [`DiscoveryError`] - Pool resolution, enumeration and reserve subscriptions
//! - [`OracleError`] - Price feeds and one-shot price queries
//!
//! Additionally, [`RpcError`] provides shared variants for node operations.
//!
//! # Example
//!
//! ```rust,ignore
//! use dexters::{DextersError, Dexters};
//!
//! async fn example(dexters: &Dexters) -> Result<(), DextersError> {
//!     let dex = dexters.dex("sushiswap")?;
//!     let pools = dex.enumerate_all_pools().await?;
//!     println!("{} pools", pools.len());
//!     Ok(())
//! }
//! ```

mod dataset;
mod discovery;
mod oracle;
mod rpc;

pub use dataset::DatasetError;
pub use discovery::DiscoveryError;
pub use oracle::OracleError;
pub use rpc::RpcError;

/// Unified error type for all dexters operations.
///
/// All module-specific error types convert into `DextersError` via `From`, so
/// `?` works across module boundaries.
#[derive(Debug, thiserror::Error)]
pub enum DextersError {
    /// Error from dataset loading or construction.
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Error from pool discovery.
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    /// Error from a price feed or price query.
    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    /// Error from the node connection.
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),
}
