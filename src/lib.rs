// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Event-driven DEX price oracle for EVM chains.
//!
//! `dexters` turns UniswapV2-style pool reserves into prices:
//!
//! - **Discovery**: resolve the pool of a token pair, the tokens of a pool,
//!   or every pool of a factory
//! - **Reserve subscriptions**: one `Sync` log subscription per
//!   `(pool, callback)`, with idempotent unsubscribe
//! - **Relative prices**: decimal-corrected prices from raw reserves, in
//!   arbitrary precision
//! - **USD feeds**: reserve-weighted average over every stablecoin pool of a
//!   token, recomputed on each reserve update
//!
//! Chain and DEX metadata (tokens, stablecoins, factory addresses) come from
//! a [`ChainDataset`]; the node is reached through a [`Connection`].
//!
//! # Example
//!
//! ```rust,no_run
//! use dexters::{Callback, ChainDataset, Dexters, OracleConfig};
//!
//! # async fn example() -> Result<(), dexters::DextersError> {
//! let dataset = ChainDataset::from_dir("blockchain-datasets/data", 137).await?;
//! let dexters = Dexters::connect_ws(dataset, "wss://polygon.example/ws", OracleConfig::default()).await?;
//! let sushiswap = dexters.dex("sushiswap")?;
//!
//! let feed = sushiswap
//!     .subscribe_native_usd_price(Callback::from_fn(|update| {
//!         println!("WMATIC: {update}");
//!     }))
//!     .await?;
//!
//! // ...
//! feed.unsubscribe();
//! # Ok(())
//! # }
//! ```

pub mod callback;
pub mod config;
pub mod connection;
pub mod contracts;
pub mod dataset;
pub mod dex;
pub mod dexters;
pub mod discovery;
pub mod errors;
pub mod listener;
pub mod oracle;
pub mod registry;
mod spans;
pub mod subscription;
pub mod types;

pub use callback::{Callback, CallbackId, PriceCallback, ReserveCallback, UsdPriceCallback};
pub use config::{OracleConfig, OracleConfigBuilder};
pub use connection::{AlloyConnection, Connection, LogStream, RootConnection};
pub use contracts::{ContractAccessor, Factory, PairLookupFactory, UniswapV2Factory};
pub use dataset::{
    ChainDataset, ChainMetadata, ContractInfo, ContractTypes, DexDataset, DexMetadata,
    NativeCurrency, TokenInfo, TokenMap,
};
pub use dex::Dex;
pub use dexters::Dexters;
pub use discovery::PoolDiscovery;
pub use errors::{DatasetError, DextersError, DiscoveryError, OracleError, RpcError};
pub use listener::ReserveListener;
pub use oracle::{
    relative_prices, weighted_usd_price, DecimalsCache, FeedPhase, PriceNormalizer,
    UsdAggregator, UsdPriceFeed,
};
pub use registry::PairRegistry;
pub use subscription::Subscription;
pub use types::config::BatchSize;
pub use types::pair::{PairTokens, TokenPair};
pub use types::price::{PriceObservation, RelativePrices, TokenQuote, UsdPriceUpdate};
pub use types::sync::{PoolReserves, SyncRecord, TokenReserve};
pub use types::tokens::amount::raw_amount_to_decimal;
pub use types::tokens::decimals::TokenDecimals;
