// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Blockchain node connection abstraction
//!
//! Everything the oracle needs from a node fits in three requests: a
//! read-only contract call, a live log subscription and a block lookup. The
//! [`Connection`] trait captures exactly that surface so the oracle can run
//! against an alloy provider ([`AlloyConnection`]) or a scripted test double.

use std::pin::Pin;

use alloy_primitives::{Address, BlockNumber, Bytes};
use alloy_rpc_types::{Filter, Log};
use async_trait::async_trait;
use futures::stream::Stream;

use crate::errors::RpcError;

mod provider;

pub use provider::{AlloyConnection, RootConnection};

/// Live stream of logs matching a subscription filter
///
/// Dropping the stream releases the node-side subscription.
pub type LogStream = Pin<Box<dyn Stream<Item = Log> + Send>>;

/// Requests the oracle sends to a blockchain node
#[async_trait]
pub trait Connection: Send + Sync {
    /// Execute a read-only call (`eth_call`) against the latest block
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, RpcError>;

    /// Subscribe to logs matching `filter`
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::SubscriptionUnsupported`] when the transport has no
    /// pub/sub support.
    async fn subscribe_logs(&self, filter: Filter) -> Result<LogStream, RpcError>;

    /// Timestamp of block `number`, `None` if the node doesn't know the block
    async fn block_timestamp(&self, number: BlockNumber) -> Result<Option<u64>, RpcError>;
}
