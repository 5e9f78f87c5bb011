// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! [`Connection`] implementation over an alloy provider

use std::future::Future;
use std::time::Duration;

use alloy_network::Ethereum;
use alloy_primitives::{Address, BlockNumber, Bytes};
use alloy_provider::{Provider, ProviderBuilder, RootProvider};
use alloy_rpc_types::{Filter, TransactionRequest};
use async_trait::async_trait;
use tracing::debug;

use super::{Connection, LogStream};
use crate::errors::RpcError;

/// Connection over a plain alloy root provider (no fillers, no layers)
pub type RootConnection = AlloyConnection<RootProvider<Ethereum>>;

/// [`Connection`] backed by an alloy [`Provider`]
///
/// Every request is bounded by the configured timeout. Log subscriptions need
/// a pub/sub transport (WebSocket) and the `ws` feature.
///
/// # Examples
///
/// ```rust,no_run
/// use dexters::RootConnection;
/// use std::time::Duration;
///
/// let connection: RootConnection =
///     RootConnection::connect_http("http://localhost:8545", Duration::from_secs(10))?;
/// # Ok::<(), dexters::RpcError>(())
/// ```
#[derive(Debug, Clone)]
pub struct AlloyConnection<P> {
    provider: P,
    timeout: Duration,
}

impl<P> AlloyConnection<P> {
    /// Wrap an existing provider
    pub fn new(provider: P, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// The wrapped provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T, F>(&self, operation: &str, request: F) -> Result<T, RpcError>
    where
        F: Future<Output = Result<T, RpcError>>,
    {
        tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| RpcError::timeout(operation, self.timeout))?
    }
}

impl RootConnection {
    /// Connect to an HTTP JSON-RPC endpoint
    ///
    /// HTTP transports cannot subscribe to logs; use
    /// [`connect_ws`](Self::connect_ws) for live price feeds.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::ProviderUrlInvalid`] if the URL cannot be parsed.
    pub fn connect_http(url: &str, timeout: Duration) -> Result<Self, RpcError> {
        let url: url::Url = url
            .parse()
            .map_err(|e| RpcError::ProviderUrlInvalid(format!("{e}")))?;

        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_http(url);

        Ok(Self::new(provider, timeout))
    }

    /// Connect to a WebSocket JSON-RPC endpoint
    ///
    /// # Errors
    ///
    /// Returns [`RpcError::ProviderConnectionFailed`] if the WebSocket
    /// handshake fails.
    #[cfg(feature = "ws")]
    pub async fn connect_ws(url: &str, timeout: Duration) -> Result<Self, RpcError> {
        use alloy_provider::WsConnect;

        let ws = WsConnect::new(url);
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_ws(ws)
            .await
            .map_err(|e| RpcError::ProviderConnectionFailed(e.to_string()))?;

        Ok(Self::new(provider, timeout))
    }
}

#[async_trait]
impl<P> Connection for AlloyConnection<P>
where
    P: Provider,
{
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, RpcError> {
        let tx = TransactionRequest::default().to(to).input(input.into());

        self.bounded("eth_call", async {
            self.provider
                .call(tx)
                .await
                .map_err(|e| RpcError::call_failed(to, "eth_call", e))
        })
        .await
    }

    #[cfg(feature = "ws")]
    async fn subscribe_logs(&self, filter: Filter) -> Result<LogStream, RpcError> {
        debug!(address = ?filter.address, "Subscribing to logs");

        let subscription = self
            .bounded("eth_subscribe", async {
                self.provider
                    .subscribe_logs(&filter)
                    .await
                    .map_err(|e| RpcError::subscription_failed("logs", e))
            })
            .await?;

        Ok(Box::pin(subscription.into_stream()))
    }

    #[cfg(not(feature = "ws"))]
    async fn subscribe_logs(&self, filter: Filter) -> Result<LogStream, RpcError> {
        debug!(address = ?filter.address, "Log subscription requested without ws support");
        Err(RpcError::SubscriptionUnsupported)
    }

    async fn block_timestamp(&self, number: BlockNumber) -> Result<Option<u64>, RpcError> {
        let block = self
            .bounded("eth_getBlockByNumber", async {
                self.provider
                    .get_block_by_number(number.into())
                    .await
                    .map_err(|e| RpcError::get_block_failed(number, e))
            })
            .await?;

        Ok(block.map(|block| block.header.timestamp))
    }
}
