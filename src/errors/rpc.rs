// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Shared RPC error types for connection operations.
//!
//! These errors describe failures talking to the JSON-RPC node: contract
//! calls, log subscriptions and block lookups. They carry enough context about
//! the operation to make log lines useful without the caller re-wrapping them.

use alloy_primitives::{Address, BlockNumber};

/// Errors that can occur while talking to the blockchain node.
///
/// # Examples
///
/// ```rust
/// use dexters::RpcError;
///
/// let error = RpcError::SubscriptionUnsupported;
/// println!("Error: {}", error);
/// ```
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// A read-only contract call (`eth_call`) failed.
    ///
    /// This covers reverts, unknown selectors on contracts that do not
    /// implement the expected interface, and transport failures.
    #[error("Contract call {method} on {contract} failed")]
    CallFailed {
        /// Contract the call was sent to
        contract: Address,
        /// Solidity signature of the method (e.g. `getPair(address,address)`)
        method: &'static str,
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The call succeeded but its return data could not be ABI-decoded.
    #[error("Failed to decode {method} result from {contract}: {details}")]
    DecodeFailed {
        /// Contract the call was sent to
        contract: Address,
        /// Solidity signature of the method
        method: &'static str,
        /// Decoder message
        details: String,
    },

    /// The node refused or failed to establish a log subscription.
    #[error("Failed to subscribe to {kind}")]
    SubscriptionFailed {
        /// What was being subscribed to (e.g. "logs")
        kind: String,
        /// The underlying provider error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The connection has no pub/sub transport.
    ///
    /// Log subscriptions need a WebSocket (or IPC) provider and the `ws`
    /// feature of this crate.
    #[error("Connection does not support log subscriptions")]
    SubscriptionUnsupported,

    /// Failed to fetch block details by number.
    ///
    /// This indicates the RPC call itself failed, not that the block doesn't
    /// exist (a missing block is reported as `Ok(None)`).
    #[error("Failed to fetch block {block_number} details")]
    GetBlockFailed {
        /// The block number we tried to fetch
        block_number: BlockNumber,
        /// The underlying provider error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A request exceeded the configured RPC timeout.
    #[error("RPC request {operation} timed out after {timeout_ms}ms")]
    Timeout {
        /// Description of the request
        operation: String,
        /// Timeout that elapsed, in milliseconds
        timeout_ms: u128,
    },

    /// RPC endpoint URL could not be parsed.
    #[error("Invalid provider URL: {0}")]
    ProviderUrlInvalid(String),

    /// The WebSocket connection to the node could not be established.
    #[error("Failed to connect to provider: {0}")]
    ProviderConnectionFailed(String),
}

impl RpcError {
    /// Helper to create a `CallFailed` error from any error type.
    pub fn call_failed(
        contract: Address,
        method: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RpcError::CallFailed {
            contract,
            method,
            source: Box::new(source),
        }
    }

    /// Helper to create a `DecodeFailed` error.
    pub fn decode_failed(contract: Address, method: &'static str, details: impl Into<String>) -> Self {
        RpcError::DecodeFailed {
            contract,
            method,
            details: details.into(),
        }
    }

    /// Helper to create a `SubscriptionFailed` error from any error type.
    pub fn subscription_failed(
        kind: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RpcError::SubscriptionFailed {
            kind: kind.into(),
            source: Box::new(source),
        }
    }

    /// Helper to create a `GetBlockFailed` error from any error type.
    pub fn get_block_failed(
        block_number: BlockNumber,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RpcError::GetBlockFailed {
            block_number,
            source: Box::new(source),
        }
    }

    /// Helper to create a `Timeout` error.
    pub fn timeout(operation: impl Into<String>, timeout: std::time::Duration) -> Self {
        RpcError::Timeout {
            operation: operation.into(),
            timeout_ms: timeout.as_millis(),
        }
    }
}
