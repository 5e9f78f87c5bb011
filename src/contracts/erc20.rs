// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! ERC-20 token metadata reads

use std::fmt;
use std::sync::Arc;

use alloy_primitives::Address;

use super::{read, IERC20Metadata};
use crate::connection::Connection;
use crate::errors::RpcError;
use crate::types::tokens::decimals::TokenDecimals;

/// Handle for one ERC-20 token contract
pub struct TokenContract {
    address: Address,
    connection: Arc<dyn Connection>,
}

impl TokenContract {
    /// Create a handle for the token at `address`
    pub fn new(address: Address, connection: Arc<dyn Connection>) -> Self {
        Self {
            address,
            connection,
        }
    }

    /// Token contract address
    pub fn address(&self) -> Address {
        self.address
    }

    /// `decimals()`
    pub async fn decimals(&self) -> Result<TokenDecimals, RpcError> {
        let decimals = read(
            self.connection.as_ref(),
            self.address,
            IERC20Metadata::decimalsCall {},
        )
        .await?;
        Ok(TokenDecimals::new(decimals))
    }

    /// `symbol()`
    pub async fn symbol(&self) -> Result<String, RpcError> {
        read(
            self.connection.as_ref(),
            self.address,
            IERC20Metadata::symbolCall {},
        )
        .await
    }
}

impl fmt::Debug for TokenContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenContract")
            .field("address", &self.address)
            .finish()
    }
}
