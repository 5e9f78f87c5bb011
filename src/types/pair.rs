// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Token pair types for liquidity pools

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// The two tokens held by a pool, in on-chain order
///
/// `token0`/`token1` follow the order reported by the pool contract (for
/// UniswapV2 pools, the numerically smaller address first), not the order in
/// which a caller asked for the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenPair {
    /// First token of the pool
    pub token0: Address,
    /// Second token of the pool
    pub token1: Address,
}

impl TokenPair {
    /// Create a pair from on-chain ordered token addresses
    pub const fn new(token0: Address, token1: Address) -> Self {
        Self { token0, token1 }
    }

    /// Create a pair in UniswapV2 canonical order (smaller address first)
    pub fn sorted(token_a: Address, token_b: Address) -> Self {
        if token_a <= token_b {
            Self::new(token_a, token_b)
        } else {
            Self::new(token_b, token_a)
        }
    }

    /// Returns `true` if `token` is one of the two tokens
    pub fn contains(&self, token: Address) -> bool {
        self.token0 == token || self.token1 == token
    }

    /// The token on the other side of the pair from `token`
    ///
    /// # Examples
    ///
    /// ```
    /// use alloy_primitives::address;
    /// use dexters::TokenPair;
    ///
    /// let weth = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
    /// let usdc = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
    /// let pair = TokenPair::new(usdc, weth);
    ///
    /// assert_eq!(pair.other(weth), Some(usdc));
    /// assert_eq!(pair.other(usdc), Some(weth));
    /// ```
    pub fn other(&self, token: Address) -> Option<Address> {
        if token == self.token0 {
            Some(self.token1)
        } else if token == self.token1 {
            Some(self.token0)
        } else {
            None
        }
    }

    /// The pair as a tuple `(token0, token1)`
    pub const fn as_tuple(&self) -> (Address, Address) {
        (self.token0, self.token1)
    }
}

impl From<(Address, Address)> for TokenPair {
    fn from((token0, token1): (Address, Address)) -> Self {
        Self { token0, token1 }
    }
}

impl std::fmt::Display for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.token0, self.token1)
    }
}

/// Outcome of resolving the token pair behind a pool address
///
/// Contracts that don't implement `token0()`/`token1()` are not an error for
/// discovery purposes: they are reported as `Unavailable` and skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairTokens {
    /// The pool's tokens, in on-chain order
    Resolved(TokenPair),
    /// The contract at this address did not answer as a pair contract
    Unavailable,
}

impl PairTokens {
    /// Get the resolved pair, if any
    pub fn pair(&self) -> Option<TokenPair> {
        match self {
            PairTokens::Resolved(pair) => Some(*pair),
            PairTokens::Unavailable => None,
        }
    }

    /// Returns `true` if the pair was resolved
    pub fn is_resolved(&self) -> bool {
        matches!(self, PairTokens::Resolved(_))
    }
}

impl From<TokenPair> for PairTokens {
    fn from(pair: TokenPair) -> Self {
        PairTokens::Resolved(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const TOKEN_A: Address = address!("0000000000000000000000000000000000000001");
    const TOKEN_B: Address = address!("0000000000000000000000000000000000000002");
    const TOKEN_C: Address = address!("0000000000000000000000000000000000000003");

    #[test]
    fn test_other_token() {
        let pair = TokenPair::new(TOKEN_A, TOKEN_B);

        assert_eq!(pair.other(TOKEN_A), Some(TOKEN_B));
        assert_eq!(pair.other(TOKEN_B), Some(TOKEN_A));
        assert_eq!(pair.other(TOKEN_C), None);
    }

    #[test]
    fn test_sorted_orders_by_address() {
        assert_eq!(TokenPair::sorted(TOKEN_B, TOKEN_A), TokenPair::new(TOKEN_A, TOKEN_B));
        assert_eq!(TokenPair::sorted(TOKEN_A, TOKEN_B), TokenPair::new(TOKEN_A, TOKEN_B));
    }

    #[test]
    fn test_contains() {
        let pair = TokenPair::new(TOKEN_A, TOKEN_B);

        assert!(pair.contains(TOKEN_A));
        assert!(pair.contains(TOKEN_B));
        assert!(!pair.contains(TOKEN_C));
    }

    #[test]
    fn test_pair_tokens_accessors() {
        let resolved = PairTokens::from(TokenPair::new(TOKEN_A, TOKEN_B));
        assert!(resolved.is_resolved());
        assert_eq!(resolved.pair(), Some(TokenPair::new(TOKEN_A, TOKEN_B)));

        assert!(!PairTokens::Unavailable.is_resolved());
        assert_eq!(PairTokens::Unavailable.pair(), None);
    }
}
