// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory pair registry
//!
//! Maps token pairs to pool addresses and pool addresses to their token
//! pairs. Both directions of the token-pair index are written under the same
//! lock, so a reader never observes `(a, b)` registered without `(b, a)`.
//! Entries are never evicted.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use alloy_primitives::Address;
use tracing::debug;

use crate::types::pair::TokenPair;

#[derive(Debug, Default)]
struct RegistryState {
    by_tokens: HashMap<(Address, Address), Address>,
    by_pool: HashMap<Address, TokenPair>,
}

/// Bidirectional cache between token pairs and pool addresses
#[derive(Debug, Default)]
pub struct PairRegistry {
    state: RwLock<RegistryState>,
}

impl PairRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `pool` as the pool of `(token_a, token_b)`
    ///
    /// Idempotent; re-registering a pool overwrites its previous entry.
    pub fn register(&self, pool: Address, token_a: Address, token_b: Address) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.by_tokens.insert((token_a, token_b), pool);
        state.by_tokens.insert((token_b, token_a), pool);
        state.by_pool.insert(pool, TokenPair::new(token_a, token_b));
        debug!(pool = %pool, token_a = %token_a, token_b = %token_b, "Registered pool");
    }

    /// Pool of `(token_a, token_b)`, in either order
    pub fn lookup_pool(&self, token_a: Address, token_b: Address) -> Option<Address> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_tokens
            .get(&(token_a, token_b))
            .copied()
    }

    /// Tokens of `pool`, in the order they were registered
    pub fn lookup_tokens(&self, pool: Address) -> Option<TokenPair> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_pool
            .get(&pool)
            .copied()
    }

    /// Number of registered pools
    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_pool
            .len()
    }

    /// Returns `true` if no pool is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
