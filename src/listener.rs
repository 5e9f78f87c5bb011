// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Reserve listener
//!
//! Attaches callbacks to a pool's `Sync` event stream. Each `(pool, callback)`
//! pair owns at most one underlying log subscription, consumed by its own
//! task:
//!
//! 1. decode the log as `Sync(uint112,uint112)`
//! 2. look up the timestamp of the log's block
//! 3. build a [`SyncRecord`] and await the callback
//!
//! Events of one pool are therefore delivered in stream order. A log that
//! cannot be decoded, or whose block lookup fails, is dropped and the
//! subscription keeps running. When the node closes the stream the
//! subscription becomes inactive and the next subscribe opens a new one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use alloy_primitives::Address;
use futures::StreamExt;
use tracing::{debug, info, warn, Instrument};

use crate::callback::{CallbackId, ReserveCallback};
use crate::connection::{Connection, LogStream};
use crate::contracts::{decode_sync, ContractAccessor};
use crate::discovery::PoolDiscovery;
use crate::errors::DiscoveryError;
use crate::spans;
use crate::subscription::Subscription;
use crate::types::pair::TokenPair;
use crate::types::sync::{SyncRecord, TokenReserve};

type ListenerKey = (Address, CallbackId);

#[derive(Debug)]
struct ActiveListener {
    generation: u64,
    subscription: Subscription,
}

type ActiveListeners = Mutex<HashMap<ListenerKey, ActiveListener>>;

/// Deduplicating subscriber to pool reserve updates
#[derive(Debug)]
pub struct ReserveListener {
    discovery: Arc<PoolDiscovery>,
    contracts: Arc<ContractAccessor>,
    active: Arc<ActiveListeners>,
    generations: AtomicU64,
}

impl ReserveListener {
    /// Create a listener resolving pools through `discovery`
    pub fn new(discovery: Arc<PoolDiscovery>, contracts: Arc<ContractAccessor>) -> Self {
        Self {
            discovery,
            contracts,
            active: Arc::new(Mutex::new(HashMap::new())),
            generations: AtomicU64::new(0),
        }
    }

    /// Deliver every reserve update of `pool` to `callback`
    ///
    /// Subscribing the same callback (or a clone) to the same pool again
    /// returns the existing subscription.
    ///
    /// # Errors
    ///
    /// - [`DiscoveryError::PoolTokensUnavailable`] if `pool` isn't a pair contract
    /// - [`DiscoveryError::Rpc`] if the log subscription cannot be established
    pub async fn subscribe(
        &self,
        pool: Address,
        callback: ReserveCallback,
    ) -> Result<Subscription, DiscoveryError> {
        let key = (pool, callback.id());
        if let Some(existing) = self.existing(&key) {
            debug!(pool = %pool, callback = %key.1, "Reusing reserve subscription");
            return Ok(existing);
        }

        let span = spans::subscribe_reserves(pool, callback.id());
        async move {
            let tokens = self.discovery.require_pool_tokens(pool).await?;
            let stream = self.contracts.pair(pool).subscribe_sync().await?;
            Ok(self.install(key, tokens, stream, callback))
        }
        .instrument(span)
        .await
    }

    /// Number of attached `(pool, callback)` listeners
    pub fn active_count(&self) -> usize {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn existing(&self, key: &ListenerKey) -> Option<Subscription> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .map(|listener| listener.subscription.clone())
    }

    fn install(
        &self,
        key: ListenerKey,
        tokens: TokenPair,
        stream: LogStream,
        callback: ReserveCallback,
    ) -> Subscription {
        let (pool, callback_id) = key;
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);

        // A concurrent subscribe for the same key finished first
        if let Some(existing) = active.get(&key) {
            debug!(pool = %pool, callback = %callback_id, "Discarding duplicate log subscription");
            return existing.subscription.clone();
        }

        let generation = self.generations.fetch_add(1, Ordering::Relaxed);
        let registry: Weak<ActiveListeners> = Arc::downgrade(&self.active);
        let finished = registry.clone();
        let connection = Arc::clone(self.contracts.connection());
        let task = tokio::spawn(
            async move {
                consume_sync_logs(connection, pool, tokens, stream, callback).await;
                retire(&finished, key, generation);
            }
            .instrument(spans::reserve_listener(pool, callback_id)),
        );
        let abort = task.abort_handle();

        let subscription = Subscription::new(move || {
            abort.abort();
            if let Some(registry) = registry.upgrade() {
                let mut active = registry.lock().unwrap_or_else(PoisonError::into_inner);
                if active
                    .get(&key)
                    .is_some_and(|listener| listener.generation == generation)
                {
                    active.remove(&key);
                }
            }
            info!(pool = %pool, callback = %callback_id, "Unsubscribed from reserve updates");
        });

        active.insert(
            key,
            ActiveListener {
                generation,
                subscription: subscription.clone(),
            },
        );
        info!(pool = %pool, callback = %callback_id, "Subscribed to reserve updates");

        subscription
    }
}

/// Detach a listener whose log stream ended so the next subscribe starts afresh
fn retire(registry: &Weak<ActiveListeners>, key: ListenerKey, generation: u64) {
    let Some(registry) = registry.upgrade() else {
        return;
    };
    let retired = {
        let mut active = registry.lock().unwrap_or_else(PoisonError::into_inner);
        if active
            .get(&key)
            .is_some_and(|listener| listener.generation == generation)
        {
            active.remove(&key)
        } else {
            None
        }
    };
    if let Some(listener) = retired {
        listener.subscription.unsubscribe();
    }
}

async fn consume_sync_logs(
    connection: Arc<dyn Connection>,
    pool: Address,
    tokens: TokenPair,
    mut stream: LogStream,
    callback: ReserveCallback,
) {
    while let Some(log) = stream.next().await {
        let (reserve0, reserve1) = match decode_sync(&log) {
            Ok(reserves) => reserves,
            Err(e) => {
                warn!(pool = %pool, error = %e, "Dropping undecodable Sync log");
                continue;
            }
        };

        let timestamp = match (log.block_timestamp, log.block_number) {
            (Some(timestamp), _) => Some(timestamp),
            (None, Some(number)) => match connection.block_timestamp(number).await {
                Ok(timestamp) => timestamp,
                Err(e) => {
                    debug!(pool = %pool, block = number, error = %e, "Dropping Sync event: block lookup failed");
                    continue;
                }
            },
            (None, None) => None,
        };

        let record = SyncRecord {
            pool,
            block_number: log.block_number,
            timestamp,
            token0: TokenReserve::new(tokens.token0, reserve0),
            token1: TokenReserve::new(tokens.token1, reserve1),
        };
        callback.call(record).await;
    }

    warn!(pool = %pool, "Sync log stream ended");
}
