// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Subscriber callbacks with a stable identity
//!
//! Reserve subscriptions are deduplicated per `(pool, callback)`. Rust closures
//! have no usable identity, so every [`Callback`] carries a [`CallbackId`]
//! minted when it is constructed. Clones share the id: subscribing the same
//! callback (or a clone of it) twice to one pool attaches only one listener.
//!
//! ```rust
//! use dexters::{Callback, SyncRecord};
//!
//! let callback: Callback<SyncRecord> = Callback::from_fn(|record: SyncRecord| {
//!     println!("{} reserves changed", record.pool);
//! });
//! let clone = callback.clone();
//! assert_eq!(callback.id(), clone.id());
//! ```

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};

use crate::types::price::{PriceObservation, UsdPriceUpdate};
use crate::types::sync::SyncRecord;

static NEXT_CALLBACK_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Callback`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(u64);

impl CallbackId {
    fn next() -> Self {
        Self(NEXT_CALLBACK_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cb#{}", self.0)
    }
}

type Handler<T> = dyn Fn(T) -> BoxFuture<'static, ()> + Send + Sync;

/// An async subscriber callback
///
/// The listener awaits the returned future before handing the next event of
/// the same pool to the callback.
pub struct Callback<T> {
    id: CallbackId,
    handler: Arc<Handler<T>>,
}

/// Callback receiving raw reserve updates
pub type ReserveCallback = Callback<SyncRecord>;

/// Callback receiving relative price observations
pub type PriceCallback = Callback<PriceObservation>;

/// Callback receiving aggregated USD price updates
pub type UsdPriceCallback = Callback<UsdPriceUpdate>;

impl<T: Send + 'static> Callback<T> {
    /// Wrap an async function
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            id: CallbackId::next(),
            handler: Arc::new(move |value| f(value).boxed()),
        }
    }

    /// Wrap a synchronous function
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            id: CallbackId::next(),
            handler: Arc::new(move |value| {
                f(value);
                future::ready(()).boxed()
            }),
        }
    }

    /// Wrap an async function under an existing identity
    pub(crate) fn with_id<F, Fut>(id: CallbackId, f: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            id,
            handler: Arc::new(move |value| f(value).boxed()),
        }
    }

    /// Identity shared by this callback and its clones
    pub fn id(&self) -> CallbackId {
        self.id
    }

    /// Invoke the callback and wait for it to finish
    pub async fn call(&self, value: T) {
        (self.handler)(value).await
    }
}

impl<T> Clone for Callback<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<T> fmt::Debug for Callback<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback").field("id", &self.id).finish()
    }
}
