// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Unsubscribe handles

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

type Teardown = Box<dyn FnOnce() + Send>;

struct Inner {
    teardown: Mutex<Option<Teardown>>,
}

/// Handle to an active subscription
///
/// Clones refer to the same subscription. [`unsubscribe`](Self::unsubscribe)
/// is idempotent: the first call detaches the listener, later calls (from any
/// clone) do nothing. Dropping the handle does *not* unsubscribe.
#[derive(Clone)]
pub struct Subscription {
    inner: Arc<Inner>,
}

impl Subscription {
    pub(crate) fn new(teardown: impl FnOnce() + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                teardown: Mutex::new(Some(Box::new(teardown))),
            }),
        }
    }

    /// Stop receiving updates
    pub fn unsubscribe(&self) {
        let teardown = self
            .inner
            .teardown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(teardown) = teardown {
            teardown();
        }
    }

    /// Returns `true` until the first call to [`unsubscribe`](Self::unsubscribe)
    pub fn is_active(&self) -> bool {
        self.inner
            .teardown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Returns `true` if both handles refer to the same subscription
    pub fn same_as(&self, other: &Subscription) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
