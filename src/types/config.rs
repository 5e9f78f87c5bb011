//! Configuration value types

use serde::{Deserialize, Serialize};

use crate::config::constants::DEFAULT_ENUMERATION_BATCH_SIZE;

/// Number of requests issued concurrently in one discovery batch
///
/// Bounds peak in-flight RPC calls while pools are enumerated. A batch size
/// of zero would never make progress, so it is clamped to one.
///
/// # Examples
///
/// ```
/// use dexters::BatchSize;
///
/// assert_eq!(BatchSize::default().get(), 64);
/// assert_eq!(BatchSize::new(0).get(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "usize", into = "usize")]
pub struct BatchSize(usize);

impl BatchSize {
    /// Create a new batch size (minimum 1)
    pub const fn new(size: usize) -> Self {
        if size == 0 {
            Self(1)
        } else {
            Self(size)
        }
    }

    /// Get the inner value
    pub const fn get(&self) -> usize {
        self.0
    }

    /// Number of batches needed to cover `total` items
    ///
    /// ```
    /// use dexters::BatchSize;
    ///
    /// assert_eq!(BatchSize::new(64).batches_for(130), 3);
    /// assert_eq!(BatchSize::new(64).batches_for(0), 0);
    /// ```
    pub const fn batches_for(&self, total: u64) -> u64 {
        total.div_ceil(self.0 as u64)
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        Self(DEFAULT_ENUMERATION_BATCH_SIZE)
    }
}

impl From<usize> for BatchSize {
    fn from(value: usize) -> Self {
        Self::new(value)
    }
}

impl From<BatchSize> for usize {
    fn from(value: BatchSize) -> Self {
        value.0
    }
}

impl std::fmt::Display for BatchSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
