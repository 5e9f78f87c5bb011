// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Conversion of raw on-chain amounts into arbitrary precision decimals

use alloy_primitives::U256;
use bigdecimal::num_bigint::{BigInt, Sign};
use bigdecimal::BigDecimal;

/// Convert a raw U256 amount (reserve, balance) into an exact `BigDecimal`.
///
/// No decimal scaling is applied: the result is the integer amount of the
/// token's smallest unit. Reserves can exceed the range that `f64` represents
/// exactly, so prices are always derived from this form.
///
/// # Example
///
/// ```
/// use alloy_primitives::U256;
/// use bigdecimal::BigDecimal;
/// use dexters::raw_amount_to_decimal;
///
/// let reserve = U256::from(2_000_000u64);
/// assert_eq!(raw_amount_to_decimal(reserve), BigDecimal::from(2_000_000));
/// ```
pub fn raw_amount_to_decimal(value: U256) -> BigDecimal {
    let digits = BigInt::from_bytes_be(Sign::Plus, &value.to_be_bytes::<32>());
    BigDecimal::new(digits, 0)
}
