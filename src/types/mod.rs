// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types for type safety across dexters.
//!
//! This module provides newtype wrappers and value types for:
//! - Token decimals and raw amount conversion
//! - Token pairs and pair resolution outcomes
//! - Reserve snapshots (`Sync` events, `getReserves()`)
//! - Relative and USD price observations
//! - Configuration values (enumeration batch size)

pub mod config;
pub mod pair;
pub mod price;
pub mod sync;
pub mod tokens;

// Note: Public types are re-exported from lib.rs, not here
