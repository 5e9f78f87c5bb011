//! Token value types

pub mod amount;
pub mod decimals;
