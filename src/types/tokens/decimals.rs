//! Token decimal precision type

use bigdecimal::num_bigint::BigInt;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// ERC-20 token decimal precision
///
/// Represents the number of decimal places for a token. Most ERC-20 tokens
/// use 18 decimals (like WETH), but some use different values:
/// - USDC / USDT: 6 decimals
/// - WBTC: 8 decimals
/// - Standard: 18 decimals
///
/// # Examples
///
/// ```
/// use dexters::TokenDecimals;
///
/// let weth_decimals = TokenDecimals::STANDARD;
/// assert_eq!(weth_decimals.as_u8(), 18);
///
/// let usdc_decimals = TokenDecimals::USDC;
/// assert_eq!(usdc_decimals.as_u8(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenDecimals(u8);

impl TokenDecimals {
    /// Standard decimals for ETH-like tokens (18)
    pub const STANDARD: Self = Self(18);

    /// USDC decimals (6)
    pub const USDC: Self = Self(6);

    /// WBTC decimals (8)
    pub const WBTC: Self = Self(8);

    /// Create a new decimal precision value
    pub const fn new(decimals: u8) -> Self {
        Self(decimals)
    }

    /// Get the inner u8 value
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    /// Exact `10^(self - other)` as a decimal
    ///
    /// This is the factor that converts a ratio of raw reserves into a ratio
    /// of whole-token amounts. The exponent may be negative.
    ///
    /// # Examples
    ///
    /// ```
    /// use bigdecimal::BigDecimal;
    /// use dexters::TokenDecimals;
    /// use std::str::FromStr;
    ///
    /// let factor = TokenDecimals::STANDARD.scale_relative_to(TokenDecimals::USDC);
    /// assert_eq!(factor, BigDecimal::from_str("1000000000000").unwrap());
    ///
    /// let factor = TokenDecimals::USDC.scale_relative_to(TokenDecimals::STANDARD);
    /// assert_eq!(factor, BigDecimal::from_str("0.000000000001").unwrap());
    /// ```
    pub fn scale_relative_to(&self, other: TokenDecimals) -> BigDecimal {
        let exponent = i64::from(self.0) - i64::from(other.0);
        // BigDecimal::new(digits, scale) == digits * 10^-scale
        BigDecimal::new(BigInt::from(1u8), -exponent)
    }
}

impl From<u8> for TokenDecimals {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TokenDecimals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} decimals", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_token_decimals_constants() {
        assert_eq!(TokenDecimals::STANDARD.as_u8(), 18);
        assert_eq!(TokenDecimals::USDC.as_u8(), 6);
        assert_eq!(TokenDecimals::WBTC.as_u8(), 8);
    }

    #[test]
    fn test_scale_relative_to_same_decimals_is_one() {
        let factor = TokenDecimals::WBTC.scale_relative_to(TokenDecimals::WBTC);
        assert_eq!(factor, BigDecimal::from(1));
    }

    #[test]
    fn test_scale_relative_to_sign() {
        assert_eq!(
            TokenDecimals::WBTC.scale_relative_to(TokenDecimals::USDC),
            BigDecimal::from(100)
        );
        assert_eq!(
            TokenDecimals::USDC.scale_relative_to(TokenDecimals::WBTC),
            BigDecimal::from_str("0.01").unwrap()
        );
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(format!("{}", TokenDecimals::STANDARD), "18 decimals");
    }

    #[test]
    fn test_serialization() {
        let decimals = TokenDecimals::USDC;
        let json = serde_json::to_string(&decimals).unwrap();
        assert_eq!(json, "6");
        let deserialized: TokenDecimals = serde_json::from_str(&json).unwrap();
        assert_eq!(decimals, deserialized);
    }
}
