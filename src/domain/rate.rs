//! Rate per unit
//!
//! Multiplier converting accumulated meters into an amount due.
//! Validated at construction so that billing arithmetic can never overflow.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default billing rate per meter
const DEFAULT_RATE: Decimal = Decimal::from_parts(315, 0, 0, false, 2);

/// Maximum allowed rate
const MAX_RATE: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Maximum decimal places (6)
const MAX_SCALE: u32 = 6;

/// RatePerUnit represents a validated billing rate.
///
/// # Invariants
/// - Value is zero or positive
/// - Maximum 6 decimal places
/// - Maximum value is 10,000
///
/// Together with the distance bounds this keeps `total * rate` inside the
/// exact range of `Decimal`.
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use obu_aggregator::domain::RatePerUnit;
///
/// let rate = RatePerUnit::new(Decimal::new(315, 2)).unwrap();
/// assert_eq!(rate.value(), Decimal::new(315, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct RatePerUnit(Decimal);

/// Errors that can occur when creating a RatePerUnit
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateError {
    #[error("Rate must not be negative (got {0})")]
    Negative(Decimal),

    #[error("Rate has too many decimal places (max {MAX_SCALE}, got {0})")]
    TooManyDecimals(u32),

    #[error("Rate exceeds maximum allowed value ({MAX_RATE})")]
    Overflow,

    #[error("Invalid rate format: {0}")]
    ParseError(String),
}

impl RatePerUnit {
    /// Create a new rate with validation.
    ///
    /// # Errors
    /// - `RateError::Negative` if value < 0
    /// - `RateError::TooManyDecimals` if more than 6 decimal places
    /// - `RateError::Overflow` if value > 10,000
    pub fn new(value: Decimal) -> Result<Self, RateError> {
        if value < Decimal::ZERO {
            return Err(RateError::Negative(value));
        }

        let value = value.normalize();
        if value.scale() > MAX_SCALE {
            return Err(RateError::TooManyDecimals(value.scale()));
        }

        if value > MAX_RATE {
            return Err(RateError::Overflow);
        }

        Ok(Self(value))
    }

    /// Get the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl Default for RatePerUnit {
    fn default() -> Self {
        Self(DEFAULT_RATE)
    }
}

impl fmt::Display for RatePerUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RatePerUnit {
    type Err = RateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim()).map_err(|e| RateError::ParseError(e.to_string()))?;
        RatePerUnit::new(decimal)
    }
}

impl TryFrom<Decimal> for RatePerUnit {
    type Error = RateError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        RatePerUnit::new(value)
    }
}

impl From<RatePerUnit> for Decimal {
    fn from(rate: RatePerUnit) -> Self {
        rate.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_rate() {
        assert_eq!(RatePerUnit::default().value(), dec!(3.15));
    }

    #[test]
    fn test_rate_zero_allowed() {
        assert!(RatePerUnit::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_rate_negative_rejected() {
        let rate = RatePerUnit::new(dec!(-1));
        assert!(matches!(rate, Err(RateError::Negative(_))));
    }

    #[test]
    fn test_rate_too_many_decimals() {
        let rate = RatePerUnit::new(dec!(0.1234567));
        assert!(matches!(rate, Err(RateError::TooManyDecimals(7))));
    }

    #[test]
    fn test_rate_trailing_zeros_ignored() {
        let rate = RatePerUnit::new(dec!(1.50000000)).unwrap();
        assert_eq!(rate.value(), dec!(1.5));
    }

    #[test]
    fn test_rate_overflow() {
        let rate = RatePerUnit::new(dec!(10000.01));
        assert!(matches!(rate, Err(RateError::Overflow)));
    }

    #[test]
    fn test_rate_from_str() {
        let rate: RatePerUnit = " 0.42 ".parse().unwrap();
        assert_eq!(rate.value(), dec!(0.42));
        assert!(matches!("abc".parse::<RatePerUnit>(), Err(RateError::ParseError(_))));
    }
}
