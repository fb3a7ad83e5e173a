//! Monetary amounts in base units (micros).
//!
//! The remote ledger stores every amount as an integer count of micros:
//! one display-currency unit equals [`MICROS_PER_UNIT`] micros.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of micros in one currency unit.
pub const MICROS_PER_UNIT: i64 = 1_000_000;

/// Smallest budget the remote API accepts (one currency unit).
pub const MIN_BUDGET_MICROS: i64 = MICROS_PER_UNIT;

/// Errors converting between currency amounts and micros.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The converted amount does not fit in an `i64`.
    #[error("Amount {amount} is too large to express in micros")]
    Overflow {
        /// The offending currency amount.
        amount: String,
    },
}

/// An amount expressed in micros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Micros(i64);

impl Micros {
    /// Zero micros.
    pub const ZERO: Self = Self(0);

    /// Create from a raw micros count.
    #[must_use]
    pub const fn new(micros: i64) -> Self {
        Self(micros)
    }

    /// Convert a currency amount to micros.
    ///
    /// Fractions of a micro are truncated toward zero.
    pub fn from_currency(amount: Decimal) -> Result<Self, MoneyError> {
        let scaled = amount
            .checked_mul(Decimal::from(MICROS_PER_UNIT))
            .ok_or_else(|| MoneyError::Overflow {
                amount: amount.to_string(),
            })?;

        scaled
            .trunc()
            .to_i64()
            .map(Self)
            .ok_or_else(|| MoneyError::Overflow {
                amount: amount.to_string(),
            })
    }

    /// Get the raw micros count.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }

    /// Convert to a currency amount.
    #[must_use]
    pub fn to_currency(&self) -> Decimal {
        Decimal::new(self.0, 6).normalize()
    }

    /// Returns true if this amount is strictly positive.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Micros {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.to_currency())
    }
}

impl From<i64> for Micros {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn currency_to_micros() {
        assert_eq!(
            Micros::from_currency(dec!(1500)).unwrap(),
            Micros::new(1_500_000_000)
        );
        assert_eq!(
            Micros::from_currency(dec!(0.5)).unwrap(),
            Micros::new(500_000)
        );
    }

    #[test]
    fn currency_fraction_of_micro_truncates() {
        assert_eq!(
            Micros::from_currency(dec!(1.0000009)).unwrap(),
            Micros::new(1_000_000)
        );
    }

    #[test]
    fn currency_overflow_is_error() {
        let err = Micros::from_currency(Decimal::MAX).unwrap_err();
        assert!(matches!(err, MoneyError::Overflow { .. }));
    }

    #[test]
    fn micros_to_currency() {
        assert_eq!(Micros::new(1_500_000_000).to_currency(), dec!(1500));
        assert_eq!(Micros::new(1_250_000).to_currency(), dec!(1.25));
    }

    #[test]
    fn display_uses_two_decimals() {
        assert_eq!(Micros::new(100_000_000_000).to_string(), "100000.00");
        assert_eq!(Micros::new(1_500_000).to_string(), "1.50");
    }

    #[test]
    fn is_positive() {
        assert!(Micros::new(1).is_positive());
        assert!(!Micros::ZERO.is_positive());
        assert!(!Micros::new(-5).is_positive());
    }
}
