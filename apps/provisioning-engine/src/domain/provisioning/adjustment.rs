//! Budget adjustments.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::{BudgetInput, ProvisioningError};
use crate::domain::shared::{MIN_BUDGET_MICROS, Micros, MoneyError};

/// Adjustment type names accepted on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdjustmentType {
    /// Replace the amount.
    #[default]
    Set,
    /// Add a percentage of the current amount.
    IncreaseByPercent,
    /// Subtract a percentage of the current amount.
    DecreaseByPercent,
    /// Add a fixed number of micros.
    IncreaseByAmount,
    /// Subtract a fixed number of micros.
    DecreaseByAmount,
}

impl AdjustmentType {
    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Set => "SET",
            Self::IncreaseByPercent => "INCREASE_BY_PERCENT",
            Self::DecreaseByPercent => "DECREASE_BY_PERCENT",
            Self::IncreaseByAmount => "INCREASE_BY_AMOUNT",
            Self::DecreaseByAmount => "DECREASE_BY_AMOUNT",
        }
    }

    /// Parse a wire name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SET" => Some(Self::Set),
            "INCREASE_BY_PERCENT" => Some(Self::IncreaseByPercent),
            "DECREASE_BY_PERCENT" => Some(Self::DecreaseByPercent),
            "INCREASE_BY_AMOUNT" => Some(Self::IncreaseByAmount),
            "DECREASE_BY_AMOUNT" => Some(Self::DecreaseByAmount),
            _ => None,
        }
    }
}

/// A fully specified budget change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetAdjustment {
    /// Replace with an explicit amount.
    Set(BudgetInput),
    /// Percentage of the current amount (truncated toward zero).
    IncreaseByPercent(Decimal),
    /// Percentage of the current amount (truncated toward zero).
    DecreaseByPercent(Decimal),
    /// Fixed micros.
    IncreaseByAmount(Micros),
    /// Fixed micros.
    DecreaseByAmount(Micros),
}

impl BudgetAdjustment {
    /// Build from the request fields.
    ///
    /// `SET` needs an explicit amount; every other type needs `value`.
    pub fn from_parts(
        kind: AdjustmentType,
        new_amount: Option<BudgetInput>,
        value: Option<Decimal>,
    ) -> Result<Self, ProvisioningError> {
        let need_value =
            || value.ok_or(ProvisioningError::MissingAdjustmentValue("adjustment_value"));
        let amount = |v: Decimal| {
            v.trunc()
                .to_i64()
                .map(Micros::new)
                .ok_or_else(|| MoneyError::Overflow {
                    amount: v.to_string(),
                })
        };

        Ok(match kind {
            AdjustmentType::Set => Self::Set(new_amount.ok_or(
                ProvisioningError::MissingAdjustmentValue("new_daily_budget_micros or new_daily_budget_currency"),
            )?),
            AdjustmentType::IncreaseByPercent => Self::IncreaseByPercent(need_value()?),
            AdjustmentType::DecreaseByPercent => Self::DecreaseByPercent(need_value()?),
            AdjustmentType::IncreaseByAmount => Self::IncreaseByAmount(amount(need_value()?)?),
            AdjustmentType::DecreaseByAmount => Self::DecreaseByAmount(amount(need_value()?)?),
        })
    }

    /// Wire name of this adjustment.
    #[must_use]
    pub const fn kind(&self) -> AdjustmentType {
        match self {
            Self::Set(_) => AdjustmentType::Set,
            Self::IncreaseByPercent(_) => AdjustmentType::IncreaseByPercent,
            Self::DecreaseByPercent(_) => AdjustmentType::DecreaseByPercent,
            Self::IncreaseByAmount(_) => AdjustmentType::IncreaseByAmount,
            Self::DecreaseByAmount(_) => AdjustmentType::DecreaseByAmount,
        }
    }

    /// Compute the new amount from `current`.
    ///
    /// Rejects negative results and results below one currency unit.
    pub fn apply(&self, current: Micros) -> Result<Micros, ProvisioningError> {
        let overflow = || MoneyError::Overflow {
            amount: current.to_string(),
        };
        let percent_of = |pct: Decimal| -> Result<i64, ProvisioningError> {
            let delta = Decimal::from(current.value())
                .checked_mul(pct)
                .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
                .ok_or_else(overflow)?;
            Ok(delta.trunc().to_i64().ok_or_else(overflow)?)
        };

        let result = match self {
            Self::Set(input) => input.resolve()?.value(),
            Self::IncreaseByPercent(pct) => current
                .value()
                .checked_add(percent_of(*pct)?)
                .ok_or_else(overflow)?,
            Self::DecreaseByPercent(pct) => current
                .value()
                .checked_sub(percent_of(*pct)?)
                .ok_or_else(overflow)?,
            Self::IncreaseByAmount(m) => current
                .value()
                .checked_add(m.value())
                .ok_or_else(overflow)?,
            Self::DecreaseByAmount(m) => current
                .value()
                .checked_sub(m.value())
                .ok_or_else(overflow)?,
        };

        if result < 0 {
            return Err(ProvisioningError::NegativeBudget(result));
        }
        if result < MIN_BUDGET_MICROS {
            return Err(ProvisioningError::BudgetTooLow(result));
        }
        Ok(Micros::new(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const CURRENT: Micros = Micros::new(10_000_000);

    #[test]
    fn set_uses_explicit_amount() {
        let adj = BudgetAdjustment::Set(BudgetInput::Currency(dec!(25)));
        assert_eq!(adj.apply(CURRENT).unwrap(), Micros::new(25_000_000));
    }

    #[test]
    fn percent_changes_truncate() {
        let up = BudgetAdjustment::IncreaseByPercent(dec!(20));
        assert_eq!(up.apply(CURRENT).unwrap(), Micros::new(12_000_000));

        let odd = BudgetAdjustment::IncreaseByPercent(dec!(0.00001));
        assert_eq!(odd.apply(Micros::new(1_000_001)).unwrap(), Micros::new(1_000_001));

        let down = BudgetAdjustment::DecreaseByPercent(dec!(50));
        assert_eq!(down.apply(CURRENT).unwrap(), Micros::new(5_000_000));
    }

    #[test]
    fn amount_changes() {
        let up = BudgetAdjustment::IncreaseByAmount(Micros::new(500_000));
        assert_eq!(up.apply(CURRENT).unwrap(), Micros::new(10_500_000));
    }

    #[test]
    fn negative_result_rejected() {
        let down = BudgetAdjustment::DecreaseByAmount(Micros::new(20_000_000));
        assert_eq!(
            down.apply(CURRENT),
            Err(ProvisioningError::NegativeBudget(-10_000_000))
        );
    }

    #[test]
    fn result_below_one_unit_rejected() {
        let down = BudgetAdjustment::DecreaseByPercent(dec!(95));
        assert_eq!(
            down.apply(CURRENT),
            Err(ProvisioningError::BudgetTooLow(500_000))
        );
    }

    #[test]
    fn from_parts_requires_values() {
        assert!(matches!(
            BudgetAdjustment::from_parts(AdjustmentType::Set, None, Some(dec!(1))),
            Err(ProvisioningError::MissingAdjustmentValue(_))
        ));
        assert!(matches!(
            BudgetAdjustment::from_parts(AdjustmentType::IncreaseByPercent, None, None),
            Err(ProvisioningError::MissingAdjustmentValue("adjustment_value"))
        ));
        assert_eq!(
            BudgetAdjustment::from_parts(AdjustmentType::DecreaseByAmount, None, Some(dec!(1500.9)))
                .unwrap(),
            BudgetAdjustment::DecreaseByAmount(Micros::new(1500))
        );
    }

    #[test]
    fn adjustment_type_names() {
        assert_eq!(AdjustmentType::parse("SET"), Some(AdjustmentType::Set));
        assert_eq!(AdjustmentType::IncreaseByAmount.as_str(), "INCREASE_BY_AMOUNT");
        assert_eq!(AdjustmentType::parse("DOUBLE"), None);
    }
}
