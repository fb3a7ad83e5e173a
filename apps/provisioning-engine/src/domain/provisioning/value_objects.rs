//! Provisioning value objects.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ProvisioningError;
use crate::domain::shared::{MIN_BUDGET_MICROS, MerchantCenterId, Micros};

/// A budget in exactly one of its two accepted representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetInput {
    /// Already in micros.
    Micros(Micros),
    /// Human currency amount, converted at [`MICROS_PER_UNIT`](crate::domain::shared::MICROS_PER_UNIT).
    Currency(Decimal),
}

impl BudgetInput {
    /// Build from the two optional request fields; exactly one must be set.
    pub fn from_parts(
        micros: Option<i64>,
        currency: Option<Decimal>,
    ) -> Result<Self, ProvisioningError> {
        match (micros, currency) {
            (Some(m), None) => Ok(Self::Micros(Micros::new(m))),
            (None, Some(c)) => Ok(Self::Currency(c)),
            _ => Err(ProvisioningError::AmbiguousBudget),
        }
    }

    /// Resolve to micros. Both forms share the one-unit floor.
    pub fn resolve(&self) -> Result<Micros, ProvisioningError> {
        let micros = match self {
            Self::Micros(m) => *m,
            Self::Currency(c) => Micros::from_currency(*c)?,
        };
        if micros.value() < MIN_BUDGET_MICROS {
            return Err(ProvisioningError::BudgetTooLow(micros.value()));
        }
        Ok(micros)
    }
}

/// Campaign serving status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    /// Not serving.
    #[default]
    Paused,
    /// Serving.
    Enabled,
}

impl CampaignStatus {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Paused => "PAUSED",
            Self::Enabled => "ENABLED",
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PAUSED" => Ok(Self::Paused),
            "ENABLED" => Ok(Self::Enabled),
            other => Err(format!("Invalid status: {other}. Must be PAUSED or ENABLED")),
        }
    }
}

/// Optional serving window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl DateRange {
    /// Create a range; `end` must not precede `start`.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, ProvisioningError> {
        if let (Some(s), Some(e)) = (start, end)
            && e < s
        {
            return Err(ProvisioningError::InvalidDateRange {
                start: s.to_string(),
                end: e.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Start date.
    #[must_use]
    pub const fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    /// End date.
    #[must_use]
    pub const fn end(&self) -> Option<NaiveDate> {
        self.end
    }
}

/// Merchant catalog to attach to a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedLink {
    /// Merchant Center account.
    pub merchant_center_id: MerchantCenterId,
    /// Optional label filtering the feed.
    pub feed_label: Option<String>,
}

/// One step of the bundle sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisioningStep {
    /// Campaign budget.
    Budget,
    /// Campaign.
    Campaign,
    /// Asset group.
    AssetGroup,
    /// Merchant feed link.
    FeedLink,
}

impl ProvisioningStep {
    /// Step name used in results and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Budget => "budget",
            Self::Campaign => "campaign",
            Self::AssetGroup => "asset_group",
            Self::FeedLink => "feed_link",
        }
    }
}

impl fmt::Display for ProvisioningStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn budget_requires_exactly_one_form() {
        assert!(BudgetInput::from_parts(Some(1), None).is_ok());
        assert!(BudgetInput::from_parts(None, Some(dec!(1))).is_ok());
        assert_eq!(
            BudgetInput::from_parts(None, None),
            Err(ProvisioningError::AmbiguousBudget)
        );
        assert_eq!(
            BudgetInput::from_parts(Some(1), Some(dec!(1))),
            Err(ProvisioningError::AmbiguousBudget)
        );
    }

    #[test]
    fn currency_budget_resolves_to_micros() {
        let budget = BudgetInput::Currency(dec!(1500));
        assert_eq!(budget.resolve().unwrap(), Micros::new(1_500_000_000));
    }

    #[test]
    fn both_forms_share_the_budget_floor() {
        assert_eq!(
            BudgetInput::Currency(dec!(0.5)).resolve(),
            Err(ProvisioningError::BudgetTooLow(500_000))
        );
        assert_eq!(
            BudgetInput::Micros(Micros::new(500_000)).resolve(),
            Err(ProvisioningError::BudgetTooLow(500_000))
        );
        assert_eq!(
            BudgetInput::Currency(dec!(1)).resolve(),
            BudgetInput::Micros(Micros::new(1_000_000)).resolve()
        );
    }

    #[test]
    fn status_parse_and_display() {
        assert_eq!("PAUSED".parse::<CampaignStatus>(), Ok(CampaignStatus::Paused));
        assert_eq!(CampaignStatus::Enabled.to_string(), "ENABLED");
        assert!("REMOVED".parse::<CampaignStatus>().is_err());
        assert_eq!(CampaignStatus::default(), CampaignStatus::Paused);
    }

    #[test]
    fn date_range_rejects_inverted() {
        let d = |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        assert!(DateRange::new(Some(d("2025-11-10")), Some(d("2025-12-01"))).is_ok());
        assert!(DateRange::new(Some(d("2025-11-10")), Some(d("2025-11-01"))).is_err());
        assert!(DateRange::new(None, Some(d("2025-11-01"))).is_ok());
    }

    #[test]
    fn step_names() {
        assert_eq!(ProvisioningStep::AssetGroup.as_str(), "asset_group");
        assert_eq!(
            serde_json::to_string(&ProvisioningStep::FeedLink).unwrap(),
            "\"feed_link\""
        );
    }
}
