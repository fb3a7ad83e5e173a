//! Pre-enable safety check.

use crate::domain::shared::{MIN_BUDGET_MICROS, Micros};

/// Problems that make a campaign unsafe to enable.
///
/// `budget` is `None` when the campaign could not be found. An empty result
/// means the campaign is safe to enable.
#[must_use]
pub fn enable_safety_issues(budget: Option<Micros>) -> Vec<String> {
    let Some(budget) = budget else {
        return vec!["Campaign not found".to_string()];
    };

    let mut issues = Vec::new();
    if !budget.is_positive() {
        issues.push("Campaign has no budget or budget is 0".to_string());
    }
    if budget.value() < MIN_BUDGET_MICROS {
        issues.push(format!(
            "Campaign budget is very low: {} micros",
            budget.value()
        ));
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_budget_has_no_issues() {
        assert!(enable_safety_issues(Some(Micros::new(1_000_000))).is_empty());
    }

    #[test]
    fn zero_budget_reports_both_issues() {
        assert_eq!(enable_safety_issues(Some(Micros::ZERO)).len(), 2);
    }

    #[test]
    fn low_budget_reported() {
        let issues = enable_safety_issues(Some(Micros::new(999_999)));
        assert_eq!(issues, vec!["Campaign budget is very low: 999999 micros"]);
    }

    #[test]
    fn missing_campaign_reported() {
        assert_eq!(enable_safety_issues(None), vec!["Campaign not found"]);
    }
}
