//! Guardrail Engine
//!
//! Pure predicates over an injected [`GuardrailConfig`]. Every mutating use
//! case evaluates these before touching the gateway; a rejection is a strict
//! no-op with respect to the remote side.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::{
    DRY_RUN_MESSAGE, DryRunResult, GuardrailConfig, GuardrailViolation, ViolationKind, mask_params,
};
use crate::domain::shared::Micros;

/// Multi-target parameters for the bulk and confirmation gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkCheck {
    /// Number of concrete targets after resolution.
    pub affected_count: usize,
    /// Targets came from a wildcard/name pattern.
    pub is_pattern: bool,
    /// Caller confirmed the operation.
    pub confirm: bool,
}

/// The guardrail inputs derived from one request.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GuardrailChecks {
    budget: Option<Micros>,
    ratio_target: Option<f64>,
    bulk: Option<BulkCheck>,
}

impl GuardrailChecks {
    /// Start with no checks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a budget amount.
    #[must_use]
    pub const fn budget(mut self, amount: Micros) -> Self {
        self.budget = Some(amount);
        self
    }

    /// Check a ratio target.
    #[must_use]
    pub const fn ratio_target(mut self, value: f64) -> Self {
        self.ratio_target = Some(value);
        self
    }

    /// Check the bulk ceiling and confirmation requirement.
    #[must_use]
    pub const fn bulk(mut self, affected_count: usize, is_pattern: bool, confirm: bool) -> Self {
        self.bulk = Some(BulkCheck {
            affected_count,
            is_pattern,
            confirm,
        });
        self
    }
}

/// Guardrail Engine - validates mutations against the process-wide limits.
#[derive(Debug, Clone)]
pub struct GuardrailEngine {
    config: Arc<GuardrailConfig>,
}

impl GuardrailEngine {
    /// Create an engine over a shared config.
    #[must_use]
    pub const fn new(config: Arc<GuardrailConfig>) -> Self {
        Self { config }
    }

    /// The config this engine evaluates against.
    #[must_use]
    pub fn config(&self) -> &GuardrailConfig {
        &self.config
    }

    /// Whether mutations should be simulated.
    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.config.dry_run()
    }

    /// Reject non-positive amounts and amounts above the ceiling.
    pub fn validate_budget(&self, operation: &str, amount: Micros) -> Result<(), GuardrailViolation> {
        if !amount.is_positive() {
            return Err(GuardrailViolation::new(
                ViolationKind::InvalidBudget,
                operation,
                format!("Budget must be positive, got {} micros", amount.value()),
            )
            .with_observed(amount.value().to_string())
            .with_limit("> 0"));
        }

        let max = self.config.max_budget();
        if amount > max {
            return Err(GuardrailViolation::new(
                ViolationKind::BudgetExceeded,
                operation,
                format!("Budget {amount} exceeds maximum allowed {max}"),
            )
            .with_observed(amount.value().to_string())
            .with_limit(max.value().to_string()));
        }

        Ok(())
    }

    /// Reject ratio targets outside `[min_ratio_target, max_ratio_target]`.
    pub fn validate_ratio_target(&self, operation: &str, value: f64) -> Result<(), GuardrailViolation> {
        let min = self.config.min_ratio_target();
        let max = self.config.max_ratio_target();

        if !(min..=max).contains(&value) {
            return Err(GuardrailViolation::new(
                ViolationKind::RatioOutOfRange,
                operation,
                format!("Ratio target {value} is outside allowed range [{min}, {max}]"),
            )
            .with_observed(value.to_string())
            .with_limit(format!("[{min}, {max}]")));
        }

        Ok(())
    }

    /// Reject bulk operations over the configured ceiling.
    pub fn validate_bulk_operation(
        &self,
        count: usize,
        operation: &str,
    ) -> Result<(), GuardrailViolation> {
        let max = self.config.max_bulk_count();
        if count > max {
            return Err(GuardrailViolation::new(
                ViolationKind::BulkLimitExceeded,
                operation,
                format!(
                    "Bulk operation '{operation}' affects {count} items, exceeding the maximum of {max}"
                ),
            )
            .with_observed(count.to_string())
            .with_limit(max.to_string()));
        }
        Ok(())
    }

    /// Require `confirm` for multi-target or pattern-targeted operations.
    ///
    /// A single, explicitly identified target never needs confirmation.
    pub fn check_confirmation_required(
        &self,
        operation: &str,
        confirm: bool,
        affected_count: usize,
        is_pattern: bool,
    ) -> Result<(), GuardrailViolation> {
        let is_bulk = affected_count > 1 || is_pattern;
        if self.config.require_confirmation() && is_bulk && !confirm {
            return Err(GuardrailViolation::new(
                ViolationKind::ConfirmationRequired,
                operation,
                format!(
                    "Operation '{operation}' affects {affected_count} items and requires confirmation. Set confirm=true to proceed"
                ),
            )
            .with_observed(affected_count.to_string()));
        }
        Ok(())
    }

    /// Run every requested check and collect the violations in order.
    #[must_use]
    pub fn evaluate(&self, operation: &str, checks: &GuardrailChecks) -> Vec<GuardrailViolation> {
        let mut violations = Vec::new();

        if let Some(amount) = checks.budget {
            violations.extend(self.validate_budget(operation, amount).err());
        }
        if let Some(ratio) = checks.ratio_target {
            violations.extend(self.validate_ratio_target(operation, ratio).err());
        }
        if let Some(bulk) = checks.bulk {
            violations.extend(
                self.validate_bulk_operation(bulk.affected_count, operation)
                    .err(),
            );
            violations.extend(
                self.check_confirmation_required(
                    operation,
                    bulk.confirm,
                    bulk.affected_count,
                    bulk.is_pattern,
                )
                .err(),
            );
        }

        violations
    }

    /// Run every requested check, failing on the first violation.
    pub fn enforce(&self, operation: &str, checks: &GuardrailChecks) -> Result<(), GuardrailViolation> {
        match self.evaluate(operation, checks).into_iter().next() {
            Some(violation) => {
                tracing::warn!(
                    operation,
                    kind = %violation.kind,
                    observed = ?violation.observed,
                    limit = ?violation.limit,
                    "Guardrail rejected operation"
                );
                Err(violation)
            }
            None => Ok(()),
        }
    }

    /// Describe the mutation instead of executing it.
    ///
    /// `would_execute` is true only if every check in `checks` passes; the
    /// violation messages become `warnings`.
    #[must_use]
    pub fn build_dry_run_result(
        &self,
        operation: &str,
        params: &Map<String, Value>,
        checks: &GuardrailChecks,
    ) -> DryRunResult {
        let warnings: Vec<String> = self
            .evaluate(operation, checks)
            .into_iter()
            .map(|v| v.message)
            .collect();

        tracing::info!(
            operation,
            would_execute = warnings.is_empty(),
            warnings = warnings.len(),
            "Dry run: mutation simulated"
        );

        DryRunResult {
            dry_run: true,
            operation: operation.to_string(),
            would_execute: warnings.is_empty(),
            params: mask_params(params),
            warnings,
            planned_steps: Vec::new(),
            message: DRY_RUN_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn engine() -> GuardrailEngine {
        GuardrailEngine::new(Arc::new(GuardrailConfig::default()))
    }

    fn engine_with(config: GuardrailConfig) -> GuardrailEngine {
        GuardrailEngine::new(Arc::new(config))
    }

    #[test]
    fn budget_over_ceiling_is_exceeded() {
        let err = engine()
            .validate_budget("provision-campaign", Micros::new(150_000_000_000))
            .unwrap_err();
        assert_eq!(err.kind, ViolationKind::BudgetExceeded);
        assert_eq!(err.observed.as_deref(), Some("150000000000"));
        assert_eq!(err.limit.as_deref(), Some("100000000000"));
        assert!(err.message.contains("150000.00"));
    }

    #[test]
    fn budget_at_ceiling_passes() {
        assert!(
            engine()
                .validate_budget("op", Micros::new(100_000_000_000))
                .is_ok()
        );
    }

    #[test]
    fn zero_and_negative_budget_are_invalid() {
        for amount in [0, -1] {
            let err = engine().validate_budget("op", Micros::new(amount)).unwrap_err();
            assert_eq!(err.kind, ViolationKind::InvalidBudget);
        }
    }

    #[test]
    fn ratio_bounds_are_inclusive() {
        let engine = engine();
        assert!(engine.validate_ratio_target("op", 0.01).is_ok());
        assert!(engine.validate_ratio_target("op", 100.0).is_ok());
        assert!(engine.validate_ratio_target("op", 0.0).is_err());
        assert!(engine.validate_ratio_target("op", 100.01).is_err());
        assert!(engine.validate_ratio_target("op", f64::NAN).is_err());
    }

    #[test]
    fn bulk_limit() {
        let engine = engine();
        assert!(engine.validate_bulk_operation(50, "pause").is_ok());
        let err = engine.validate_bulk_operation(60, "pause").unwrap_err();
        assert_eq!(err.kind, ViolationKind::BulkLimitExceeded);
    }

    #[test]
    fn confirmation_required_for_bulk_without_confirm() {
        let engine = engine();
        let err = engine
            .check_confirmation_required("pause", false, 5, false)
            .unwrap_err();
        assert_eq!(err.kind, ViolationKind::ConfirmationRequired);
        assert!(engine.check_confirmation_required("pause", true, 5, false).is_ok());
    }

    #[test]
    fn single_explicit_target_never_needs_confirmation() {
        assert!(engine().check_confirmation_required("pause", false, 1, false).is_ok());
    }

    #[test]
    fn pattern_target_needs_confirmation_even_for_one_match() {
        assert!(engine().check_confirmation_required("pause", false, 1, true).is_err());
    }

    #[test]
    fn confirmation_disabled_by_config() {
        let engine = engine_with(GuardrailConfig::default().with_require_confirmation(false));
        assert!(engine.check_confirmation_required("pause", false, 10, true).is_ok());
    }

    #[test]
    fn evaluate_collects_in_order() {
        let checks = GuardrailChecks::new()
            .budget(Micros::new(200_000_000_000))
            .ratio_target(500.0)
            .bulk(60, true, false);
        let kinds: Vec<_> = engine()
            .evaluate("op", &checks)
            .into_iter()
            .map(|v| v.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::BudgetExceeded,
                ViolationKind::RatioOutOfRange,
                ViolationKind::BulkLimitExceeded,
                ViolationKind::ConfirmationRequired,
            ]
        );
    }

    #[test]
    fn enforce_returns_first_violation() {
        let checks = GuardrailChecks::new()
            .budget(Micros::new(-5))
            .ratio_target(500.0);
        let err = engine().enforce("op", &checks).unwrap_err();
        assert_eq!(err.kind, ViolationKind::InvalidBudget);
    }

    #[test]
    fn dry_run_result_masks_and_reports_warnings() {
        let params = json!({ "account_id": "1234567890", "access_token": "abc" });
        let checks = GuardrailChecks::new().budget(Micros::new(150_000_000_000));

        let result =
            engine().build_dry_run_result("provision-campaign", params.as_object().unwrap(), &checks);

        assert!(result.dry_run);
        assert!(!result.would_execute);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.params["account_id"], "******7890");
        assert_eq!(result.params["access_token"], "****");
        assert_eq!(result.message, DRY_RUN_MESSAGE);
    }

    #[test]
    fn dry_run_result_would_execute_when_clean() {
        let checks = GuardrailChecks::new().budget(Micros::new(1_000_000));
        let result = engine().build_dry_run_result("op", &Map::new(), &checks);
        assert!(result.would_execute);
        assert!(result.warnings.is_empty());
    }

    proptest! {
        #[test]
        fn budget_within_bounds_passes(amount in 1_i64..=100_000_000_000) {
            prop_assert!(engine().validate_budget("op", Micros::new(amount)).is_ok());
        }

        #[test]
        fn budget_outside_bounds_fails(amount in prop_oneof![i64::MIN..=0, 100_000_000_001_i64..=i64::MAX]) {
            let err = engine().validate_budget("op", Micros::new(amount)).unwrap_err();
            let expected = if amount <= 0 {
                ViolationKind::InvalidBudget
            } else {
                ViolationKind::BudgetExceeded
            };
            prop_assert_eq!(err.kind, expected);
        }

        #[test]
        fn ratio_within_bounds_passes(value in 0.01_f64..=100.0) {
            prop_assert!(engine().validate_ratio_target("op", value).is_ok());
        }

        #[test]
        fn ratio_outside_bounds_fails(value in prop_oneof![-1000.0_f64..0.01, 100.000_001_f64..1.0e9]) {
            prop_assert!(engine().validate_ratio_target("op", value).is_err());
        }
    }
}
