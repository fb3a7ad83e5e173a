//! Guardrail configuration.

use serde::Serialize;
use thiserror::Error;

use crate::domain::shared::Micros;

/// Environment variable toggling dry-run mode.
pub const ENV_DRY_RUN: &str = "DRY_RUN";
/// Environment variable toggling bulk confirmation.
pub const ENV_REQUIRE_CONFIRMATION: &str = "REQUIRE_CONFIRMATION";
/// Environment variable holding the budget ceiling in micros.
pub const ENV_MAX_BUDGET_MICROS: &str = "MAX_BUDGET_MICROS";
/// Environment variable holding the bulk-operation ceiling.
pub const ENV_MAX_CAMPAIGNS_BULK: &str = "MAX_CAMPAIGNS_BULK";

const DEFAULT_MAX_BUDGET_MICROS: i64 = 100_000_000_000;
const DEFAULT_MAX_BULK_COUNT: usize = 50;
const DEFAULT_MIN_RATIO_TARGET: f64 = 0.01;
const DEFAULT_MAX_RATIO_TARGET: f64 = 100.0;

/// Errors constructing a guardrail configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardrailConfigError {
    /// An environment override could not be parsed.
    #[error("Invalid value for {name}: '{value}'")]
    InvalidSetting {
        /// Variable name.
        name: String,
        /// Raw value.
        value: String,
    },

    /// The resulting limits are inconsistent.
    #[error("Invalid guardrail limits: {0}")]
    InvalidLimits(String),
}

/// Process-wide guardrail limits and toggles.
///
/// Built once at startup and shared behind an `Arc`. There are no setters:
/// the `with_*` methods consume the value and are meant for construction
/// only. Reloading means building a new config.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuardrailConfig {
    dry_run: bool,
    require_confirmation: bool,
    max_budget: Micros,
    min_ratio_target: f64,
    max_ratio_target: f64,
    max_bulk_count: usize,
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            require_confirmation: true,
            max_budget: Micros::new(DEFAULT_MAX_BUDGET_MICROS),
            min_ratio_target: DEFAULT_MIN_RATIO_TARGET,
            max_ratio_target: DEFAULT_MAX_RATIO_TARGET,
            max_bulk_count: DEFAULT_MAX_BULK_COUNT,
        }
    }
}

impl GuardrailConfig {
    /// Apply the four environment overrides using `lookup` to read variables.
    ///
    /// Booleans are true only for the literal `true` (case-insensitive).
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, GuardrailConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_DRY_RUN) {
            self.dry_run = parse_flag(&value);
        }
        if let Some(value) = lookup(ENV_REQUIRE_CONFIRMATION) {
            self.require_confirmation = parse_flag(&value);
        }
        if let Some(value) = lookup(ENV_MAX_BUDGET_MICROS) {
            let micros = parse_number::<i64>(ENV_MAX_BUDGET_MICROS, &value)?;
            self.max_budget = Micros::new(micros);
        }
        if let Some(value) = lookup(ENV_MAX_CAMPAIGNS_BULK) {
            self.max_bulk_count = parse_number(ENV_MAX_CAMPAIGNS_BULK, &value)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Set the dry-run flag.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the confirmation-required flag.
    #[must_use]
    pub const fn with_require_confirmation(mut self, require: bool) -> Self {
        self.require_confirmation = require;
        self
    }

    /// Set the budget ceiling.
    #[must_use]
    pub const fn with_max_budget(mut self, max_budget: Micros) -> Self {
        self.max_budget = max_budget;
        self
    }

    /// Set the ratio target bounds.
    #[must_use]
    pub const fn with_ratio_bounds(mut self, min: f64, max: f64) -> Self {
        self.min_ratio_target = min;
        self.max_ratio_target = max;
        self
    }

    /// Set the bulk-operation ceiling.
    #[must_use]
    pub const fn with_max_bulk_count(mut self, max_bulk_count: usize) -> Self {
        self.max_bulk_count = max_bulk_count;
        self
    }

    /// Check the limits are internally consistent.
    pub fn validate(&self) -> Result<(), GuardrailConfigError> {
        if !self.max_budget.is_positive() {
            return Err(GuardrailConfigError::InvalidLimits(
                "max_budget_micros must be positive".to_string(),
            ));
        }
        if self.max_bulk_count == 0 {
            return Err(GuardrailConfigError::InvalidLimits(
                "max_bulk_count must be at least 1".to_string(),
            ));
        }
        if !(self.min_ratio_target > 0.0) {
            return Err(GuardrailConfigError::InvalidLimits(
                "min_ratio_target must be positive".to_string(),
            ));
        }
        if !(self.min_ratio_target < self.max_ratio_target) {
            return Err(GuardrailConfigError::InvalidLimits(
                "min_ratio_target must be below max_ratio_target".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether mutations are simulated.
    #[must_use]
    pub const fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Whether multi-target operations need explicit confirmation.
    #[must_use]
    pub const fn require_confirmation(&self) -> bool {
        self.require_confirmation
    }

    /// Budget ceiling.
    #[must_use]
    pub const fn max_budget(&self) -> Micros {
        self.max_budget
    }

    /// Lowest accepted ratio target.
    #[must_use]
    pub const fn min_ratio_target(&self) -> f64 {
        self.min_ratio_target
    }

    /// Highest accepted ratio target.
    #[must_use]
    pub const fn max_ratio_target(&self) -> f64 {
        self.max_ratio_target
    }

    /// Maximum number of targets in one bulk operation.
    #[must_use]
    pub const fn max_bulk_count(&self) -> usize {
        self.max_bulk_count
    }
}

fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, GuardrailConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| GuardrailConfigError::InvalidSetting {
            name: name.to_string(),
            value: value.to_string(),
        })
}
