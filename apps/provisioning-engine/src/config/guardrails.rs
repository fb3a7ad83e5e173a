//! Guardrail limits as read from the config file.

use serde::{Deserialize, Serialize};

use crate::domain::guardrails::{GuardrailConfig, GuardrailConfigError};
use crate::domain::shared::Micros;

/// File-level guardrail settings.
///
/// The environment variables `DRY_RUN`, `REQUIRE_CONFIRMATION`,
/// `MAX_BUDGET_MICROS` and `MAX_CAMPAIGNS_BULK` override these when the
/// runtime config is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailSettings {
    /// Simulate every mutation.
    #[serde(default)]
    pub dry_run: bool,
    /// Require `confirm` on multi-target operations.
    #[serde(default = "default_true")]
    pub require_confirmation: bool,
    /// Budget ceiling in micros.
    #[serde(default = "default_max_budget_micros")]
    pub max_budget_micros: i64,
    /// Bulk-operation ceiling.
    #[serde(default = "default_max_bulk_count")]
    pub max_bulk_count: usize,
    /// Lowest accepted ratio target.
    #[serde(default = "default_min_ratio_target")]
    pub min_ratio_target: f64,
    /// Highest accepted ratio target.
    #[serde(default = "default_max_ratio_target")]
    pub max_ratio_target: f64,
}

impl Default for GuardrailSettings {
    fn default() -> Self {
        Self {
            dry_run: false,
            require_confirmation: default_true(),
            max_budget_micros: default_max_budget_micros(),
            max_bulk_count: default_max_bulk_count(),
            min_ratio_target: default_min_ratio_target(),
            max_ratio_target: default_max_ratio_target(),
        }
    }
}

impl GuardrailSettings {
    /// Build the immutable runtime config, applying overrides from `lookup`.
    pub fn to_runtime<F>(&self, lookup: F) -> Result<GuardrailConfig, GuardrailConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        GuardrailConfig::default()
            .with_dry_run(self.dry_run)
            .with_require_confirmation(self.require_confirmation)
            .with_max_budget(Micros::new(self.max_budget_micros))
            .with_max_bulk_count(self.max_bulk_count)
            .with_ratio_bounds(self.min_ratio_target, self.max_ratio_target)
            .with_env_overrides(lookup)
    }

    /// Build the runtime config from the process environment.
    pub fn to_runtime_from_env(&self) -> Result<GuardrailConfig, GuardrailConfigError> {
        self.to_runtime(|name| std::env::var(name).ok())
    }
}

const fn default_true() -> bool {
    true
}

const fn default_max_budget_micros() -> i64 {
    100_000_000_000
}

const fn default_max_bulk_count() -> usize {
    50
}

const fn default_min_ratio_target() -> f64 {
    0.01
}

const fn default_max_ratio_target() -> f64 {
    100.0
}
