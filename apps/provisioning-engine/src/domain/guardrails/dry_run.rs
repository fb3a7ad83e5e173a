//! Dry-run simulation result.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Banner included in every dry-run response.
pub const DRY_RUN_MESSAGE: &str = "This is a DRY RUN. No actual changes were made.";

/// Description of a mutation that was simulated instead of executed.
///
/// Parameters are masked before they are stored here; the result never
/// carries a resource identifier created by the remote side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DryRunResult {
    /// Always `true`; lets callers tell simulations from committed changes.
    pub dry_run: bool,
    /// Operation that would have run.
    pub operation: String,
    /// Whether every guardrail passed for these parameters.
    pub would_execute: bool,
    /// Masked parameter snapshot.
    pub params: Map<String, Value>,
    /// Guardrail violations, one message each.
    pub warnings: Vec<String>,
    /// Ordered remote steps that would run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub planned_steps: Vec<String>,
    /// Human-readable banner.
    pub message: String,
}

impl DryRunResult {
    /// Attach the intended step sequence.
    #[must_use]
    pub fn with_planned_steps<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.planned_steps = steps.into_iter().map(Into::into).collect();
        self
    }

    /// Record a problem found outside the guardrail checks.
    #[must_use]
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self.would_execute = false;
        self
    }
}
