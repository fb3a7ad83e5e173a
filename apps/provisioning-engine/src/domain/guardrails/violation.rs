//! Guardrail violation types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which guardrail rejected a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    /// Amount above the configured ceiling.
    BudgetExceeded,
    /// Amount zero or negative.
    InvalidBudget,
    /// Ratio target outside the configured bounds.
    RatioOutOfRange,
    /// Too many targets in one bulk operation.
    BulkLimitExceeded,
    /// Multi-target operation without explicit confirmation.
    ConfirmationRequired,
}

impl ViolationKind {
    /// Stable code string, also used as a metrics label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BudgetExceeded => "BUDGET_EXCEEDED",
            Self::InvalidBudget => "INVALID_BUDGET",
            Self::RatioOutOfRange => "RATIO_OUT_OF_RANGE",
            Self::BulkLimitExceeded => "BULK_LIMIT_EXCEEDED",
            Self::ConfirmationRequired => "CONFIRMATION_REQUIRED",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected guardrail check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{kind}: {message}")]
pub struct GuardrailViolation {
    /// Violated policy.
    pub kind: ViolationKind,
    /// Operation being checked.
    pub operation: String,
    /// Human-readable explanation.
    pub message: String,
    /// Offending value.
    pub observed: Option<String>,
    /// Limit that was breached.
    pub limit: Option<String>,
}

impl GuardrailViolation {
    /// Create a new violation.
    #[must_use]
    pub fn new(
        kind: ViolationKind,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            operation: operation.into(),
            message: message.into(),
            observed: None,
            limit: None,
        }
    }

    /// Add observed value.
    #[must_use]
    pub fn with_observed(mut self, value: impl Into<String>) -> Self {
        self.observed = Some(value.into());
        self
    }

    /// Add limit value.
    #[must_use]
    pub fn with_limit(mut self, value: impl Into<String>) -> Self {
        self.limit = Some(value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code_and_message() {
        let violation = GuardrailViolation::new(
            ViolationKind::BulkLimitExceeded,
            "pause-campaign",
            "too many",
        );
        assert_eq!(violation.to_string(), "BULK_LIMIT_EXCEEDED: too many");
    }

    #[test]
    fn kind_serializes_screaming_snake() {
        let json = serde_json::to_string(&ViolationKind::RatioOutOfRange).unwrap();
        assert_eq!(json, "\"RATIO_OUT_OF_RANGE\"");
    }

    #[test]
    fn builder_sets_context() {
        let violation = GuardrailViolation::new(ViolationKind::BudgetExceeded, "op", "msg")
            .with_observed("2")
            .with_limit("1");
        assert_eq!(violation.observed.as_deref(), Some("2"));
        assert_eq!(violation.limit.as_deref(), Some("1"));
    }
}
