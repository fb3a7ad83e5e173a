//! Provisioning errors.
//!
//! These are raised before any remote call. Failures after the first remote
//! call are reported through [`ProvisioningReport`](super::ProvisioningReport)
//! instead.

use thiserror::Error;

use crate::domain::guardrails::GuardrailViolation;
use crate::domain::resource_names::ResourceNameError;
use crate::domain::shared::MoneyError;

/// Pre-flight provisioning failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProvisioningError {
    /// Budget missing or supplied in both representations.
    #[error("Exactly one of daily_budget_micros or daily_budget_currency must be provided")]
    AmbiguousBudget,

    /// Currency amount cannot be expressed in micros.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Invalid name or identifier.
    #[error(transparent)]
    ResourceName(#[from] ResourceNameError),

    /// Start date after end date.
    #[error("End date {end} is before start date {start}")]
    InvalidDateRange {
        /// Start date.
        start: String,
        /// End date.
        end: String,
    },

    /// Resuming from a campaign requires the budget it was created with.
    #[error("resume_campaign_resource_name requires resume_budget_resource_name")]
    ResumeWithoutBudget,

    /// An adjustment needs a value that was not supplied.
    #[error("{0} is required for this adjustment type")]
    MissingAdjustmentValue(&'static str),

    /// The adjusted budget would be negative.
    #[error("Resulting budget would be negative: {0} micros")]
    NegativeBudget(i64),

    /// The adjusted budget is below one currency unit.
    #[error("Budget too low: {0} micros (minimum: 1000000)")]
    BudgetTooLow(i64),

    /// A guardrail rejected the request.
    #[error(transparent)]
    Guardrail(#[from] GuardrailViolation),
}
