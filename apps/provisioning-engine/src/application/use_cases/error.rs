//! Use case errors.

use thiserror::Error;

use crate::application::ports::GatewayError;
use crate::domain::guardrails::GuardrailViolation;
use crate::domain::provisioning::ProvisioningError;
use crate::domain::resource_names::ResourceNameError;

/// Failure of a single-target or bulk use case.
///
/// Every variant except [`UseCaseError::Gateway`] is raised before any
/// mutation reaches the gateway.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UseCaseError {
    /// Request could not be turned into a valid change.
    #[error(transparent)]
    Invalid(#[from] ProvisioningError),

    /// A guardrail rejected the change.
    #[error(transparent)]
    Guardrail(#[from] GuardrailViolation),

    /// Bad campaign or account identifier.
    #[error(transparent)]
    ResourceName(#[from] ResourceNameError),

    /// The campaign does not exist in the account.
    #[error("Campaign {0} not found")]
    CampaignNotFound(String),

    /// The remote call failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
