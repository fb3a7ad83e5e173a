//! HTTP response DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::Operation;
use crate::domain::guardrails::GuardrailConfig;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Active guardrail limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailsResponse {
    /// Mutations are simulated.
    pub dry_run: bool,
    /// Bulk mutations need `confirm: true`.
    pub require_confirmation: bool,
    /// Daily budget ceiling in micros.
    pub max_budget_micros: i64,
    /// Daily budget ceiling in currency.
    pub max_budget_currency: Decimal,
    /// Lowest accepted ratio target.
    pub min_ratio_target: f64,
    /// Highest accepted ratio target.
    pub max_ratio_target: f64,
    /// Largest bulk target count.
    pub max_bulk_count: usize,
}

impl From<&GuardrailConfig> for GuardrailsResponse {
    fn from(config: &GuardrailConfig) -> Self {
        Self {
            dry_run: config.dry_run(),
            require_confirmation: config.require_confirmation(),
            max_budget_micros: config.max_budget().value(),
            max_budget_currency: config.max_budget().to_currency(),
            min_ratio_target: config.min_ratio_target(),
            max_ratio_target: config.max_ratio_target(),
            max_bulk_count: config.max_bulk_count(),
        }
    }
}

/// One listed operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationInfo {
    /// Name used in `POST /api/v1/operations/{name}`.
    pub name: String,
    /// Parameter shape.
    pub shape: String,
    /// Whether the operation changes remote state.
    pub mutates: bool,
}

impl From<Operation> for OperationInfo {
    fn from(operation: Operation) -> Self {
        Self {
            name: operation.name().to_string(),
            shape: operation.shape().to_string(),
            mutates: operation.is_mutation(),
        }
    }
}

/// Operation listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationsResponse {
    /// Every operation.
    pub operations: Vec<OperationInfo>,
}
