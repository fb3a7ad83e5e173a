//! Operation-boundary errors.
//!
//! Every failure that crosses the operation surface is an [`OperationError`]:
//! a stable code, a human-readable message and key/value context. Each code
//! maps to one HTTP status.
//!
//! # HTTP Status Codes
//!
//! | Code | Status | Usage |
//! |------|--------|-------|
//! | `VALIDATION_ERROR` | 422 | Parameters violate the operation's shape |
//! | `INVALID_BUDGET` | 422 | Budget not positive or below one unit |
//! | `BUDGET_EXCEEDED` | 412 | Budget above the configured ceiling |
//! | `RATIO_OUT_OF_RANGE` | 412 | Ratio target outside the configured bounds |
//! | `BULK_LIMIT_EXCEEDED` | 412 | Too many targets |
//! | `CONFIRMATION_REQUIRED` | 412 | Multi-target change without `confirm` |
//! | `NOT_FOUND` | 404 | Campaign does not exist |
//! | `UNKNOWN_OPERATION` | 404 | No such operation |
//! | `GATEWAY_ERROR` | 502 | Remote API call failed |
//! | `PARTIAL_PROVISIONING` | 502 | Some bundle steps succeeded, a later one failed |
//! | `INTERNAL_ERROR` | 500 | Unexpected failure |

use std::collections::BTreeMap;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::dto::RequestError;
use crate::application::ports::GatewayError;
use crate::application::use_cases::UseCaseError;
use crate::domain::guardrails::{GuardrailViolation, ViolationKind, mask_sensitive_text};
use crate::domain::provisioning::ProvisioningError;
use crate::domain::schema::SchemaError;

/// Stable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Parameters violate the operation's shape.
    ValidationError,
    /// Budget not positive or below one unit.
    InvalidBudget,
    /// Budget above the configured ceiling.
    BudgetExceeded,
    /// Ratio target outside the configured bounds.
    RatioOutOfRange,
    /// Too many targets.
    BulkLimitExceeded,
    /// Multi-target change without confirmation.
    ConfirmationRequired,
    /// Campaign does not exist.
    NotFound,
    /// No such operation.
    UnknownOperation,
    /// Remote API call failed.
    GatewayError,
    /// Bundle stopped after creating some resources.
    PartialProvisioning,
    /// Unexpected failure.
    InternalError,
}

impl ErrorCode {
    /// HTTP status for this code.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::ValidationError | Self::InvalidBudget => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BudgetExceeded
            | Self::RatioOutOfRange
            | Self::BulkLimitExceeded
            | Self::ConfirmationRequired => StatusCode::PRECONDITION_FAILED,
            Self::NotFound | Self::UnknownOperation => StatusCode::NOT_FOUND,
            Self::GatewayError | Self::PartialProvisioning => StatusCode::BAD_GATEWAY,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidBudget => "INVALID_BUDGET",
            Self::BudgetExceeded => "BUDGET_EXCEEDED",
            Self::RatioOutOfRange => "RATIO_OUT_OF_RANGE",
            Self::BulkLimitExceeded => "BULK_LIMIT_EXCEEDED",
            Self::ConfirmationRequired => "CONFIRMATION_REQUIRED",
            Self::NotFound => "NOT_FOUND",
            Self::UnknownOperation => "UNKNOWN_OPERATION",
            Self::GatewayError => "GATEWAY_ERROR",
            Self::PartialProvisioning => "PARTIAL_PROVISIONING",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ViolationKind> for ErrorCode {
    fn from(kind: ViolationKind) -> Self {
        match kind {
            ViolationKind::BudgetExceeded => Self::BudgetExceeded,
            ViolationKind::InvalidBudget => Self::InvalidBudget,
            ViolationKind::RatioOutOfRange => Self::RatioOutOfRange,
            ViolationKind::BulkLimitExceeded => Self::BulkLimitExceeded,
            ViolationKind::ConfirmationRequired => Self::ConfirmationRequired,
        }
    }
}

/// A failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] {message}")]
pub struct OperationError {
    code: ErrorCode,
    message: String,
    context: Vec<(String, String)>,
}

impl OperationError {
    /// Create a new operation error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    /// Add context to the error.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the context.
    #[must_use]
    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    /// Unknown operation name.
    #[must_use]
    pub fn unknown_operation(name: &str) -> Self {
        Self::new(
            ErrorCode::UnknownOperation,
            format!("Unknown operation: {name}"),
        )
        .with_context("operation", name)
    }

    /// Unexpected failure.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Structured response body.
    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            success: false,
            error: self.code,
            message: self.message.clone(),
            details: self.context.iter().cloned().collect(),
        }
    }
}

/// Body returned for a failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Always false.
    pub success: bool,
    /// Error code.
    pub error: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Additional context.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, String>,
}

impl From<SchemaError> for OperationError {
    fn from(err: SchemaError) -> Self {
        let mut out = Self::new(ErrorCode::ValidationError, err.to_string());
        if let Some(field) = err.field() {
            out = out.with_context("field", field);
        }
        out
    }
}

impl From<GuardrailViolation> for OperationError {
    fn from(v: GuardrailViolation) -> Self {
        let mut out = Self::new(v.kind.into(), v.message).with_context("operation", v.operation);
        if let Some(observed) = v.observed {
            out = out.with_context("observed", observed);
        }
        if let Some(limit) = v.limit {
            out = out.with_context("limit", limit);
        }
        out
    }
}

impl From<GatewayError> for OperationError {
    fn from(err: GatewayError) -> Self {
        let code = match err {
            GatewayError::NotFound { .. } | GatewayError::Remote { status: 404, .. } => {
                ErrorCode::NotFound
            }
            _ => ErrorCode::GatewayError,
        };
        let mut out = Self::new(code, mask_sensitive_text(&err.to_string()));
        if let Some(status) = err.status() {
            out = out.with_context("remote_status", status.to_string());
        }
        if let Some(remote_code) = err.code() {
            out = out.with_context("remote_code", remote_code);
        }
        out
    }
}

impl From<ProvisioningError> for OperationError {
    fn from(err: ProvisioningError) -> Self {
        match err {
            ProvisioningError::Guardrail(v) => v.into(),
            ProvisioningError::NegativeBudget(_) | ProvisioningError::BudgetTooLow(_) => {
                Self::new(ErrorCode::InvalidBudget, err.to_string())
            }
            other => Self::new(ErrorCode::ValidationError, other.to_string()),
        }
    }
}

impl From<RequestError> for OperationError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Provisioning(e) => e.into(),
            other => Self::new(ErrorCode::ValidationError, other.to_string()),
        }
    }
}

impl From<UseCaseError> for OperationError {
    fn from(err: UseCaseError) -> Self {
        match err {
            UseCaseError::Invalid(e) => e.into(),
            UseCaseError::Guardrail(v) => v.into(),
            UseCaseError::ResourceName(e) => Self::new(ErrorCode::ValidationError, e.to_string()),
            UseCaseError::CampaignNotFound(id) => {
                Self::new(ErrorCode::NotFound, format!("Campaign {id} not found"))
                    .with_context("campaign_id", id)
            }
            UseCaseError::Gateway(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_http_status() {
        assert_eq!(ErrorCode::ValidationError.http_status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ErrorCode::BudgetExceeded.http_status(), StatusCode::PRECONDITION_FAILED);
        assert_eq!(ErrorCode::UnknownOperation.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::PartialProvisioning.http_status(), StatusCode::BAD_GATEWAY);
        assert_eq!(ErrorCode::InternalError.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn guardrail_violation_keeps_limits() {
        let violation = GuardrailViolation::new(
            ViolationKind::BulkLimitExceeded,
            "pause-campaign",
            "too many",
        )
        .with_observed("60")
        .with_limit("50");

        let err = OperationError::from(violation);

        assert_eq!(err.code(), ErrorCode::BulkLimitExceeded);
        let body = err.to_body();
        assert_eq!(body.details["observed"], "60");
        assert_eq!(body.details["limit"], "50");
        assert!(!body.success);
    }

    #[test]
    fn gateway_error_preserves_remote_status() {
        let err = OperationError::from(GatewayError::Remote {
            status: 400,
            code: Some("INVALID_ARGUMENT".to_string()),
            message: "Bad value".to_string(),
        });
        assert_eq!(err.code(), ErrorCode::GatewayError);
        assert_eq!(err.message(), "Remote error (400): Bad value");
        assert!(err.context().contains(&("remote_code".to_string(), "INVALID_ARGUMENT".to_string())));
    }

    #[test]
    fn remote_not_found_keeps_status_and_code() {
        let err = OperationError::from(GatewayError::Remote {
            status: 404,
            code: Some("NOT_FOUND".to_string()),
            message: "Requested entity was not found".to_string(),
        });
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert!(err.context().contains(&("remote_status".to_string(), "404".to_string())));
        assert!(err.context().contains(&("remote_code".to_string(), "NOT_FOUND".to_string())));
    }

    #[test]
    fn permission_denied_keeps_403() {
        let err = OperationError::from(GatewayError::Authentication {
            status: Some(403),
            code: Some("PERMISSION_DENIED".to_string()),
            message: "The caller does not have permission".to_string(),
        });
        assert_eq!(err.code(), ErrorCode::GatewayError);
        assert!(err.context().contains(&("remote_status".to_string(), "403".to_string())));
        assert!(err.context().contains(&("remote_code".to_string(), "PERMISSION_DENIED".to_string())));
    }

    #[test]
    fn budget_floor_is_invalid_budget() {
        let err = OperationError::from(UseCaseError::Invalid(ProvisioningError::BudgetTooLow(5)));
        assert_eq!(err.code(), ErrorCode::InvalidBudget);
        assert_eq!(err.to_string(), "[INVALID_BUDGET] Budget too low: 5 micros (minimum: 1000000)");
    }

    #[test]
    fn body_serializes_code() {
        let body = OperationError::unknown_operation("launch-rocket").to_body();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "UNKNOWN_OPERATION");
        assert_eq!(json["details"]["operation"], "launch-rocket");
    }
}
