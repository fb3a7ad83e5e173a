// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::option_if_let_else,
        clippy::default_trait_access,
        clippy::items_after_statements,
        clippy::or_fun_call
    )
)]

//! Provisioning Engine - Rust Core Library
//!
//! Guarded provisioning of advertising campaign bundles against a remote
//! advertising API.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Pure rules, no I/O
//!   - `resource_names`: building and parsing remote resource names
//!   - `schema`: declared parameter shapes and the validator
//!   - `guardrails`: budget/ratio/bulk/confirmation limits, dry-run, masking
//!   - `provisioning`: campaign bundle requests, steps and outcomes
//!   - `bulk`: multi-campaign status change targets and reports
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: `MutationGatewayPort`, `QueryPort`
//!   - `use_cases`: provision, update budget, set ratio target, bulk status,
//!     link feed, read-only query
//!   - `operations`: the named operation surface
//!
//! - **Infrastructure**: Adapters
//!   - `gateway`: REST adapter and in-memory recording adapter
//!   - `http`: axum controller

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// YAML + environment configuration.
pub mod config;

/// Operation-boundary error type.
pub mod error;

/// Prometheus metrics.
pub mod observability;

/// Logging and tracing setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use application::ports::{GatewayError, MutationGatewayPort, QueryPort};
pub use application::{Operation, OperationDispatcher, OperationResponse};
pub use domain::guardrails::{GuardrailConfig, GuardrailEngine, GuardrailViolation};
pub use domain::provisioning::{ProvisioningOutcome, ProvisioningRequest};
pub use error::{ErrorCode, OperationError};
pub use infrastructure::gateway::{InMemoryGateway, RestGateway, RestGatewayConfig};
pub use infrastructure::http::{AppState, create_router};
