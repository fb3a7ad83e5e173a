//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure dependencies.
//! This layer defines:
//!
//! - **Value Objects**: Immutable domain types with equality by value
//! - **Domain Services**: Stateless policy checks and validation
//!
//! # Bounded Contexts
//!
//! - [`resource_names`]: Building and parsing remote resource identifiers
//! - [`guardrails`]: Budget, ratio, bulk and confirmation policies plus dry-run
//! - [`schema`]: Declarative parameter shapes and their validator
//! - [`provisioning`]: Campaign bundle requests and results
//! - [`bulk`]: Multi-campaign status changes

pub mod bulk;
pub mod guardrails;
pub mod provisioning;
pub mod resource_names;
pub mod schema;
pub mod shared;
