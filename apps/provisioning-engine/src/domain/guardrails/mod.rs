//! Guardrails Bounded Context
//!
//! Stateless policy checks evaluated before any mutation reaches the remote
//! API, plus the dry-run simulator that replaces a mutation with a
//! description of what would have happened.
//!
//! # Key Concepts
//!
//! - **GuardrailConfig**: Immutable process-wide limits and toggles
//! - **GuardrailEngine**: Pure predicates over the config
//! - **DryRunResult**: Masked "would execute" description of a mutation

mod config;
mod dry_run;
mod engine;
mod masking;
mod violation;

pub use config::{GuardrailConfig, GuardrailConfigError};
pub use dry_run::{DRY_RUN_MESSAGE, DryRunResult};
pub use engine::{BulkCheck, GuardrailChecks, GuardrailEngine};
pub use masking::{mask_identifier, mask_params, mask_sensitive_text, mask_value};
pub use violation::{GuardrailViolation, ViolationKind};
