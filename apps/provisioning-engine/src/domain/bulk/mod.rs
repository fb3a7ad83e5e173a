//! Bulk Status Bounded Context
//!
//! Pause or enable many campaigns at once. A request names its targets
//! explicitly or by a name pattern; the pattern is resolved to concrete
//! campaigns before any guardrail runs.

mod request;
mod result;
mod safety;

pub use request::{BulkOperationRequest, BulkTarget, ResolvedTarget, pattern_to_like};
pub use result::{BulkStatusOutcome, BulkStatusReport, TargetResult};
pub use safety::enable_safety_issues;
