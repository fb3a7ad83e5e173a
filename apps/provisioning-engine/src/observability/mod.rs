//! Observability module for metrics.
//!
//! Logging and tracing setup lives in [`crate::telemetry`].

mod metrics;

pub use metrics::{
    MetricsConfig, MetricsError, init_metrics, record_gateway_call, record_guardrail_rejection,
    record_operation,
};
