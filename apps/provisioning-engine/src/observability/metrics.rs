//! Prometheus metrics for the provisioning engine.
//!
//! # Example
//!
//! ```ignore
//! use provisioning_engine::observability::{init_metrics, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::default())?;
//! record_operation("provision-campaign", "success");
//! ```

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 9090)),
        }
    }
}

impl MetricsConfig {
    /// Create a new metrics configuration with custom address.
    #[must_use]
    pub const fn with_addr(addr: SocketAddr) -> Self {
        Self { listen_addr: addr }
    }
}

/// Initialize the Prometheus metrics exporter.
///
/// This starts an HTTP server that exposes metrics at `/metrics`.
///
/// # Errors
///
/// Returns an error if the metrics exporter fails to start (e.g., port already in use).
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

/// Record a completed operation.
///
/// # Arguments
///
/// * `operation` - Operation name (e.g., "provision-campaign")
/// * `outcome` - Outcome label (e.g., "done", "dry_run", "partial", "rejected")
pub fn record_operation(operation: &str, outcome: &str) {
    counter!(
        "provisioning_operations_total",
        "operation" => operation.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record a guardrail rejection.
///
/// * `kind` - Violation code (e.g., "BUDGET_EXCEEDED")
pub fn record_guardrail_rejection(kind: &str) {
    counter!(
        "provisioning_guardrail_rejections_total",
        "kind" => kind.to_string()
    )
    .increment(1);
}

/// Record a remote gateway call.
pub fn record_gateway_call(call: &str, success: bool) {
    counter!(
        "provisioning_gateway_calls_total",
        "call" => call.to_string(),
        "outcome" => if success { "ok" } else { "error" }
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_without_exporter_is_noop() {
        record_operation("provision-campaign", "success");
        record_guardrail_rejection("BUDGET_EXCEEDED");
        record_gateway_call("create_budget", true);
    }

    #[test]
    fn default_addr() {
        assert_eq!(MetricsConfig::default().listen_addr.port(), 9090);
    }
}
