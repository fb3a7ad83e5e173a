//! Provisioning Engine Binary
//!
//! Serves the named provisioning operations over HTTP.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin provisioning-engine
//! ```
//!
//! # Environment Variables
//!
//! ## Configuration
//! - `PROVISIONING_CONFIG`: YAML config path (default: `config.yaml`, optional)
//!
//! ## Guardrails (override the file)
//! - `DRY_RUN`: simulate every mutation (default: false)
//! - `REQUIRE_CONFIRMATION`: bulk changes need `confirm: true` (default: true)
//! - `MAX_BUDGET_MICROS`: daily budget ceiling (default: 100000000000)
//! - `MAX_CAMPAIGNS_BULK`: bulk target limit (default: 50)
//!
//! ## Observability
//! - `METRICS_ENABLED`: start the Prometheus exporter (default: false)
//! - `OTEL_ENABLED`: export traces over OTLP (default: true)
//! - `RUST_LOG`: Log level (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use provisioning_engine::application::OperationDispatcher;
use provisioning_engine::application::ports::{MutationGatewayPort, QueryPort};
use provisioning_engine::config::{Config, GatewayMode, load_config_or_default};
use provisioning_engine::domain::guardrails::{GuardrailConfig, GuardrailEngine};
use provisioning_engine::infrastructure::gateway::{
    InMemoryGateway, RestGateway, RestGatewayConfig,
};
use provisioning_engine::infrastructure::http::{AppState, create_router};
use provisioning_engine::observability::{MetricsConfig, init_metrics};
use provisioning_engine::telemetry::init_telemetry;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config_path = std::env::var("PROVISIONING_CONFIG").ok();
    let config =
        load_config_or_default(config_path.as_deref()).context("failed to load configuration")?;

    let _telemetry = init_telemetry(&config.observability.logging);

    tracing::info!("Starting Provisioning Engine");

    let guardrails = Arc::new(
        config
            .guardrails
            .to_runtime_from_env()
            .context("invalid guardrail configuration")?,
    );
    log_config(&config, &guardrails);

    if env_flag("METRICS_ENABLED") {
        let addr = socket_addr(&config.server.bind_address, config.server.metrics_port)?;
        init_metrics(&MetricsConfig::with_addr(addr)).context("failed to start metrics exporter")?;
    }

    let engine = GuardrailEngine::new(guardrails);
    let app = match config.gateway.mode {
        GatewayMode::Rest => {
            let gateway = Arc::new(
                RestGateway::new(&RestGatewayConfig::from_settings(&config.gateway))
                    .context("failed to create REST gateway")?,
            );
            tracing::info!(
                base_url = %config.gateway.base_url,
                api_version = %config.gateway.api_version,
                "REST gateway initialized"
            );
            build_app(Arc::clone(&gateway), gateway, engine)
        }
        GatewayMode::InMemory => {
            tracing::warn!("In-memory gateway selected; no remote calls will be made");
            let gateway = Arc::new(InMemoryGateway::new());
            build_app(Arc::clone(&gateway), gateway, engine)
        }
    };

    let http_addr = socket_addr(&config.server.bind_address, config.server.http_port)?;
    let listener = TcpListener::bind(http_addr)
        .await
        .with_context(|| format!("failed to bind {http_addr}"))?;

    tracing::info!(%http_addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  GET  /api/v1/guardrails");
    tracing::info!("  GET  /api/v1/operations");
    tracing::info!("  POST /api/v1/operations/{{name}}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Provisioning engine stopped");
    Ok(())
}

/// Wire the dispatcher and router for one gateway implementation.
fn build_app<G, Q>(gateway: Arc<G>, query: Arc<Q>, guardrails: GuardrailEngine) -> axum::Router
where
    G: MutationGatewayPort + 'static,
    Q: QueryPort + 'static,
{
    let dispatcher = OperationDispatcher::new(gateway, query, guardrails);
    create_router(AppState {
        dispatcher: Arc::new(dispatcher),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Log the loaded configuration.
fn log_config(config: &Config, guardrails: &GuardrailConfig) {
    tracing::info!(
        http_port = config.server.http_port,
        gateway_mode = ?config.gateway.mode,
        dry_run = guardrails.dry_run(),
        require_confirmation = guardrails.require_confirmation(),
        max_budget_micros = guardrails.max_budget().value(),
        max_bulk_count = guardrails.max_bulk_count(),
        "Configuration loaded"
    );
    if guardrails.dry_run() {
        tracing::warn!("DRY_RUN is enabled; mutations will be simulated");
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| v.eq_ignore_ascii_case("true"))
}

fn socket_addr(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_err() {
        load_dotenv_from_ancestors();
    }
}

fn load_dotenv_from_ancestors() {
    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
