//! Configuration module for the provisioning engine.
//!
//! Loads YAML configuration with `${VAR}` / `${VAR:-default}` environment
//! interpolation, then validates it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use provisioning_engine::config::load_config;
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Build the runtime guardrail config (env overrides applied)
//! let guardrails = config.guardrails.to_runtime_from_env()?;
//! ```

mod gateway;
mod guardrails;
mod observability;
mod server;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use gateway::{GatewayConfig, GatewayMode};
pub use guardrails::GuardrailSettings;
pub use observability::{LoggingConfig, ObservabilityConfig};
pub use server::ServerConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Remote API gateway configuration.
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Guardrail limits.
    #[serde(default)]
    pub guardrails: GuardrailSettings,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration, falling back to defaults when the file does not exist.
///
/// # Errors
///
/// Returns a `ConfigError` if the file exists but cannot be read, parsed, or validated.
pub fn load_config_or_default(path: Option<&str>) -> Result<Config, ConfigError> {
    match load_config(path) {
        Err(ConfigError::ReadError { source, path }) if source.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path, "Config file not found, using defaults");
            let config = Config::default();
            validate_config(&config)?;
            Ok(config)
        }
        other => other,
    }
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.gateway.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "gateway.base_url must not be empty".to_string(),
        ));
    }

    if config.gateway.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "gateway.timeout_secs must be positive".to_string(),
        ));
    }

    let g = &config.guardrails;
    if g.max_budget_micros <= 0 {
        return Err(ConfigError::ValidationError(
            "guardrails.max_budget_micros must be positive".to_string(),
        ));
    }

    if g.max_bulk_count == 0 {
        return Err(ConfigError::ValidationError(
            "guardrails.max_bulk_count must be at least 1".to_string(),
        ));
    }

    if g.min_ratio_target <= 0.0 {
        return Err(ConfigError::ValidationError(
            "guardrails.min_ratio_target must be positive".to_string(),
        ));
    }

    if g.min_ratio_target >= g.max_ratio_target {
        return Err(ConfigError::ValidationError(
            "guardrails.min_ratio_target must be below max_ratio_target".to_string(),
        ));
    }

    let valid_formats = ["json", "pretty"];
    if !valid_formats.contains(&config.observability.logging.format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {valid_formats:?}"
        )));
    }

    Ok(())
}
