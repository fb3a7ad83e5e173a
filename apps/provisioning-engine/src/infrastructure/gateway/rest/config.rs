//! REST gateway configuration.

use std::time::Duration;

use crate::config::GatewayConfig;

/// Configuration for the REST gateway adapter.
#[derive(Debug, Clone)]
pub struct RestGatewayConfig {
    /// API host, without version.
    pub base_url: String,
    /// API version path segment.
    pub api_version: String,
    /// Developer token header value.
    pub developer_token: String,
    /// Manager account sent as `login-customer-id`.
    pub login_customer_id: Option<String>,
    /// OAuth access token.
    pub access_token: String,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Retry policy for read-only queries.
    pub retry: RetryConfig,
}

impl RestGatewayConfig {
    /// Create a new configuration with default timeout and retry policy.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        developer_token: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_version: "v19".to_string(),
            developer_token: developer_token.into(),
            login_customer_id: None,
            access_token: access_token.into(),
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
        }
    }

    /// Build from the loaded gateway settings.
    #[must_use]
    pub fn from_settings(settings: &GatewayConfig) -> Self {
        let login_customer_id = settings
            .login_customer_id
            .as_ref()
            .map(|id| id.chars().filter(char::is_ascii_digit).collect::<String>())
            .filter(|id| !id.is_empty());

        Self {
            base_url: settings.base_url.clone(),
            api_version: settings.api_version.clone(),
            developer_token: settings.developer_token.clone(),
            login_customer_id,
            access_token: settings.access_token.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
            retry: RetryConfig {
                max_attempts: settings.max_retries.max(1),
                initial_backoff: Duration::from_millis(settings.initial_backoff_ms),
                ..RetryConfig::default()
            },
        }
    }

    /// Set the API version.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the manager account.
    #[must_use]
    pub fn with_login_customer_id(mut self, id: impl Into<String>) -> Self {
        self.login_customer_id = Some(id.into());
        self
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry configuration.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Versioned API root, e.g. `https://host/v19`.
    #[must_use]
    pub fn api_root(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_version.trim_matches('/')
        )
    }
}

/// Retry configuration.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Initial backoff duration.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Backoff multiplier.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_root_joins_version() {
        let config = RestGatewayConfig::new("https://ads.example.com/", "dev", "token");
        assert_eq!(config.api_root(), "https://ads.example.com/v19");

        let config = config.with_api_version("v20");
        assert_eq!(config.api_root(), "https://ads.example.com/v20");
    }

    #[test]
    fn from_settings_normalizes_login_customer_id() {
        let settings = GatewayConfig {
            login_customer_id: Some("111-222-3333".to_string()),
            timeout_secs: 5,
            max_retries: 4,
            initial_backoff_ms: 50,
            ..GatewayConfig::default()
        };

        let config = RestGatewayConfig::from_settings(&settings);
        assert_eq!(config.login_customer_id.as_deref(), Some("1112223333"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_attempts, 4);
        assert_eq!(config.retry.initial_backoff, Duration::from_millis(50));
    }

    #[test]
    fn blank_login_customer_id_is_dropped() {
        let settings = GatewayConfig {
            login_customer_id: Some(String::new()),
            ..GatewayConfig::default()
        };
        assert!(
            RestGatewayConfig::from_settings(&settings)
                .login_customer_id
                .is_none()
        );
    }
}
