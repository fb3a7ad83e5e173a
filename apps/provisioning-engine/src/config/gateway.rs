//! Remote API gateway configuration.

use serde::{Deserialize, Serialize};

/// Which gateway implementation to wire in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayMode {
    /// HTTP calls to the remote API.
    #[default]
    Rest,
    /// Local recording gateway; nothing leaves the process.
    InMemory,
}

/// Gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Implementation to use.
    #[serde(default)]
    pub mode: GatewayMode,
    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API version path segment.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Developer token header value.
    #[serde(default)]
    pub developer_token: String,
    /// Manager account used as `login-customer-id`.
    #[serde(default)]
    pub login_customer_id: Option<String>,
    /// OAuth access token.
    #[serde(default)]
    pub access_token: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retries for read-only queries.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Initial retry backoff in milliseconds.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            mode: GatewayMode::default(),
            base_url: default_base_url(),
            api_version: default_api_version(),
            developer_token: String::new(),
            login_customer_id: None,
            access_token: String::new(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
        }
    }
}

fn default_base_url() -> String {
    "https://googleads.googleapis.com".to_string()
}

fn default_api_version() -> String {
    "v19".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    500
}
