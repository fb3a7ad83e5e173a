//! REST gateway error types.

use thiserror::Error;

use crate::application::ports::GatewayError;

/// REST gateway errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RestGatewayError {
    /// Developer token or access token not configured.
    #[error("Missing credentials: {0}")]
    MissingCredentials(&'static str),

    /// HTTP request could not be built.
    #[error("HTTP error: {0}")]
    Http(String),

    /// API returned an error.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status.
        status: u16,
        /// Error status string from the API, e.g. `INVALID_ARGUMENT`.
        code: Option<String>,
        /// Error message from the API.
        message: String,
    },

    /// Credentials rejected (401) or permission denied (403).
    #[error("Authentication failed ({status}): {message}")]
    AuthenticationFailed {
        /// HTTP status.
        status: u16,
        /// Error status string from the API.
        code: Option<String>,
        /// Error message from the API.
        message: String,
    },

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs}s: {message}")]
    RateLimited {
        /// Suggested retry delay in seconds.
        retry_after_secs: u64,
        /// Error status string from the API, e.g. `RESOURCE_EXHAUSTED`.
        code: Option<String>,
        /// Error message from the API.
        message: String,
    },

    /// Network error.
    #[error("Network error: {0}")]
    Network(String),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// Response lacked a field this adapter needs.
    #[error("Response missing {0}")]
    MissingField(String),

    /// Max retries exceeded.
    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded {
        /// Number of attempts made before giving up.
        attempts: u32,
        /// The last failure observed.
        last_error: String,
    },
}

impl From<RestGatewayError> for GatewayError {
    fn from(err: RestGatewayError) -> Self {
        match err {
            RestGatewayError::Api {
                status,
                code,
                message,
            } => Self::Remote {
                status,
                code,
                message,
            },
            RestGatewayError::AuthenticationFailed {
                status,
                code,
                message,
            } => Self::Authentication {
                status: Some(status),
                code,
                message,
            },
            RestGatewayError::MissingCredentials(what) => Self::Authentication {
                status: None,
                code: None,
                message: format!("{what} not configured"),
            },
            RestGatewayError::RateLimited { code, message, .. } => {
                Self::RateLimited { code, message }
            }
            RestGatewayError::Http(message) | RestGatewayError::Network(message) => {
                Self::Connection { message }
            }
            err @ RestGatewayError::MaxRetriesExceeded { .. } => Self::Connection {
                message: err.to_string(),
            },
            RestGatewayError::JsonParse(message) => Self::InvalidResponse { message },
            err @ RestGatewayError::MissingField(_) => Self::InvalidResponse {
                message: err.to_string(),
            },
        }
    }
}
