//! HTTP client wrapper with retry logic for read-only calls.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api_types::{ApiErrorResponse, MutateResponse, SearchRequest, SearchResponse};
use super::config::{RestGatewayConfig, RetryConfig};
use super::error::RestGatewayError;
use crate::domain::guardrails::mask_sensitive_text;

/// HTTP client for the remote API.
///
/// Mutations are sent exactly once. Searches are retried with exponential
/// backoff.
#[derive(Debug, Clone)]
pub struct RestHttpClient {
    client: Client,
    api_root: String,
    developer_token: String,
    access_token: String,
    login_customer_id: Option<String>,
    retry_config: RetryConfig,
}

impl RestHttpClient {
    /// Create a new HTTP client from config.
    pub fn new(config: &RestGatewayConfig) -> Result<Self, RestGatewayError> {
        if config.developer_token.is_empty() {
            return Err(RestGatewayError::MissingCredentials("developer token"));
        }
        if config.access_token.is_empty() {
            return Err(RestGatewayError::MissingCredentials("access token"));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RestGatewayError::Http(e.to_string()))?;

        Ok(Self {
            client,
            api_root: config.api_root(),
            developer_token: config.developer_token.clone(),
            access_token: config.access_token.clone(),
            login_customer_id: config.login_customer_id.clone(),
            retry_config: config.retry.clone(),
        })
    }

    /// `POST customers/{cid}/{collection}:mutate`, single attempt.
    #[allow(clippy::future_not_send)]
    pub async fn mutate<B: Serialize>(
        &self,
        customer_id: &str,
        collection: &str,
        body: &B,
    ) -> Result<MutateResponse, RestGatewayError> {
        let path = format!("/customers/{customer_id}/{collection}:mutate");
        self.post(&path, body, false).await
    }

    /// `POST customers/{cid}/googleAds:search`, retried.
    pub async fn search(
        &self,
        customer_id: &str,
        request: &SearchRequest,
    ) -> Result<SearchResponse, RestGatewayError> {
        let path = format!("/customers/{customer_id}/googleAds:search");
        self.post(&path, request, true).await
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request
            .bearer_auth(&self.access_token)
            .header("developer-token", &self.developer_token);
        match &self.login_customer_id {
            Some(id) => request.header("login-customer-id", id),
            None => request,
        }
    }

    #[allow(clippy::future_not_send, clippy::too_many_lines)]
    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        retry: bool,
    ) -> Result<T, RestGatewayError> {
        let url = format!("{}{path}", self.api_root);
        let mut backoff = ExponentialBackoff::new(&self.retry_config, retry);

        loop {
            let request = self.authorized(self.client.post(&url)).json(body);

            let response = match request.send().await {
                Ok(resp) => resp,
                Err(e) => {
                    if let Some(delay) = backoff.next_backoff() {
                        tracing::warn!(
                            error = %e,
                            delay_ms = delay.as_millis(),
                            attempt = backoff.attempt,
                            "Network error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    if backoff.attempt > 1 {
                        return Err(RestGatewayError::MaxRetriesExceeded {
                            attempts: backoff.attempt,
                            last_error: e.to_string(),
                        });
                    }
                    return Err(RestGatewayError::Network(e.to_string()));
                }
            };

            let status = response.status();

            if status.is_success() {
                let text = response
                    .text()
                    .await
                    .map_err(|e| RestGatewayError::Network(e.to_string()))?;
                let text = if text.trim().is_empty() {
                    "{}"
                } else {
                    text.as_str()
                };
                return serde_json::from_str(text)
                    .map_err(|e| RestGatewayError::JsonParse(e.to_string()));
            }

            // Handle error response
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());

            let error_body = response.text().await.unwrap_or_default();

            let (error_code, error_message) =
                match serde_json::from_str::<ApiErrorResponse>(&error_body) {
                    Ok(err) => (err.error.status, err.error.message),
                    Err(_) => (None, error_body),
                };

            match categorize_status(status) {
                ErrorCategory::RateLimited => {
                    let delay = backoff
                        .next_backoff()
                        .map(|d| retry_after.map_or(d, Duration::from_secs));
                    if let Some(delay) = delay {
                        tracing::warn!(
                            path = %mask_sensitive_text(path),
                            delay_ms = delay.as_millis(),
                            "Rate limited, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(RestGatewayError::RateLimited {
                        retry_after_secs: retry_after.unwrap_or(60),
                        code: error_code,
                        message: error_message,
                    });
                }
                ErrorCategory::Retryable => {
                    if let Some(delay) = backoff.next_backoff() {
                        tracing::warn!(
                            status = status.as_u16(),
                            message = %mask_sensitive_text(&error_message),
                            delay_ms = delay.as_millis(),
                            "Retryable error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(RestGatewayError::Api {
                        status: status.as_u16(),
                        code: error_code,
                        message: error_message,
                    });
                }
                ErrorCategory::NonRetryable => {
                    return match status {
                        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                            Err(RestGatewayError::AuthenticationFailed {
                                status: status.as_u16(),
                                code: error_code,
                                message: error_message,
                            })
                        }
                        _ => Err(RestGatewayError::Api {
                            status: status.as_u16(),
                            code: error_code,
                            message: error_message,
                        }),
                    };
                }
            }
        }
    }
}

/// Error category for determining retry behavior.
enum ErrorCategory {
    RateLimited,
    Retryable,
    NonRetryable,
}

/// Categorize HTTP status code for retry handling.
const fn categorize_status(status: StatusCode) -> ErrorCategory {
    match status.as_u16() {
        429 => ErrorCategory::RateLimited,
        408 | 500 | 502 | 503 | 504 => ErrorCategory::Retryable,
        _ => ErrorCategory::NonRetryable,
    }
}

/// Exponential backoff calculator.
struct ExponentialBackoff {
    attempt: u32,
    max_attempts: u32,
    current_backoff: Duration,
    max_backoff: Duration,
    multiplier: f64,
}

impl ExponentialBackoff {
    /// With `retry` false the first failure is final.
    const fn new(config: &RetryConfig, retry: bool) -> Self {
        Self {
            attempt: 0,
            max_attempts: if retry { config.max_attempts } else { 1 },
            current_backoff: config.initial_backoff,
            max_backoff: config.max_backoff,
            multiplier: config.multiplier,
        }
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        self.attempt += 1;
        if self.attempt >= self.max_attempts {
            return None;
        }

        let backoff = self.current_backoff;
        self.current_backoff = Duration::from_secs_f64(
            (self.current_backoff.as_secs_f64() * self.multiplier)
                .min(self.max_backoff.as_secs_f64()),
        );

        Some(backoff)
    }
}
