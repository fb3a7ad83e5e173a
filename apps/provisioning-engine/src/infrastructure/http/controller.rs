//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API that delegates to the operation dispatcher.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::application::ports::{MutationGatewayPort, QueryPort};
use crate::application::{Operation, OperationDispatcher};

use super::request::parse_params;
use super::response::{GuardrailsResponse, HealthResponse, OperationInfo, OperationsResponse};

/// Application state shared across handlers.
pub struct AppState<G, Q>
where
    G: MutationGatewayPort,
    Q: QueryPort,
{
    /// Operation dispatcher.
    pub dispatcher: Arc<OperationDispatcher<G, Q>>,
    /// Application version.
    pub version: String,
}

impl<G, Q> Clone for AppState<G, Q>
where
    G: MutationGatewayPort,
    Q: QueryPort,
{
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<G, Q>(state: AppState<G, Q>) -> Router
where
    G: MutationGatewayPort + 'static,
    Q: QueryPort + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/guardrails", get(guardrails))
        .route("/api/v1/operations", get(list_operations))
        .route("/api/v1/operations/{name}", post(run_operation))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check<G, Q>(State(state): State<AppState<G, Q>>) -> impl IntoResponse
where
    G: MutationGatewayPort,
    Q: QueryPort,
{
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

/// Active guardrail limits.
async fn guardrails<G, Q>(State(state): State<AppState<G, Q>>) -> impl IntoResponse
where
    G: MutationGatewayPort,
    Q: QueryPort,
{
    Json(GuardrailsResponse::from(state.dispatcher.guardrails().config()))
}

/// Operation listing.
async fn list_operations() -> impl IntoResponse {
    Json(OperationsResponse {
        operations: Operation::ALL.into_iter().map(OperationInfo::from).collect(),
    })
}

/// Run one named operation.
async fn run_operation<G, Q>(
    State(state): State<AppState<G, Q>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Response
where
    G: MutationGatewayPort,
    Q: QueryPort,
{
    let params = match parse_params(&body) {
        Ok(params) => params,
        Err(err) => {
            tracing::info!(operation = %name, error = %err, "Malformed request body");
            return (err.code().http_status(), Json(err.to_body())).into_response();
        }
    };

    let response = state.dispatcher.dispatch(&name, &params).await;
    let status = response
        .code
        .map_or(StatusCode::OK, |code| code.http_status());
    (status, Json(response.body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::domain::guardrails::{GuardrailConfig, GuardrailEngine};
    use crate::infrastructure::gateway::InMemoryGateway;

    fn router(config: GuardrailConfig) -> Router {
        let gateway = Arc::new(InMemoryGateway::new().with_campaign("42", "Summer", 10_000_000));
        let dispatcher = OperationDispatcher::new(
            Arc::clone(&gateway),
            gateway,
            GuardrailEngine::new(Arc::new(config)),
        );
        create_router(AppState {
            dispatcher: Arc::new(dispatcher),
            version: "1.0.0-test".to_string(),
        })
    }

    async fn call(app: Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_check_returns_ok() {
        let (status, body) = call(router(GuardrailConfig::default()), "GET", "/health", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn guardrails_report_currency_ceiling() {
        let (status, body) = call(
            router(GuardrailConfig::default()),
            "GET",
            "/api/v1/guardrails",
            "",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["max_budget_micros"], json!(100_000_000_000_i64));
        assert_eq!(body["max_budget_currency"], "100000");
        assert_eq!(body["max_bulk_count"], 50);
    }

    #[tokio::test]
    async fn lists_every_operation() {
        let (_, body) = call(
            router(GuardrailConfig::default()),
            "GET",
            "/api/v1/operations",
            "",
        )
        .await;
        let names: Vec<&str> = body["operations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["name"].as_str().unwrap())
            .collect();
        assert_eq!(names.len(), Operation::ALL.len());
        assert!(names.contains(&"provision-campaign"));
        assert!(names.contains(&"run-read-only-query"));
    }

    #[tokio::test]
    async fn unknown_operation_is_404() {
        let (status, body) = call(
            router(GuardrailConfig::default()),
            "POST",
            "/api/v1/operations/delete-everything",
            "{}",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "UNKNOWN_OPERATION");
    }

    #[tokio::test]
    async fn non_object_body_is_validation_error() {
        let (status, body) = call(
            router(GuardrailConfig::default()),
            "POST",
            "/api/v1/operations/pause-campaign",
            "[]",
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn pause_single_campaign() {
        let (status, body) = call(
            router(GuardrailConfig::default()),
            "POST",
            "/api/v1/operations/pause-campaign",
            r#"{"account_id": "1234567890", "campaign_id": "42"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["updated_count"], 1);
    }

    #[tokio::test]
    async fn budget_over_ceiling_is_412() {
        let (status, body) = call(
            router(GuardrailConfig::default()),
            "POST",
            "/api/v1/operations/update-budget",
            r#"{"account_id": "1234567890", "campaign_id": "42", "new_daily_budget_micros": 200000000000}"#,
        )
        .await;
        assert_eq!(status, StatusCode::PRECONDITION_FAILED);
        assert_eq!(body["error"], "BUDGET_EXCEEDED");
        assert_eq!(body["success"], false);
    }
}
