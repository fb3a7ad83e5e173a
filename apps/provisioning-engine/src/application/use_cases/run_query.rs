//! Run Read-Only Query Use Case

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::UseCaseError;
use crate::application::ports::QueryPort;
use crate::domain::resource_names::CustomerId;
use crate::observability::record_operation;

/// Operation name used for logs and metrics.
pub const RUN_QUERY_OPERATION: &str = "run-read-only-query";

/// Largest page the remote API returns.
pub const MAX_PAGE_SIZE: u32 = 10_000;

/// Page size when the caller does not choose one.
pub const DEFAULT_PAGE_SIZE: u32 = 1_000;

/// A read-only query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunQueryRequest {
    /// Account to query.
    pub customer_id: CustomerId,
    /// Query text, forwarded unchanged.
    pub query: String,
    /// Requested page size.
    pub page_size: Option<u32>,
}

/// Rows returned by a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    /// Always true.
    pub success: bool,
    /// Number of rows returned.
    pub row_count: usize,
    /// Result rows as returned by the remote API.
    pub rows: Vec<Value>,
    /// Token for the next page, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Use case for forwarding read-only queries. Never subject to dry-run.
pub struct RunQueryUseCase<Q>
where
    Q: QueryPort,
{
    query: Arc<Q>,
}

impl<Q> RunQueryUseCase<Q>
where
    Q: QueryPort,
{
    /// Create a new `RunQueryUseCase`.
    pub const fn new(query: Arc<Q>) -> Self {
        Self { query }
    }

    /// Run the query.
    pub async fn execute(&self, request: &RunQueryRequest) -> Result<QueryResult, UseCaseError> {
        let page_size = request
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let rows = match self
            .query
            .search(&request.customer_id, &request.query, page_size)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(operation = RUN_QUERY_OPERATION, error = %e, "Query failed");
                record_operation(RUN_QUERY_OPERATION, "failed");
                return Err(e.into());
            }
        };

        tracing::debug!(
            operation = RUN_QUERY_OPERATION,
            rows = rows.rows.len(),
            page_size,
            "Query completed"
        );
        record_operation(RUN_QUERY_OPERATION, "success");

        Ok(QueryResult {
            success: true,
            row_count: rows.rows.len(),
            rows: rows.rows,
            next_page_token: rows.next_page_token,
        })
    }
}
