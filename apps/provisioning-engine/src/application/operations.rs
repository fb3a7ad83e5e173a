//! Named operation surface.
//!
//! Every operation takes a flat parameter mapping. The mapping is checked
//! against the operation's shape, converted to a typed request and handed to
//! the matching use case. The response is always one structured JSON value.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::Instrument;

use super::dto::{
    bulk_request, link_feed_request, provisioning_request, run_query_request,
    set_ratio_target_request, update_budget_request,
};
use super::ports::{MutationGatewayPort, QueryPort};
use super::use_cases::{
    BulkStatusUseCase, LinkFeedUseCase, ProvisionCampaignUseCase, RunQueryUseCase,
    SetRatioTargetUseCase, UpdateBudgetUseCase,
};
use crate::domain::guardrails::{GuardrailEngine, mask_params};
use crate::domain::provisioning::{CampaignStatus, ProvisioningOutcome};
use crate::domain::schema::validate;
use crate::domain::shared::OperationId;
use crate::error::{ErrorCode, OperationError};

/// Operations exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Create a budget, campaign, asset group and feed link.
    ProvisionCampaign,
    /// Change a campaign's daily budget.
    UpdateBudget,
    /// Change a campaign's ratio target.
    SetRatioTarget,
    /// Pause one or many campaigns.
    PauseCampaign,
    /// Enable one or many campaigns.
    EnableCampaign,
    /// Attach a product feed to a campaign.
    LinkFeed,
    /// Forward a read-only query.
    RunReadOnlyQuery,
}

impl Operation {
    /// Every operation, in listing order.
    pub const ALL: [Self; 7] = [
        Self::ProvisionCampaign,
        Self::UpdateBudget,
        Self::SetRatioTarget,
        Self::PauseCampaign,
        Self::EnableCampaign,
        Self::LinkFeed,
        Self::RunReadOnlyQuery,
    ];

    /// Public name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ProvisionCampaign => "provision-campaign",
            Self::UpdateBudget => "update-budget",
            Self::SetRatioTarget => "set-ratio-target",
            Self::PauseCampaign => "pause-campaign",
            Self::EnableCampaign => "enable-campaign",
            Self::LinkFeed => "link-feed",
            Self::RunReadOnlyQuery => "run-read-only-query",
        }
    }

    /// Shape the parameters are validated against.
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::ProvisionCampaign => "create_pmax",
            Self::UpdateBudget => "update_budget",
            Self::SetRatioTarget => "set_target_roas",
            Self::PauseCampaign => "pause_campaign",
            Self::EnableCampaign => "enable_campaign",
            Self::LinkFeed => "attach_merchant_center",
            Self::RunReadOnlyQuery => "run_gaql_query",
        }
    }

    /// Whether the operation changes remote state.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        !matches!(self, Self::RunReadOnlyQuery)
    }

    /// Look up by public name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}

/// Structured result of one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationResponse {
    /// Error code, when the operation did not succeed.
    pub code: Option<ErrorCode>,
    /// Response body.
    pub body: Value,
}

impl OperationResponse {
    fn ok<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(body) => Self { code: None, body },
            Err(e) => Self::error(&OperationError::internal(format!(
                "Failed to serialize result: {e}"
            ))),
        }
    }

    fn error(err: &OperationError) -> Self {
        Self {
            code: Some(err.code()),
            body: serde_json::to_value(err.to_body()).unwrap_or(Value::Null),
        }
    }

    fn from_result<T: Serialize>(result: Result<T, OperationError>) -> Self {
        match result {
            Ok(value) => Self::ok(&value),
            Err(err) => Self::error(&err),
        }
    }

    /// Whether the operation succeeded (dry runs included).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code.is_none()
    }
}

/// Routes named operations to their use cases.
pub struct OperationDispatcher<G, Q>
where
    G: MutationGatewayPort,
    Q: QueryPort,
{
    provision: ProvisionCampaignUseCase<G>,
    update_budget: UpdateBudgetUseCase<G, Q>,
    set_ratio_target: SetRatioTargetUseCase<G, Q>,
    bulk_status: BulkStatusUseCase<G, Q>,
    link_feed: LinkFeedUseCase<G>,
    run_query: RunQueryUseCase<Q>,
    guardrails: GuardrailEngine,
}

impl<G, Q> OperationDispatcher<G, Q>
where
    G: MutationGatewayPort,
    Q: QueryPort,
{
    /// Wire every use case to the same gateway, query port and guardrails.
    pub fn new(gateway: Arc<G>, query: Arc<Q>, guardrails: GuardrailEngine) -> Self {
        Self {
            provision: ProvisionCampaignUseCase::new(Arc::clone(&gateway), guardrails.clone()),
            update_budget: UpdateBudgetUseCase::new(
                Arc::clone(&gateway),
                Arc::clone(&query),
                guardrails.clone(),
            ),
            set_ratio_target: SetRatioTargetUseCase::new(
                Arc::clone(&gateway),
                Arc::clone(&query),
                guardrails.clone(),
            ),
            bulk_status: BulkStatusUseCase::new(
                Arc::clone(&gateway),
                Arc::clone(&query),
                guardrails.clone(),
            ),
            link_feed: LinkFeedUseCase::new(gateway, guardrails.clone()),
            run_query: RunQueryUseCase::new(query),
            guardrails,
        }
    }

    /// Guardrails shared by every operation.
    #[must_use]
    pub const fn guardrails(&self) -> &GuardrailEngine {
        &self.guardrails
    }

    /// Run the named operation.
    pub async fn dispatch(&self, name: &str, params: &Map<String, Value>) -> OperationResponse {
        let Some(operation) = Operation::from_name(name) else {
            tracing::warn!(operation = name, "Unknown operation requested");
            return OperationResponse::error(&OperationError::unknown_operation(name));
        };

        let masked = Value::Object(mask_params(params));
        tracing::debug!(operation = name, params = %masked, "Operation requested");

        if let Err(e) = validate(operation.shape(), params) {
            tracing::info!(operation = name, error = %e, "Parameters rejected");
            return OperationResponse::error(&e.into());
        }

        let operation_id = OperationId::generate();
        let span = tracing::info_span!("operation", operation = name, id = %operation_id);
        let response = self.run(operation, params).instrument(span).await;
        if let Some(code) = response.code {
            tracing::info!(operation = name, code = %code, "Operation did not succeed");
        }
        response
    }

    async fn run(&self, operation: Operation, params: &Map<String, Value>) -> OperationResponse {
        match operation {
            Operation::ProvisionCampaign => {
                let result: Result<_, OperationError> = match provisioning_request(params) {
                    Ok(request) => self.provision.execute(&request).await.map_err(Into::into),
                    Err(e) => Err(e.into()),
                };
                match result {
                    Ok(outcome) => provisioning_response(&outcome),
                    Err(err) => OperationResponse::error(&err),
                }
            }
            Operation::UpdateBudget => OperationResponse::from_result(
                match update_budget_request(params) {
                    Ok(request) => self.update_budget.execute(&request).await.map_err(Into::into),
                    Err(e) => Err(e.into()),
                },
            ),
            Operation::SetRatioTarget => OperationResponse::from_result(
                match set_ratio_target_request(params) {
                    Ok(request) => self.set_ratio_target.execute(&request).await.map_err(Into::into),
                    Err(e) => Err(e.into()),
                },
            ),
            Operation::PauseCampaign | Operation::EnableCampaign => {
                let status = if operation == Operation::PauseCampaign {
                    CampaignStatus::Paused
                } else {
                    CampaignStatus::Enabled
                };
                OperationResponse::from_result(match bulk_request(params, status) {
                    Ok(request) => self.bulk_status.execute(&request).await.map_err(Into::into),
                    Err(e) => Err(e.into()),
                })
            }
            Operation::LinkFeed => OperationResponse::from_result(match link_feed_request(params) {
                Ok(request) => self.link_feed.execute(&request).await.map_err(Into::into),
                Err(e) => Err(e.into()),
            }),
            Operation::RunReadOnlyQuery => {
                OperationResponse::from_result(match run_query_request(params) {
                    Ok(request) => self.run_query.execute(&request).await.map_err(Into::into),
                    Err(e) => Err(e.into()),
                })
            }
        }
    }
}

/// A failed bundle is still a structured report; only the code changes.
fn provisioning_response(outcome: &ProvisioningOutcome) -> OperationResponse {
    let mut response = OperationResponse::ok(outcome);
    if let ProvisioningOutcome::Finished(report) = outcome
        && !report.success
        && response.code.is_none()
    {
        response.code = Some(if report.resources.is_empty() {
            ErrorCode::GatewayError
        } else {
            ErrorCode::PartialProvisioning
        });
    }
    response
}
