//! Set Ratio Target Use Case

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, json};

use super::UseCaseError;
use crate::application::ports::{BiddingUpdateSpec, MutationGatewayPort, QueryPort};
use crate::domain::guardrails::{DryRunResult, GuardrailChecks, GuardrailEngine};
use crate::domain::resource_names::{CampaignRef, CustomerId};
use crate::domain::shared::{Micros, ResourceName};
use crate::observability::{record_guardrail_rejection, record_operation};

/// Operation name used for guardrails, logs and metrics.
pub const SET_RATIO_TARGET_OPERATION: &str = "set-ratio-target";

/// Request to change a campaign's ratio target.
#[derive(Debug, Clone, PartialEq)]
pub struct SetRatioTargetRequest {
    /// Owning account.
    pub customer_id: CustomerId,
    /// Campaign to change.
    pub campaign: CampaignRef,
    /// New ratio target.
    pub ratio_target: f64,
    /// Optional CPC ceiling.
    pub cpc_bid_ceiling: Option<Micros>,
    /// Optional CPC floor.
    pub cpc_bid_floor: Option<Micros>,
}

/// Committed ratio target change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioTargetResult {
    /// Always true.
    pub success: bool,
    /// Campaign that changed.
    pub campaign_resource_name: ResourceName,
    /// Campaign name.
    pub campaign_name: String,
    /// Target before the change, if one was set.
    pub previous_target_roas: Option<f64>,
    /// Target after the change.
    pub new_target_roas: f64,
    /// Difference to the previous target, if one was set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    /// CPC ceiling that was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpc_bid_ceiling_micros: Option<i64>,
    /// CPC floor that was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpc_bid_floor_micros: Option<i64>,
}

/// Result of one set-ratio-target invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SetRatioTargetOutcome {
    /// Simulated.
    DryRun(DryRunResult),
    /// Committed.
    Updated(RatioTargetResult),
}

/// Use case for changing a campaign's ratio target.
pub struct SetRatioTargetUseCase<G, Q>
where
    G: MutationGatewayPort,
    Q: QueryPort,
{
    gateway: Arc<G>,
    query: Arc<Q>,
    guardrails: GuardrailEngine,
}

impl<G, Q> SetRatioTargetUseCase<G, Q>
where
    G: MutationGatewayPort,
    Q: QueryPort,
{
    /// Create a new `SetRatioTargetUseCase`.
    pub const fn new(gateway: Arc<G>, query: Arc<Q>, guardrails: GuardrailEngine) -> Self {
        Self {
            gateway,
            query,
            guardrails,
        }
    }

    /// Validate and apply a new ratio target.
    pub async fn execute(
        &self,
        request: &SetRatioTargetRequest,
    ) -> Result<SetRatioTargetOutcome, UseCaseError> {
        let (campaign_id, campaign_resource) = request.campaign.resolve(&request.customer_id)?;
        let checks = GuardrailChecks::new().ratio_target(request.ratio_target);

        if self.guardrails.is_dry_run() {
            let mut params = Map::new();
            params.insert("customer_id".into(), json!(request.customer_id.as_str()));
            params.insert("campaign_resource_name".into(), json!(campaign_resource.as_str()));
            params.insert("target_roas".into(), json!(request.ratio_target));
            if let Some(ceiling) = request.cpc_bid_ceiling {
                params.insert("cpc_bid_ceiling_micros".into(), json!(ceiling.value()));
            }
            if let Some(floor) = request.cpc_bid_floor {
                params.insert("cpc_bid_floor_micros".into(), json!(floor.value()));
            }
            let result =
                self.guardrails
                    .build_dry_run_result(SET_RATIO_TARGET_OPERATION, &params, &checks);
            record_operation(SET_RATIO_TARGET_OPERATION, "dry_run");
            return Ok(SetRatioTargetOutcome::DryRun(result));
        }

        if let Err(violation) = self.guardrails.enforce(SET_RATIO_TARGET_OPERATION, &checks) {
            record_guardrail_rejection(violation.kind.as_str());
            record_operation(SET_RATIO_TARGET_OPERATION, "rejected");
            return Err(violation.into());
        }

        let current = self
            .query
            .campaign_bidding(&request.customer_id, &campaign_id)
            .await?
            .ok_or_else(|| UseCaseError::CampaignNotFound(campaign_id.to_string()))?;

        let spec = BiddingUpdateSpec {
            customer_id: request.customer_id.clone(),
            campaign: campaign_resource.clone(),
            ratio_target: request.ratio_target,
            cpc_bid_ceiling: request.cpc_bid_ceiling,
            cpc_bid_floor: request.cpc_bid_floor,
        };
        if let Err(e) = self.gateway.update_bidding(spec).await {
            tracing::error!(
                operation = SET_RATIO_TARGET_OPERATION,
                campaign = %campaign_resource,
                error = %e,
                "Bidding update failed"
            );
            record_operation(SET_RATIO_TARGET_OPERATION, "failed");
            return Err(e.into());
        }

        tracing::info!(
            operation = SET_RATIO_TARGET_OPERATION,
            campaign = %campaign_resource,
            previous = ?current.ratio_target,
            new = request.ratio_target,
            "Ratio target updated"
        );
        record_operation(SET_RATIO_TARGET_OPERATION, "success");

        Ok(SetRatioTargetOutcome::Updated(RatioTargetResult {
            success: true,
            campaign_resource_name: campaign_resource,
            campaign_name: current.campaign_name,
            previous_target_roas: current.ratio_target,
            new_target_roas: request.ratio_target,
            change: current.ratio_target.map(|prev| request.ratio_target - prev),
            cpc_bid_ceiling_micros: request.cpc_bid_ceiling.map(|m| m.value()),
            cpc_bid_floor_micros: request.cpc_bid_floor.map(|m| m.value()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::guardrails::{GuardrailConfig, ViolationKind};
    use crate::domain::shared::CampaignId;
    use crate::infrastructure::gateway::{GatewayCall, InMemoryGateway};

    fn use_case(
        config: GuardrailConfig,
    ) -> (
        Arc<InMemoryGateway>,
        SetRatioTargetUseCase<InMemoryGateway, InMemoryGateway>,
    ) {
        let gateway = Arc::new(InMemoryGateway::new().with_campaign("42", "Summer", 10_000_000));
        let uc = SetRatioTargetUseCase::new(
            Arc::clone(&gateway),
            Arc::clone(&gateway),
            GuardrailEngine::new(Arc::new(config)),
        );
        (gateway, uc)
    }

    fn request(ratio: f64) -> SetRatioTargetRequest {
        SetRatioTargetRequest {
            customer_id: CustomerId::parse("1234567890").unwrap(),
            campaign: CampaignRef::ResourceName(ResourceName::new(
                "customers/1234567890/campaigns/42",
            )),
            ratio_target: ratio,
            cpc_bid_ceiling: Some(Micros::new(2_000_000)),
            cpc_bid_floor: None,
        }
    }

    #[tokio::test]
    async fn updates_target_and_reports_previous() {
        let (gateway, uc) = use_case(GuardrailConfig::default());

        let first = uc.execute(&request(3.0)).await.unwrap();
        let SetRatioTargetOutcome::Updated(first) = first else {
            panic!("expected update");
        };
        assert_eq!(first.previous_target_roas, None);
        assert_eq!(first.change, None);

        let second = uc.execute(&request(4.5)).await.unwrap();
        let SetRatioTargetOutcome::Updated(second) = second else {
            panic!("expected update");
        };
        assert_eq!(second.previous_target_roas, Some(3.0));
        assert_eq!(second.change, Some(1.5));
        assert_eq!(second.cpc_bid_ceiling_micros, Some(2_000_000));

        let stored = gateway.campaign("42").unwrap();
        assert_eq!(stored.ratio_target, Some(4.5));
        assert_eq!(stored.cpc_bid_ceiling, Some(Micros::new(2_000_000)));
    }

    #[tokio::test]
    async fn out_of_range_rejected_before_any_call() {
        let (gateway, uc) = use_case(GuardrailConfig::default());

        let err = uc.execute(&request(250.0)).await.unwrap_err();

        assert!(matches!(err, UseCaseError::Guardrail(ref v) if v.kind == ViolationKind::RatioOutOfRange));
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_campaign_is_not_found() {
        let (gateway, uc) = use_case(GuardrailConfig::default());
        let mut req = request(2.0);
        req.campaign = CampaignRef::Id(CampaignId::new("999"));

        assert_eq!(
            uc.execute(&req).await.unwrap_err(),
            UseCaseError::CampaignNotFound("999".to_string())
        );
        assert_eq!(gateway.mutation_count(), 0);
    }

    #[tokio::test]
    async fn dry_run_makes_no_calls() {
        let (gateway, uc) = use_case(GuardrailConfig::default().with_dry_run(true));

        let outcome = uc.execute(&request(0.001)).await.unwrap();

        let SetRatioTargetOutcome::DryRun(result) = outcome else {
            panic!("expected dry run");
        };
        assert!(!result.would_execute);
        assert!(gateway.calls().is_empty());
        assert_eq!(gateway.call_count(GatewayCall::UpdateBidding), 0);
    }
}
