//! Bulk Status Use Case
//!
//! Pause or enable one or many campaigns. Targets are resolved first so the
//! bulk ceiling and the confirmation gate always see the concrete count.
//! Each target is then changed independently; one failure does not stop
//! the rest.

use std::sync::Arc;

use serde_json::{Map, Value, json};

use super::UseCaseError;
use crate::application::ports::{MutationGatewayPort, QueryPort};
use crate::domain::bulk::{
    BulkOperationRequest, BulkStatusOutcome, BulkStatusReport, BulkTarget, ResolvedTarget,
    TargetResult, enable_safety_issues, pattern_to_like,
};
use crate::domain::guardrails::{GuardrailChecks, GuardrailEngine};
use crate::domain::provisioning::CampaignStatus;
use crate::domain::resource_names::{campaign_resource_name, extract_trailing_id};
use crate::domain::shared::CampaignId;
use crate::observability::{record_guardrail_rejection, record_operation};

const SAFETY_CHECK_FAILED: &str = "Safety check failed";

/// Use case for pausing and enabling campaigns.
pub struct BulkStatusUseCase<G, Q>
where
    G: MutationGatewayPort,
    Q: QueryPort,
{
    gateway: Arc<G>,
    query: Arc<Q>,
    guardrails: GuardrailEngine,
}

impl<G, Q> BulkStatusUseCase<G, Q>
where
    G: MutationGatewayPort,
    Q: QueryPort,
{
    /// Create a new `BulkStatusUseCase`.
    pub const fn new(gateway: Arc<G>, query: Arc<Q>, guardrails: GuardrailEngine) -> Self {
        Self {
            gateway,
            query,
            guardrails,
        }
    }

    /// Resolve targets, apply both bulk gates, then change each target.
    pub async fn execute(
        &self,
        request: &BulkOperationRequest,
    ) -> Result<BulkStatusOutcome, UseCaseError> {
        let operation = request.operation();

        // 1. Resolve
        let targets = self.resolve(request).await?;
        if targets.is_empty() {
            tracing::info!(operation, "No campaigns matched; nothing to change");
            record_operation(operation, "no_match");
            let pattern = match &request.target {
                BulkTarget::Pattern(p) => p.as_str(),
                _ => "",
            };
            return Ok(BulkStatusOutcome::no_match(pattern));
        }

        let checks =
            GuardrailChecks::new().bulk(targets.len(), request.target.is_pattern(), request.confirm);

        // 2. Dry run
        if self.guardrails.is_dry_run() {
            let params = request_params(request, &targets);
            let result = self
                .guardrails
                .build_dry_run_result(operation, &params, &checks)
                .with_planned_steps(
                    targets
                        .iter()
                        .map(|t| format!("set {} to {}", t.campaign_id, request.status)),
                );
            record_operation(operation, "dry_run");
            return Ok(BulkStatusOutcome::DryRun(result));
        }

        // 3. Bulk ceiling, then confirmation
        if let Err(violation) = self.guardrails.enforce(operation, &checks) {
            record_guardrail_rejection(violation.kind.as_str());
            record_operation(operation, "rejected");
            return Err(violation.into());
        }

        tracing::info!(
            operation,
            customer_id = %request.customer_id.masked(),
            targets = targets.len(),
            status = %request.status,
            "Changing campaign status"
        );

        // 4. Per-target changes
        let mut results = Vec::with_capacity(targets.len());
        for target in targets {
            results.push(self.apply(request, target).await);
        }

        let report = BulkStatusReport::from_results(operation, request.status, results);
        tracing::info!(
            operation,
            updated = report.updated_count,
            failed = report.failed_count,
            "Campaign status change finished"
        );
        record_operation(operation, if report.success { "success" } else { "partial" });

        Ok(BulkStatusOutcome::Finished(report))
    }

    async fn resolve(
        &self,
        request: &BulkOperationRequest,
    ) -> Result<Vec<ResolvedTarget>, UseCaseError> {
        let cid = &request.customer_id;
        let by_id = |id: CampaignId| ResolvedTarget {
            resource_name: campaign_resource_name(cid, id.as_str()),
            campaign_id: id,
            name: None,
        };

        Ok(match &request.target {
            BulkTarget::Single(id) => vec![by_id(id.clone())],
            BulkTarget::List(ids) => ids.iter().cloned().map(by_id).collect(),
            BulkTarget::ResourceName(name) => {
                let id = extract_trailing_id(name.as_str())?;
                vec![ResolvedTarget {
                    campaign_id: CampaignId::new(id),
                    resource_name: name.clone(),
                    name: None,
                }]
            }
            BulkTarget::Pattern(pattern) => self
                .query
                .find_campaigns_by_pattern(cid, &pattern_to_like(pattern))
                .await?
                .into_iter()
                .map(|summary| ResolvedTarget {
                    resource_name: campaign_resource_name(cid, summary.campaign_id.as_str()),
                    campaign_id: summary.campaign_id,
                    name: Some(summary.name),
                })
                .collect(),
        })
    }

    async fn apply(&self, request: &BulkOperationRequest, target: ResolvedTarget) -> TargetResult {
        if request.status == CampaignStatus::Enabled && request.safety_check {
            let issues = match self
                .query
                .campaign_budget(&request.customer_id, &target.campaign_id)
                .await
            {
                Ok(info) => enable_safety_issues(info.map(|i| i.amount)),
                Err(e) => vec![format!("Could not read campaign budget: {e}")],
            };
            if !issues.is_empty() {
                tracing::warn!(
                    campaign_id = %target.campaign_id,
                    issues = ?issues,
                    "Safety check failed; campaign not enabled"
                );
                return TargetResult::failed(
                    target.campaign_id,
                    target.resource_name,
                    SAFETY_CHECK_FAILED,
                    issues,
                );
            }
        }

        match self
            .gateway
            .change_status(&request.customer_id, &target.resource_name, request.status)
            .await
        {
            Ok(_) => TargetResult::updated(target.campaign_id, target.resource_name, request.status),
            Err(e) => {
                tracing::error!(
                    campaign_id = %target.campaign_id,
                    error = %e,
                    "Campaign status change failed"
                );
                TargetResult::failed(target.campaign_id, target.resource_name, e.to_string(), Vec::new())
            }
        }
    }
}

fn request_params(request: &BulkOperationRequest, targets: &[ResolvedTarget]) -> Map<String, Value> {
    let mut params = Map::new();
    params.insert("customer_id".into(), json!(request.customer_id.as_str()));
    params.insert("status".into(), json!(request.status.as_str()));
    params.insert("confirm".into(), json!(request.confirm));
    if request.status == CampaignStatus::Enabled {
        params.insert("safety_check".into(), json!(request.safety_check));
    }
    if let BulkTarget::Pattern(pattern) = &request.target {
        params.insert("campaign_name_pattern".into(), json!(pattern));
    }
    params.insert("affected_count".into(), json!(targets.len()));
    params.insert(
        "campaign_resource_names".into(),
        json!(
            targets
                .iter()
                .map(|t| t.resource_name.as_str())
                .collect::<Vec<_>>()
        ),
    );
    params
}
