//! Provision Campaign Use Case
//!
//! Sequences the dependent creation calls for one bundle:
//! budget → campaign → optional asset group → optional feed link.
//!
//! The run is not transactional. A failing step ends the run and the
//! report carries every resource created so far plus the failing step, so
//! the caller can clean up or resume forward.

use std::sync::Arc;

use serde_json::{Map, Value, json};

use crate::application::ports::{
    AssetGroupSpec, BudgetSpec, CampaignSpec, FeedLinkSpec, GatewayError, MutationGatewayPort,
};
use crate::domain::guardrails::{GuardrailChecks, GuardrailEngine};
use crate::domain::provisioning::{
    CampaignStatus, ProvisionedResourceSet, ProvisioningError, ProvisioningOutcome,
    ProvisioningReport, ProvisioningRequest, ProvisioningStep, StepFailure,
};
use crate::domain::shared::{Micros, ResourceName};
use crate::observability::{record_guardrail_rejection, record_operation};

/// Operation name used for guardrails, logs and metrics.
pub const PROVISION_OPERATION: &str = "provision-campaign";

const ENABLE_LATER_NOTE: &str =
    "Campaign was created PAUSED. Review it, then use enable-campaign to start serving";
const TARGETING_NOTE: &str =
    "Country and language targeting is not applied at creation; configure it on the campaign";

/// Use case for provisioning a campaign bundle.
pub struct ProvisionCampaignUseCase<G>
where
    G: MutationGatewayPort,
{
    gateway: Arc<G>,
    guardrails: GuardrailEngine,
}

impl<G> ProvisionCampaignUseCase<G>
where
    G: MutationGatewayPort,
{
    /// Create a new `ProvisionCampaignUseCase`.
    pub const fn new(gateway: Arc<G>, guardrails: GuardrailEngine) -> Self {
        Self {
            gateway,
            guardrails,
        }
    }

    /// Provision one bundle.
    ///
    /// Returns `Err` only when nothing was sent to the gateway: an ambiguous
    /// budget, an inconsistent resume request, or a guardrail rejection.
    /// Gateway failures are reported through [`ProvisioningReport`].
    pub async fn execute(
        &self,
        request: &ProvisioningRequest,
    ) -> Result<ProvisioningOutcome, ProvisioningError> {
        // 1. Resolve budget to micros
        let amount = request.budget.resolve()?;
        if request.resume.campaign.is_some() && request.resume.budget.is_none() {
            return Err(ProvisioningError::ResumeWithoutBudget);
        }

        let mut checks = GuardrailChecks::new().budget(amount);
        if let Some(ratio) = request.ratio_target {
            checks = checks.ratio_target(ratio);
        }

        // 2. Dry run short-circuits before any gateway call
        if self.guardrails.is_dry_run() {
            let params = request_params(request, amount);
            let result = self
                .guardrails
                .build_dry_run_result(PROVISION_OPERATION, &params, &checks)
                .with_planned_steps(request.planned_steps().iter().map(|s| s.as_str()));
            record_operation(PROVISION_OPERATION, "dry_run");
            return Ok(ProvisioningOutcome::DryRun(result));
        }

        // 3. Guardrails
        if let Err(violation) = self.guardrails.enforce(PROVISION_OPERATION, &checks) {
            record_guardrail_rejection(violation.kind.as_str());
            record_operation(PROVISION_OPERATION, "rejected");
            return Err(violation.into());
        }

        tracing::info!(
            operation = PROVISION_OPERATION,
            customer_id = %request.customer_id.masked(),
            campaign_name = %request.campaign_name,
            budget_micros = amount.value(),
            steps = request.planned_steps().len(),
            "Provisioning campaign bundle"
        );

        let mut resources = ProvisionedResourceSet::new();
        let mut notes = Vec::new();
        if request.requested_status == CampaignStatus::Enabled {
            notes.push(ENABLE_LATER_NOTE.to_string());
        }
        if !request.country_codes.is_empty() || !request.language_codes.is_empty() {
            notes.push(TARGETING_NOTE.to_string());
        }

        // 4. Budget
        let budget = if let Some(name) = request.resumed(ProvisioningStep::Budget) {
            resumed(&mut resources, ProvisioningStep::Budget, name)
        } else {
            let spec = BudgetSpec {
                customer_id: request.customer_id.clone(),
                name: request.budget_name(),
                amount,
            };
            match self.gateway.create_budget(spec).await {
                Ok(name) => created(&mut resources, ProvisioningStep::Budget, name),
                Err(e) => {
                    return Ok(failed(ProvisioningStep::Budget, &e, resources, request, notes));
                }
            }
        };

        // 5. Campaign, always paused
        let campaign = if let Some(name) = request.resumed(ProvisioningStep::Campaign) {
            resumed(&mut resources, ProvisioningStep::Campaign, name)
        } else {
            let spec = CampaignSpec {
                customer_id: request.customer_id.clone(),
                name: request.campaign_name.clone(),
                budget,
                status: CampaignStatus::Paused,
                ratio_target: request.ratio_target,
                start_date: request.dates.start(),
                end_date: request.dates.end(),
            };
            match self.gateway.create_campaign(spec).await {
                Ok(name) => created(&mut resources, ProvisioningStep::Campaign, name),
                Err(e) => {
                    return Ok(failed(ProvisioningStep::Campaign, &e, resources, request, notes));
                }
            }
        };

        // 6. Asset group
        if let Some(url) = &request.final_url {
            let spec = AssetGroupSpec {
                customer_id: request.customer_id.clone(),
                campaign: campaign.clone(),
                name: request.effective_asset_group_name(),
                final_urls: vec![url.clone()],
            };
            match self.gateway.create_asset_group(spec).await {
                Ok(name) => {
                    created(&mut resources, ProvisioningStep::AssetGroup, name);
                }
                Err(e) => {
                    return Ok(failed(ProvisioningStep::AssetGroup, &e, resources, request, notes));
                }
            }
        }

        // 7. Feed link
        if let Some(feed) = &request.feed {
            let spec = FeedLinkSpec {
                customer_id: request.customer_id.clone(),
                campaign,
                merchant_center_id: feed.merchant_center_id.clone(),
                feed_label: feed.feed_label.clone(),
            };
            match self.gateway.link_feed(spec).await {
                Ok(ack) => {
                    created(&mut resources, ProvisioningStep::FeedLink, ack.resource_name);
                }
                Err(e) => {
                    return Ok(failed(ProvisioningStep::FeedLink, &e, resources, request, notes));
                }
            }
        }

        tracing::info!(
            operation = PROVISION_OPERATION,
            campaign_name = %request.campaign_name,
            resources = resources.len(),
            "Campaign bundle provisioned"
        );
        record_operation(PROVISION_OPERATION, "success");

        Ok(ProvisioningOutcome::Finished(ProvisioningReport::done(
            resources,
            request.campaign_name.clone(),
            CampaignStatus::Paused,
            notes,
        )))
    }
}

fn created(
    resources: &mut ProvisionedResourceSet,
    step: ProvisioningStep,
    name: ResourceName,
) -> ResourceName {
    tracing::info!(step = step.as_str(), resource_name = %name, "Step completed");
    resources.record(step, name.clone(), false);
    name
}

fn resumed(
    resources: &mut ProvisionedResourceSet,
    step: ProvisioningStep,
    name: &ResourceName,
) -> ResourceName {
    tracing::info!(step = step.as_str(), resource_name = %name, "Step resumed from existing resource");
    resources.record(step, name.clone(), true);
    name.clone()
}

fn failed(
    step: ProvisioningStep,
    error: &GatewayError,
    resources: ProvisionedResourceSet,
    request: &ProvisioningRequest,
    notes: Vec<String>,
) -> ProvisioningOutcome {
    tracing::error!(
        operation = PROVISION_OPERATION,
        step = step.as_str(),
        created = resources.len(),
        error = %error,
        "Provisioning step failed"
    );
    let outcome = if resources.is_empty() { "failed" } else { "partial" };
    record_operation(PROVISION_OPERATION, outcome);

    ProvisioningOutcome::Finished(ProvisioningReport::failed(
        step,
        step_failure(error),
        resources,
        request.campaign_name.clone(),
        CampaignStatus::Paused,
        notes,
    ))
}

/// Remote status, code and message are kept verbatim.
pub(crate) fn step_failure(error: &GatewayError) -> StepFailure {
    let message = match error {
        GatewayError::Remote { message, .. }
        | GatewayError::Authentication { message, .. }
        | GatewayError::RateLimited { message, .. } => message.clone(),
        other => other.to_string(),
    };
    StepFailure {
        status: error.status(),
        code: error.code().map(str::to_string),
        message,
    }
}

fn request_params(request: &ProvisioningRequest, amount: Micros) -> Map<String, Value> {
    let mut params = Map::new();
    params.insert("customer_id".into(), json!(request.customer_id.as_str()));
    params.insert("campaign_name".into(), json!(request.campaign_name));
    params.insert("budget_name".into(), json!(request.budget_name()));
    params.insert("daily_budget_micros".into(), json!(amount.value()));
    params.insert(
        "daily_budget_currency".into(),
        json!(amount.to_currency().to_string()),
    );
    params.insert("status".into(), json!(CampaignStatus::Paused.as_str()));
    if let Some(ratio) = request.ratio_target {
        params.insert("target_roas".into(), json!(ratio));
    }
    if let Some(start) = request.dates.start() {
        params.insert("start_date".into(), json!(start.to_string()));
    }
    if let Some(end) = request.dates.end() {
        params.insert("end_date".into(), json!(end.to_string()));
    }
    if let Some(url) = &request.final_url {
        params.insert("final_url".into(), json!(url));
        params.insert(
            "asset_group_name".into(),
            json!(request.effective_asset_group_name()),
        );
    }
    if let Some(feed) = &request.feed {
        params.insert(
            "merchant_center_id".into(),
            json!(feed.merchant_center_id.as_str()),
        );
        if let Some(label) = &feed.feed_label {
            params.insert("feed_label".into(), json!(label));
        }
    }
    if !request.country_codes.is_empty() {
        params.insert("country_codes".into(), json!(request.country_codes));
    }
    if !request.language_codes.is_empty() {
        params.insert("language_codes".into(), json!(request.language_codes));
    }
    if let Some(name) = &request.resume.budget {
        params.insert("resume_budget_resource_name".into(), json!(name.as_str()));
    }
    if let Some(name) = &request.resume.campaign {
        params.insert("resume_campaign_resource_name".into(), json!(name.as_str()));
    }
    params
}
