//! Update Budget Use Case

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, json};

use super::UseCaseError;
use crate::application::ports::{BudgetUpdateSpec, MutationGatewayPort, QueryPort};
use crate::domain::guardrails::{DryRunResult, GuardrailChecks, GuardrailEngine};
use crate::domain::provisioning::{AdjustmentType, BudgetAdjustment};
use crate::domain::resource_names::{CampaignRef, CustomerId};
use crate::domain::shared::{Micros, ResourceName};
use crate::observability::{record_guardrail_rejection, record_operation};

/// Operation name used for guardrails, logs and metrics.
pub const UPDATE_BUDGET_OPERATION: &str = "update-budget";

/// Request to change a campaign's daily budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBudgetRequest {
    /// Owning account.
    pub customer_id: CustomerId,
    /// Campaign whose budget changes.
    pub campaign: CampaignRef,
    /// How the new amount is derived.
    pub adjustment: BudgetAdjustment,
}

/// Committed budget change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetUpdateResult {
    /// Always true.
    pub success: bool,
    /// Budget that changed.
    pub budget_resource_name: ResourceName,
    /// Campaign the budget belongs to.
    pub campaign_resource_name: ResourceName,
    /// Campaign name.
    pub campaign_name: String,
    /// Amount before the change.
    pub previous_amount_micros: i64,
    /// Amount after the change.
    pub new_amount_micros: i64,
    /// Amount before the change, in currency.
    pub previous_amount_currency: Decimal,
    /// Amount after the change, in currency.
    pub new_amount_currency: Decimal,
    /// Adjustment that was applied.
    pub adjustment_type: AdjustmentType,
    /// Signed change in micros.
    pub change_micros: i64,
    /// Signed change in currency.
    pub change_currency: Decimal,
    /// Signed change relative to the previous amount, two decimals.
    pub change_percent: Decimal,
}

/// Result of one update-budget invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UpdateBudgetOutcome {
    /// Simulated.
    DryRun(DryRunResult),
    /// Committed.
    Updated(BudgetUpdateResult),
}

/// Use case for adjusting a campaign budget.
pub struct UpdateBudgetUseCase<G, Q>
where
    G: MutationGatewayPort,
    Q: QueryPort,
{
    gateway: Arc<G>,
    query: Arc<Q>,
    guardrails: GuardrailEngine,
}

impl<G, Q> UpdateBudgetUseCase<G, Q>
where
    G: MutationGatewayPort,
    Q: QueryPort,
{
    /// Create a new `UpdateBudgetUseCase`.
    pub const fn new(gateway: Arc<G>, query: Arc<Q>, guardrails: GuardrailEngine) -> Self {
        Self {
            gateway,
            query,
            guardrails,
        }
    }

    /// Read the current budget, compute the new amount and apply it.
    pub async fn execute(
        &self,
        request: &UpdateBudgetRequest,
    ) -> Result<UpdateBudgetOutcome, UseCaseError> {
        let (campaign_id, campaign_resource) = request.campaign.resolve(&request.customer_id)?;

        // 1. Current budget
        let current = self
            .query
            .campaign_budget(&request.customer_id, &campaign_id)
            .await?
            .ok_or_else(|| UseCaseError::CampaignNotFound(campaign_id.to_string()))?;

        // 2. New amount
        let adjusted = request.adjustment.apply(current.amount);

        // 3. Dry run; an invalid adjustment becomes a warning
        if self.guardrails.is_dry_run() {
            let mut params = Map::new();
            params.insert("customer_id".into(), json!(request.customer_id.as_str()));
            params.insert("campaign_resource_name".into(), json!(campaign_resource.as_str()));
            params.insert("budget_resource_name".into(), json!(current.budget.as_str()));
            params.insert(
                "adjustment_type".into(),
                json!(request.adjustment.kind().as_str()),
            );
            params.insert("previous_amount_micros".into(), json!(current.amount.value()));
            let mut checks = GuardrailChecks::new();
            if let Ok(amount) = &adjusted {
                params.insert("new_amount_micros".into(), json!(amount.value()));
                checks = checks.budget(*amount);
            }
            let mut result =
                self.guardrails
                    .build_dry_run_result(UPDATE_BUDGET_OPERATION, &params, &checks);
            if let Err(e) = adjusted {
                result = result.with_warning(e.to_string());
            }
            record_operation(UPDATE_BUDGET_OPERATION, "dry_run");
            return Ok(UpdateBudgetOutcome::DryRun(result));
        }

        let new_amount = adjusted?;
        let checks = GuardrailChecks::new().budget(new_amount);

        // 4. Guardrails
        if let Err(violation) = self.guardrails.enforce(UPDATE_BUDGET_OPERATION, &checks) {
            record_guardrail_rejection(violation.kind.as_str());
            record_operation(UPDATE_BUDGET_OPERATION, "rejected");
            return Err(violation.into());
        }

        // 5. Apply
        let spec = BudgetUpdateSpec {
            customer_id: request.customer_id.clone(),
            budget: current.budget.clone(),
            amount: new_amount,
        };
        if let Err(e) = self.gateway.update_budget(spec).await {
            tracing::error!(
                operation = UPDATE_BUDGET_OPERATION,
                budget = %current.budget,
                error = %e,
                "Budget update failed"
            );
            record_operation(UPDATE_BUDGET_OPERATION, "failed");
            return Err(e.into());
        }

        tracing::info!(
            operation = UPDATE_BUDGET_OPERATION,
            budget = %current.budget,
            previous_micros = current.amount.value(),
            new_micros = new_amount.value(),
            "Budget updated"
        );
        record_operation(UPDATE_BUDGET_OPERATION, "success");

        Ok(UpdateBudgetOutcome::Updated(BudgetUpdateResult::new(
            current.budget,
            campaign_resource,
            current.campaign_name,
            current.amount,
            new_amount,
            request.adjustment.kind(),
        )))
    }
}

impl BudgetUpdateResult {
    fn new(
        budget_resource_name: ResourceName,
        campaign_resource_name: ResourceName,
        campaign_name: String,
        previous: Micros,
        new: Micros,
        adjustment_type: AdjustmentType,
    ) -> Self {
        let change = Micros::new(new.value() - previous.value());
        let change_percent = if previous.value() == 0 {
            Decimal::ZERO
        } else {
            (Decimal::from(change.value()) / Decimal::from(previous.value())
                * Decimal::ONE_HUNDRED)
                .round_dp(2)
        };

        Self {
            success: true,
            budget_resource_name,
            campaign_resource_name,
            campaign_name,
            previous_amount_micros: previous.value(),
            new_amount_micros: new.value(),
            previous_amount_currency: previous.to_currency(),
            new_amount_currency: new.to_currency(),
            adjustment_type,
            change_micros: change.value(),
            change_currency: change.to_currency(),
            change_percent,
        }
    }
}
