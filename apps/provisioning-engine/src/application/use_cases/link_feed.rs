//! Link Feed Use Case

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, json};

use super::UseCaseError;
use crate::application::ports::{FeedLinkSpec, MutationGatewayPort};
use crate::domain::guardrails::{DryRunResult, GuardrailChecks, GuardrailEngine};
use crate::domain::resource_names::{CampaignRef, CustomerId};
use crate::domain::shared::{MerchantCenterId, ResourceName};
use crate::observability::record_operation;

/// Operation name used for logs and metrics.
pub const LINK_FEED_OPERATION: &str = "link-feed";

/// Request to attach a product feed to an existing campaign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFeedRequest {
    /// Owning account.
    pub customer_id: CustomerId,
    /// Campaign to link.
    pub campaign: CampaignRef,
    /// Merchant account providing the feed.
    pub merchant_center_id: MerchantCenterId,
    /// Optional product filter label.
    pub feed_label: Option<String>,
}

/// Committed feed link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedLinkResult {
    /// Always true.
    pub success: bool,
    /// Linked campaign.
    pub campaign_resource_name: ResourceName,
    /// Linked merchant account.
    pub merchant_center_id: MerchantCenterId,
    /// Product filter label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_label: Option<String>,
}

/// Result of one link-feed invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LinkFeedOutcome {
    /// Simulated.
    DryRun(DryRunResult),
    /// Committed.
    Linked(FeedLinkResult),
}

/// Use case for linking a product feed to a campaign.
pub struct LinkFeedUseCase<G>
where
    G: MutationGatewayPort,
{
    gateway: Arc<G>,
    guardrails: GuardrailEngine,
}

impl<G> LinkFeedUseCase<G>
where
    G: MutationGatewayPort,
{
    /// Create a new `LinkFeedUseCase`.
    pub const fn new(gateway: Arc<G>, guardrails: GuardrailEngine) -> Self {
        Self {
            gateway,
            guardrails,
        }
    }

    /// Attach the feed.
    pub async fn execute(&self, request: &LinkFeedRequest) -> Result<LinkFeedOutcome, UseCaseError> {
        let (_, campaign) = request.campaign.resolve(&request.customer_id)?;

        if self.guardrails.is_dry_run() {
            let mut params = Map::new();
            params.insert("customer_id".into(), json!(request.customer_id.as_str()));
            params.insert("campaign_resource_name".into(), json!(campaign.as_str()));
            params.insert(
                "merchant_center_id".into(),
                json!(request.merchant_center_id.as_str()),
            );
            if let Some(label) = &request.feed_label {
                params.insert("feed_label".into(), json!(label));
            }
            let result = self.guardrails.build_dry_run_result(
                LINK_FEED_OPERATION,
                &params,
                &GuardrailChecks::new(),
            );
            record_operation(LINK_FEED_OPERATION, "dry_run");
            return Ok(LinkFeedOutcome::DryRun(result));
        }

        let spec = FeedLinkSpec {
            customer_id: request.customer_id.clone(),
            campaign: campaign.clone(),
            merchant_center_id: request.merchant_center_id.clone(),
            feed_label: request.feed_label.clone(),
        };
        let ack = match self.gateway.link_feed(spec).await {
            Ok(ack) => ack,
            Err(e) => {
                tracing::error!(
                    operation = LINK_FEED_OPERATION,
                    campaign = %campaign,
                    error = %e,
                    "Feed link failed"
                );
                record_operation(LINK_FEED_OPERATION, "failed");
                return Err(e.into());
            }
        };

        tracing::info!(
            operation = LINK_FEED_OPERATION,
            campaign = %ack.resource_name,
            "Feed linked"
        );
        record_operation(LINK_FEED_OPERATION, "success");

        Ok(LinkFeedOutcome::Linked(FeedLinkResult {
            success: true,
            campaign_resource_name: ack.resource_name,
            merchant_center_id: request.merchant_center_id.clone(),
            feed_label: request.feed_label.clone(),
        }))
    }
}
