//! Query Port (Driven Port)
//!
//! Read-only access to the remote API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::GatewayError;
use crate::domain::resource_names::CustomerId;
use crate::domain::shared::{CampaignId, Micros, ResourceName};

/// A campaign found by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignSummary {
    /// Campaign id.
    pub campaign_id: CampaignId,
    /// Campaign name.
    pub name: String,
}

/// A campaign's budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignBudgetInfo {
    /// Campaign name.
    pub campaign_name: String,
    /// Budget resource.
    pub budget: ResourceName,
    /// Current daily amount.
    pub amount: Micros,
}

/// A campaign's value-maximizing bidding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignBiddingInfo {
    /// Campaign name.
    pub campaign_name: String,
    /// Current ratio target, if one is set.
    pub ratio_target: Option<f64>,
}

/// Rows from a read-only query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryRows {
    /// Result rows, verbatim.
    pub rows: Vec<Value>,
    /// Token for the next page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Port for read-only queries.
#[async_trait]
pub trait QueryPort: Send + Sync {
    /// Campaigns whose name matches a SQL `LIKE` pattern.
    async fn find_campaigns_by_pattern(
        &self,
        customer_id: &CustomerId,
        like_pattern: &str,
    ) -> Result<Vec<CampaignSummary>, GatewayError>;

    /// Budget of a campaign, or `None` if the campaign does not exist.
    async fn campaign_budget(
        &self,
        customer_id: &CustomerId,
        campaign_id: &CampaignId,
    ) -> Result<Option<CampaignBudgetInfo>, GatewayError>;

    /// Bidding settings of a campaign, or `None` if the campaign does not exist.
    async fn campaign_bidding(
        &self,
        customer_id: &CustomerId,
        campaign_id: &CampaignId,
    ) -> Result<Option<CampaignBiddingInfo>, GatewayError>;

    /// Run a read-only query.
    async fn search(
        &self,
        customer_id: &CustomerId,
        query: &str,
        page_size: u32,
    ) -> Result<QueryRows, GatewayError>;
}
