//! Mutation Gateway Port (Driven Port)
//!
//! Interface to the remote advertising API for creating and updating
//! resources. Each call is one atomic remote mutation.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::provisioning::CampaignStatus;
use crate::domain::resource_names::CustomerId;
use crate::domain::shared::{MerchantCenterId, Micros, ResourceName};

/// Request to create a campaign budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSpec {
    /// Owning account.
    pub customer_id: CustomerId,
    /// Budget name.
    pub name: String,
    /// Daily amount.
    pub amount: Micros,
}

/// Request to create a campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignSpec {
    /// Owning account.
    pub customer_id: CustomerId,
    /// Campaign name.
    pub name: String,
    /// Budget the campaign spends from.
    pub budget: ResourceName,
    /// Initial status.
    pub status: CampaignStatus,
    /// Optional revenue-to-spend target for value-maximizing bidding.
    pub ratio_target: Option<f64>,
    /// First serving day.
    pub start_date: Option<NaiveDate>,
    /// Last serving day.
    pub end_date: Option<NaiveDate>,
}

/// Request to create an asset group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetGroupSpec {
    /// Owning account.
    pub customer_id: CustomerId,
    /// Parent campaign.
    pub campaign: ResourceName,
    /// Asset group name.
    pub name: String,
    /// Landing pages.
    pub final_urls: Vec<String>,
}

/// Request to attach a merchant feed to a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedLinkSpec {
    /// Owning account.
    pub customer_id: CustomerId,
    /// Campaign to update.
    pub campaign: ResourceName,
    /// Merchant Center account.
    pub merchant_center_id: MerchantCenterId,
    /// Optional feed label.
    pub feed_label: Option<String>,
}

/// Request to change a budget amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetUpdateSpec {
    /// Owning account.
    pub customer_id: CustomerId,
    /// Budget to update.
    pub budget: ResourceName,
    /// New daily amount.
    pub amount: Micros,
}

/// Request to change value-maximizing bidding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiddingUpdateSpec {
    /// Owning account.
    pub customer_id: CustomerId,
    /// Campaign to update.
    pub campaign: ResourceName,
    /// New ratio target.
    pub ratio_target: f64,
    /// Optional CPC ceiling.
    pub cpc_bid_ceiling: Option<Micros>,
    /// Optional CPC floor.
    pub cpc_bid_floor: Option<Micros>,
}

/// Acknowledgment of an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationAck {
    /// Resource that was updated.
    pub resource_name: ResourceName,
}

/// Mutation gateway error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The remote API returned an error; status, code and message are verbatim.
    #[error("Remote error ({status}): {message}")]
    Remote {
        /// HTTP status.
        status: u16,
        /// Remote error code.
        code: Option<String>,
        /// Remote message.
        message: String,
    },

    /// Could not reach the remote API.
    #[error("Gateway connection error: {message}")]
    Connection {
        /// Error details.
        message: String,
    },

    /// Credentials missing or rejected.
    #[error("Gateway authentication failed: {message}")]
    Authentication {
        /// HTTP status (401 or 403); `None` when no request was sent.
        status: Option<u16>,
        /// Remote error code.
        code: Option<String>,
        /// Error details.
        message: String,
    },

    /// Rate limited by the remote API.
    #[error("Rate limited by remote API: {message}")]
    RateLimited {
        /// Remote error code.
        code: Option<String>,
        /// Remote message.
        message: String,
    },

    /// Resource does not exist.
    #[error("Resource not found: {resource}")]
    NotFound {
        /// The missing resource.
        resource: String,
    },

    /// Response could not be interpreted.
    #[error("Invalid gateway response: {message}")]
    InvalidResponse {
        /// Error details.
        message: String,
    },
}

impl GatewayError {
    /// Remote HTTP status, when the error came from a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            Self::Authentication { status, .. } => *status,
            Self::RateLimited { .. } => Some(429),
            Self::NotFound { .. } => Some(404),
            Self::Connection { .. } | Self::InvalidResponse { .. } => None,
        }
    }

    /// Remote error code, when one was returned.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Remote { code, .. }
            | Self::Authentication { code, .. }
            | Self::RateLimited { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

/// Port for remote mutations.
#[async_trait]
pub trait MutationGatewayPort: Send + Sync {
    /// Create a campaign budget.
    async fn create_budget(&self, spec: BudgetSpec) -> Result<ResourceName, GatewayError>;

    /// Create a campaign.
    async fn create_campaign(&self, spec: CampaignSpec) -> Result<ResourceName, GatewayError>;

    /// Create an asset group.
    async fn create_asset_group(&self, spec: AssetGroupSpec)
    -> Result<ResourceName, GatewayError>;

    /// Attach a merchant feed to a campaign.
    async fn link_feed(&self, spec: FeedLinkSpec) -> Result<MutationAck, GatewayError>;

    /// Set a campaign's status.
    async fn change_status(
        &self,
        customer_id: &CustomerId,
        campaign: &ResourceName,
        status: CampaignStatus,
    ) -> Result<MutationAck, GatewayError>;

    /// Change a budget amount.
    async fn update_budget(&self, spec: BudgetUpdateSpec) -> Result<MutationAck, GatewayError>;

    /// Change bidding settings.
    async fn update_bidding(&self, spec: BiddingUpdateSpec) -> Result<MutationAck, GatewayError>;
}
