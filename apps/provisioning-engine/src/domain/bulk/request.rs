//! Bulk status request.

use serde::Serialize;

use crate::domain::provisioning::CampaignStatus;
use crate::domain::resource_names::CustomerId;
use crate::domain::shared::{CampaignId, ResourceName};

/// How the caller identified the campaigns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkTarget {
    /// One campaign by id.
    Single(CampaignId),
    /// Explicit id list.
    List(Vec<CampaignId>),
    /// One campaign by resource name.
    ResourceName(ResourceName),
    /// Campaign name pattern; `*` matches any run of characters.
    Pattern(String),
}

impl BulkTarget {
    /// Whether targets come from pattern matching.
    #[must_use]
    pub const fn is_pattern(&self) -> bool {
        matches!(self, Self::Pattern(_))
    }
}

/// Translate a `*` wildcard pattern into a SQL `LIKE` pattern.
#[must_use]
pub fn pattern_to_like(pattern: &str) -> String {
    pattern.replace('*', "%")
}

/// A campaign a bulk request resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTarget {
    /// Campaign id.
    pub campaign_id: CampaignId,
    /// Campaign resource name.
    pub resource_name: ResourceName,
    /// Campaign name, when resolution returned it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Pause/enable request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOperationRequest {
    /// Owning account.
    pub customer_id: CustomerId,
    /// Campaigns to change.
    pub target: BulkTarget,
    /// Status to set.
    pub status: CampaignStatus,
    /// Caller confirmed a multi-target change.
    pub confirm: bool,
    /// Check budgets before enabling.
    pub safety_check: bool,
}

impl BulkOperationRequest {
    /// Pause request.
    #[must_use]
    pub const fn pause(customer_id: CustomerId, target: BulkTarget, confirm: bool) -> Self {
        Self {
            customer_id,
            target,
            status: CampaignStatus::Paused,
            confirm,
            safety_check: false,
        }
    }

    /// Enable request.
    #[must_use]
    pub const fn enable(
        customer_id: CustomerId,
        target: BulkTarget,
        confirm: bool,
        safety_check: bool,
    ) -> Self {
        Self {
            customer_id,
            target,
            status: CampaignStatus::Enabled,
            confirm,
            safety_check,
        }
    }

    /// Operation name used for guardrails, logs and metrics.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self.status {
            CampaignStatus::Paused => "pause-campaign",
            CampaignStatus::Enabled => "enable-campaign",
        }
    }
}
