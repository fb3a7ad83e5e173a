//! Bulk status results.

use serde::Serialize;

use crate::domain::guardrails::DryRunResult;
use crate::domain::provisioning::CampaignStatus;
use crate::domain::shared::{CampaignId, ResourceName};

/// Outcome for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetResult {
    /// Campaign id.
    pub campaign_id: CampaignId,
    /// Campaign resource name.
    pub resource_name: ResourceName,
    /// Whether the status changed.
    pub success: bool,
    /// Status after a successful change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_status: Option<CampaignStatus>,
    /// Failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Safety-check findings.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

impl TargetResult {
    /// Status changed.
    #[must_use]
    pub const fn updated(
        campaign_id: CampaignId,
        resource_name: ResourceName,
        status: CampaignStatus,
    ) -> Self {
        Self {
            campaign_id,
            resource_name,
            success: true,
            new_status: Some(status),
            error: None,
            issues: Vec::new(),
        }
    }

    /// Status not changed.
    #[must_use]
    pub fn failed(
        campaign_id: CampaignId,
        resource_name: ResourceName,
        error: impl Into<String>,
        issues: Vec<String>,
    ) -> Self {
        Self {
            campaign_id,
            resource_name,
            success: false,
            new_status: None,
            error: Some(error.into()),
            issues,
        }
    }
}

/// Result of applying a status change to every resolved target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkStatusReport {
    /// True when no target failed.
    pub success: bool,
    /// Operation name.
    pub operation: String,
    /// Status that was applied.
    pub status: CampaignStatus,
    /// Targets changed.
    pub updated_count: usize,
    /// Targets not changed.
    pub failed_count: usize,
    /// Per-target outcomes in resolution order.
    pub results: Vec<TargetResult>,
}

impl BulkStatusReport {
    /// Assemble from per-target outcomes.
    #[must_use]
    pub fn from_results(operation: &str, status: CampaignStatus, results: Vec<TargetResult>) -> Self {
        let updated_count = results.iter().filter(|r| r.success).count();
        let failed_count = results.len() - updated_count;
        Self {
            success: failed_count == 0,
            operation: operation.to_string(),
            status,
            updated_count,
            failed_count,
            results,
        }
    }
}

/// What one bulk invocation produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BulkStatusOutcome {
    /// Nothing matched; nothing was changed.
    NoMatch {
        /// Always true.
        success: bool,
        /// Always zero.
        updated_count: usize,
        /// Explanation.
        message: String,
    },
    /// Dry-run over the resolved targets.
    DryRun(DryRunResult),
    /// Status changes were attempted.
    Finished(BulkStatusReport),
}

impl BulkStatusOutcome {
    /// Successful no-op for an empty resolution.
    #[must_use]
    pub fn no_match(pattern: &str) -> Self {
        Self::NoMatch {
            success: true,
            updated_count: 0,
            message: format!("No campaigns found matching pattern: {pattern}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts() {
        let results = vec![
            TargetResult::updated("1".into(), "customers/1/campaigns/1".into(), CampaignStatus::Paused),
            TargetResult::failed("2".into(), "customers/1/campaigns/2".into(), "boom", Vec::new()),
        ];
        let report = BulkStatusReport::from_results("pause-campaign", CampaignStatus::Paused, results);
        assert!(!report.success);
        assert_eq!(report.updated_count, 1);
        assert_eq!(report.failed_count, 1);
    }
}
