//! Provisioning results.

use serde::{Serialize, Serializer};

use super::{CampaignStatus, ProvisioningStep};
use crate::domain::guardrails::DryRunResult;
use crate::domain::shared::ResourceName;

/// One created (or resumed) resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionedResource {
    /// Step that produced it.
    pub step: ProvisioningStep,
    /// Remote identifier.
    pub resource_name: ResourceName,
    /// Taken from the resume parameters rather than created.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub resumed: bool,
}

/// Ordered resources produced by one run.
///
/// Append-only while the orchestrator runs; callers only ever see it
/// read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProvisionedResourceSet {
    entries: Vec<ProvisionedResource>,
}

impl ProvisionedResourceSet {
    /// Empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, step: ProvisioningStep, resource_name: ResourceName, resumed: bool) {
        self.entries.push(ProvisionedResource {
            step,
            resource_name,
            resumed,
        });
    }

    /// Entries in creation order.
    #[must_use]
    pub fn entries(&self) -> &[ProvisionedResource] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resource produced by `step`.
    #[must_use]
    pub fn get(&self, step: ProvisioningStep) -> Option<&ResourceName> {
        self.entries
            .iter()
            .find(|e| e.step == step)
            .map(|e| &e.resource_name)
    }
}

/// Terminal state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningState {
    /// Every requested step succeeded.
    Done,
    /// The named step failed; later steps were not attempted.
    FailedAt(ProvisioningStep),
}

impl ProvisioningState {
    /// Failing step, if any.
    #[must_use]
    pub const fn failed_step(&self) -> Option<ProvisioningStep> {
        match self {
            Self::Done => None,
            Self::FailedAt(step) => Some(*step),
        }
    }
}

impl Serialize for ProvisioningState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Done => serializer.serialize_str("DONE"),
            Self::FailedAt(_) => serializer.serialize_str("FAILED_AT"),
        }
    }
}

/// Remote failure captured in a partial report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepFailure {
    /// Remote HTTP status, when there was one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Remote error code, verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Remote message, verbatim.
    pub message: String,
}

/// Result of a run that reached the remote side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisioningReport {
    /// True only when `state` is `DONE`.
    pub success: bool,
    /// Terminal state.
    pub state: ProvisioningState,
    /// Failing step name when `state` is `FAILED_AT`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<ProvisioningStep>,
    /// Everything that exists on the remote side after this run.
    pub resources: ProvisionedResourceSet,
    /// Remote failure, when `state` is `FAILED_AT`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StepFailure>,
    /// Campaign name used.
    pub campaign_name: String,
    /// Status the campaign was created with.
    pub status: CampaignStatus,
    /// Informational notes for the caller.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl ProvisioningReport {
    /// A completed run.
    #[must_use]
    pub const fn done(
        resources: ProvisionedResourceSet,
        campaign_name: String,
        status: CampaignStatus,
        notes: Vec<String>,
    ) -> Self {
        Self {
            success: true,
            state: ProvisioningState::Done,
            failed_step: None,
            resources,
            error: None,
            campaign_name,
            status,
            notes,
        }
    }

    /// A run that stopped at `step`.
    #[must_use]
    pub const fn failed(
        step: ProvisioningStep,
        failure: StepFailure,
        resources: ProvisionedResourceSet,
        campaign_name: String,
        status: CampaignStatus,
        notes: Vec<String>,
    ) -> Self {
        Self {
            success: false,
            state: ProvisioningState::FailedAt(step),
            failed_step: Some(step),
            resources,
            error: Some(failure),
            campaign_name,
            status,
            notes,
        }
    }
}

/// What one provisioning invocation produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProvisioningOutcome {
    /// Dry-run: nothing was sent.
    DryRun(DryRunResult),
    /// The step sequence ran, fully or partially.
    Finished(ProvisioningReport),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resource_set_preserves_order() {
        let mut set = ProvisionedResourceSet::new();
        set.record(ProvisioningStep::Budget, ResourceName::new("b"), false);
        set.record(ProvisioningStep::Campaign, ResourceName::new("c"), true);

        assert_eq!(set.len(), 2);
        assert_eq!(set.entries()[0].step, ProvisioningStep::Budget);
        assert_eq!(set.get(ProvisioningStep::Campaign).unwrap().as_str(), "c");
        assert!(set.get(ProvisioningStep::AssetGroup).is_none());
    }

    #[test]
    fn failed_report_serializes_step() {
        let mut set = ProvisionedResourceSet::new();
        set.record(ProvisioningStep::Budget, ResourceName::new("customers/1/campaignBudgets/2"), false);

        let report = ProvisioningReport::failed(
            ProvisioningStep::Campaign,
            StepFailure {
                status: Some(400),
                code: Some("INVALID_ARGUMENT".to_string()),
                message: "bad".to_string(),
            },
            set,
            "Summer".to_string(),
            CampaignStatus::Paused,
            Vec::new(),
        );

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["state"], json!("FAILED_AT"));
        assert_eq!(value["failed_step"], json!("campaign"));
        assert_eq!(value["resources"][0]["step"], json!("budget"));
        assert_eq!(value["error"]["status"], json!(400));
    }
}
