//! Provisioning request.

use super::{BudgetInput, CampaignStatus, DateRange, FeedLink, ProvisioningError, ProvisioningStep};
use crate::domain::resource_names::{CustomerId, sanitize_campaign_name};
use crate::domain::shared::ResourceName;

/// Resources already created by an earlier, partially failed run.
///
/// A supplied resource is recorded as that step's result without a remote
/// call, and the run continues with the next step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResumeFrom {
    /// Existing budget.
    pub budget: Option<ResourceName>,
    /// Existing campaign (requires an existing budget too).
    pub campaign: Option<ResourceName>,
}

/// Typed input for one bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisioningRequest {
    /// Owning account.
    pub customer_id: CustomerId,
    /// Sanitized campaign name.
    pub campaign_name: String,
    /// Daily budget.
    pub budget: BudgetInput,
    /// Optional revenue-to-spend target.
    pub ratio_target: Option<f64>,
    /// Optional serving window.
    pub dates: DateRange,
    /// Status requested by the caller.
    pub requested_status: CampaignStatus,
    /// Landing page; an asset group is created only when set.
    pub final_url: Option<String>,
    /// Asset group name override.
    pub asset_group_name: Option<String>,
    /// Optional merchant feed.
    pub feed: Option<FeedLink>,
    /// Target countries (informational).
    pub country_codes: Vec<String>,
    /// Target languages (informational).
    pub language_codes: Vec<String>,
    /// Resume identifiers.
    pub resume: ResumeFrom,
}

impl ProvisioningRequest {
    /// Create a request with the required fields. The name is trimmed and
    /// capped at 255 characters.
    pub fn new(
        customer_id: CustomerId,
        campaign_name: &str,
        budget: BudgetInput,
    ) -> Result<Self, ProvisioningError> {
        Ok(Self {
            customer_id,
            campaign_name: sanitize_campaign_name(campaign_name)?,
            budget,
            ratio_target: None,
            dates: DateRange::default(),
            requested_status: CampaignStatus::Paused,
            final_url: None,
            asset_group_name: None,
            feed: None,
            country_codes: Vec::new(),
            language_codes: Vec::new(),
            resume: ResumeFrom::default(),
        })
    }

    /// Set the ratio target.
    #[must_use]
    pub const fn with_ratio_target(mut self, ratio: f64) -> Self {
        self.ratio_target = Some(ratio);
        self
    }

    /// Set the serving window.
    #[must_use]
    pub const fn with_dates(mut self, dates: DateRange) -> Self {
        self.dates = dates;
        self
    }

    /// Set the requested status.
    #[must_use]
    pub const fn with_requested_status(mut self, status: CampaignStatus) -> Self {
        self.requested_status = status;
        self
    }

    /// Request an asset group for this landing page.
    #[must_use]
    pub fn with_final_url(mut self, url: impl Into<String>, name: Option<String>) -> Self {
        self.final_url = Some(url.into());
        self.asset_group_name = name;
        self
    }

    /// Request a feed link.
    #[must_use]
    pub fn with_feed(mut self, feed: FeedLink) -> Self {
        self.feed = Some(feed);
        self
    }

    /// Set targeting codes.
    #[must_use]
    pub fn with_targeting(mut self, countries: Vec<String>, languages: Vec<String>) -> Self {
        self.country_codes = countries;
        self.language_codes = languages;
        self
    }

    /// Resume from previously created resources.
    #[must_use]
    pub fn with_resume(mut self, resume: ResumeFrom) -> Self {
        self.resume = resume;
        self
    }

    /// Name given to the created budget.
    #[must_use]
    pub fn budget_name(&self) -> String {
        format!("{} Budget", self.campaign_name)
    }

    /// Name given to the created asset group.
    #[must_use]
    pub fn effective_asset_group_name(&self) -> String {
        self.asset_group_name
            .clone()
            .unwrap_or_else(|| format!("{} Assets", self.campaign_name))
    }

    /// The steps this request would run, in order.
    #[must_use]
    pub fn planned_steps(&self) -> Vec<ProvisioningStep> {
        let mut steps = vec![ProvisioningStep::Budget, ProvisioningStep::Campaign];
        if self.final_url.is_some() {
            steps.push(ProvisioningStep::AssetGroup);
        }
        if self.feed.is_some() {
            steps.push(ProvisioningStep::FeedLink);
        }
        steps
    }

    /// Previously created resource for `step`, if resuming.
    #[must_use]
    pub const fn resumed(&self, step: ProvisioningStep) -> Option<&ResourceName> {
        match step {
            ProvisioningStep::Budget => self.resume.budget.as_ref(),
            ProvisioningStep::Campaign => self.resume.campaign.as_ref(),
            ProvisioningStep::AssetGroup | ProvisioningStep::FeedLink => None,
        }
    }
}
