//! In-memory recording gateway.
//!
//! Implements both [`MutationGatewayPort`] and [`QueryPort`] over a local
//! campaign store. Every call is recorded, and any call kind can be made to
//! fail, so use cases can be exercised without the remote API.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use serde_json::json;

use crate::application::ports::{
    AssetGroupSpec, BiddingUpdateSpec, BudgetSpec, BudgetUpdateSpec, CampaignBiddingInfo,
    CampaignBudgetInfo, CampaignSpec, CampaignSummary, FeedLinkSpec, GatewayError,
    MutationAck, MutationGatewayPort, QueryPort, QueryRows,
};
use crate::domain::provisioning::CampaignStatus;
use crate::domain::resource_names::{
    CustomerId, asset_group_resource_name, budget_resource_name, campaign_resource_name,
    extract_trailing_id,
};
use crate::domain::shared::{CampaignId, MerchantCenterId, Micros, ResourceName};

/// Gateway call kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayCall {
    /// `create_budget`
    CreateBudget,
    /// `create_campaign`
    CreateCampaign,
    /// `create_asset_group`
    CreateAssetGroup,
    /// `link_feed`
    LinkFeed,
    /// `change_status`
    ChangeStatus,
    /// `update_budget`
    UpdateBudget,
    /// `update_bidding`
    UpdateBidding,
    /// `find_campaigns_by_pattern`
    FindCampaigns,
    /// `campaign_budget`
    CampaignBudget,
    /// `campaign_bidding`
    CampaignBidding,
    /// `search`
    Search,
}

impl GatewayCall {
    /// Whether this call changes remote state.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::CreateBudget
                | Self::CreateCampaign
                | Self::CreateAssetGroup
                | Self::LinkFeed
                | Self::ChangeStatus
                | Self::UpdateBudget
                | Self::UpdateBidding
        )
    }
}

/// Campaign held by the in-memory store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCampaign {
    /// Campaign name.
    pub name: String,
    /// Current status.
    pub status: CampaignStatus,
    /// Budget id, if the campaign has one.
    pub budget_id: Option<String>,
    /// Current ratio target.
    pub ratio_target: Option<f64>,
    /// CPC ceiling.
    pub cpc_bid_ceiling: Option<Micros>,
    /// CPC floor.
    pub cpc_bid_floor: Option<Micros>,
    /// Linked merchant account.
    pub merchant_center_id: Option<MerchantCenterId>,
    /// Linked feed label.
    pub feed_label: Option<String>,
}

#[derive(Debug)]
struct State {
    next_id: u64,
    campaigns: BTreeMap<String, StoredCampaign>,
    budgets: HashMap<String, (String, Micros)>,
    asset_groups: Vec<(String, String)>,
    calls: Vec<GatewayCall>,
    failures: HashMap<GatewayCall, GatewayError>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            next_id: 1000,
            campaigns: BTreeMap::new(),
            budgets: HashMap::new(),
            asset_groups: Vec::new(),
            calls: Vec::new(),
            failures: HashMap::new(),
        }
    }
}

impl State {
    fn allocate_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }

    fn begin(&mut self, call: GatewayCall) -> Result<(), GatewayError> {
        self.calls.push(call);
        match self.failures.get(&call) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn campaign_mut(&mut self, name: &ResourceName) -> Result<&mut StoredCampaign, GatewayError> {
        let not_found = || GatewayError::NotFound {
            resource: name.to_string(),
        };
        let id = extract_trailing_id(name.as_str()).map_err(|_| not_found())?;
        self.campaigns.get_mut(&id).ok_or_else(not_found)
    }
}

/// Recording gateway over an in-memory campaign store.
///
/// Suitable for testing and local development. Not for production use.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    state: RwLock<State>,
}

impl InMemoryGateway {
    /// Create an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a paused campaign with its own budget (for test setup).
    #[must_use]
    pub fn with_campaign(self, campaign_id: &str, name: &str, budget_micros: i64) -> Self {
        {
            let mut state = self.write();
            let budget_id = state.allocate_id();
            state
                .budgets
                .insert(budget_id.clone(), (format!("{name} Budget"), Micros::new(budget_micros)));
            state.campaigns.insert(
                campaign_id.to_string(),
                StoredCampaign {
                    name: name.to_string(),
                    status: CampaignStatus::Paused,
                    budget_id: Some(budget_id),
                    ratio_target: None,
                    cpc_bid_ceiling: None,
                    cpc_bid_floor: None,
                    merchant_center_id: None,
                    feed_label: None,
                },
            );
        }
        self
    }

    /// Make every subsequent call of this kind fail with `error`.
    pub fn fail_on(&self, call: GatewayCall, error: GatewayError) {
        self.write().failures.insert(call, error);
    }

    /// Stop failing calls of this kind.
    pub fn clear_failure(&self, call: GatewayCall) {
        self.write().failures.remove(&call);
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.read().calls.clone()
    }

    /// Number of calls that change remote state.
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.read().calls.iter().filter(|c| c.is_mutation()).count()
    }

    /// Number of calls of one kind.
    #[must_use]
    pub fn call_count(&self, call: GatewayCall) -> usize {
        self.read().calls.iter().filter(|c| **c == call).count()
    }

    /// Snapshot of a stored campaign.
    #[must_use]
    pub fn campaign(&self, campaign_id: &str) -> Option<StoredCampaign> {
        self.read().campaigns.get(campaign_id).cloned()
    }

    /// Current budget amount of a campaign.
    #[must_use]
    pub fn campaign_budget_amount(&self, campaign_id: &str) -> Option<Micros> {
        let state = self.read();
        let budget_id = state.campaigns.get(campaign_id)?.budget_id.as_ref()?;
        state.budgets.get(budget_id).map(|(_, amount)| *amount)
    }

    /// Number of asset groups created.
    #[must_use]
    pub fn asset_group_count(&self) -> usize {
        self.read().asset_groups.len()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// SQL `LIKE` match supporting `%` only.
fn like_matches(pattern: &str, value: &str) -> bool {
    let parts: Vec<&str> = pattern.split('%').collect();
    if parts.len() == 1 {
        return pattern == value;
    }

    let first = parts[0];
    let last = parts[parts.len() - 1];
    if value.len() < first.len() + last.len()
        || !value.starts_with(first)
        || !value.ends_with(last)
    {
        return false;
    }

    let mut rest = &value[first.len()..value.len() - last.len()];
    for middle in &parts[1..parts.len() - 1] {
        match rest.find(middle) {
            Some(pos) => rest = &rest[pos + middle.len()..],
            None => return false,
        }
    }
    true
}

#[async_trait]
impl MutationGatewayPort for InMemoryGateway {
    async fn create_budget(&self, spec: BudgetSpec) -> Result<ResourceName, GatewayError> {
        let mut state = self.write();
        state.begin(GatewayCall::CreateBudget)?;
        let id = state.allocate_id();
        state.budgets.insert(id.clone(), (spec.name, spec.amount));
        Ok(budget_resource_name(&spec.customer_id, &id))
    }

    async fn create_campaign(&self, spec: CampaignSpec) -> Result<ResourceName, GatewayError> {
        let mut state = self.write();
        state.begin(GatewayCall::CreateCampaign)?;
        let budget_id = extract_trailing_id(spec.budget.as_str()).map_err(|e| {
            GatewayError::Remote {
                status: 400,
                code: Some("INVALID_ARGUMENT".to_string()),
                message: e.to_string(),
            }
        })?;
        let id = state.allocate_id();
        state.campaigns.insert(
            id.clone(),
            StoredCampaign {
                name: spec.name,
                status: spec.status,
                budget_id: Some(budget_id),
                ratio_target: spec.ratio_target,
                cpc_bid_ceiling: None,
                cpc_bid_floor: None,
                merchant_center_id: None,
                feed_label: None,
            },
        );
        Ok(campaign_resource_name(&spec.customer_id, &id))
    }

    async fn create_asset_group(
        &self,
        spec: AssetGroupSpec,
    ) -> Result<ResourceName, GatewayError> {
        let mut state = self.write();
        state.begin(GatewayCall::CreateAssetGroup)?;
        state.campaign_mut(&spec.campaign)?;
        let id = state.allocate_id();
        state.asset_groups.push((id.clone(), spec.name));
        Ok(asset_group_resource_name(&spec.customer_id, &id))
    }

    async fn link_feed(&self, spec: FeedLinkSpec) -> Result<MutationAck, GatewayError> {
        let mut state = self.write();
        state.begin(GatewayCall::LinkFeed)?;
        let campaign = state.campaign_mut(&spec.campaign)?;
        campaign.merchant_center_id = Some(spec.merchant_center_id);
        campaign.feed_label = spec.feed_label;
        Ok(MutationAck {
            resource_name: spec.campaign,
        })
    }

    async fn change_status(
        &self,
        _customer_id: &CustomerId,
        campaign: &ResourceName,
        status: CampaignStatus,
    ) -> Result<MutationAck, GatewayError> {
        let mut state = self.write();
        state.begin(GatewayCall::ChangeStatus)?;
        state.campaign_mut(campaign)?.status = status;
        Ok(MutationAck {
            resource_name: campaign.clone(),
        })
    }

    async fn update_budget(&self, spec: BudgetUpdateSpec) -> Result<MutationAck, GatewayError> {
        let mut state = self.write();
        state.begin(GatewayCall::UpdateBudget)?;
        let not_found = || GatewayError::NotFound {
            resource: spec.budget.to_string(),
        };
        let id = extract_trailing_id(spec.budget.as_str()).map_err(|_| not_found())?;
        let entry = state.budgets.get_mut(&id).ok_or_else(not_found)?;
        entry.1 = spec.amount;
        Ok(MutationAck {
            resource_name: spec.budget,
        })
    }

    async fn update_bidding(&self, spec: BiddingUpdateSpec) -> Result<MutationAck, GatewayError> {
        let mut state = self.write();
        state.begin(GatewayCall::UpdateBidding)?;
        let campaign = state.campaign_mut(&spec.campaign)?;
        campaign.ratio_target = Some(spec.ratio_target);
        if spec.cpc_bid_ceiling.is_some() {
            campaign.cpc_bid_ceiling = spec.cpc_bid_ceiling;
        }
        if spec.cpc_bid_floor.is_some() {
            campaign.cpc_bid_floor = spec.cpc_bid_floor;
        }
        Ok(MutationAck {
            resource_name: spec.campaign,
        })
    }
}

#[async_trait]
impl QueryPort for InMemoryGateway {
    async fn find_campaigns_by_pattern(
        &self,
        _customer_id: &CustomerId,
        like_pattern: &str,
    ) -> Result<Vec<CampaignSummary>, GatewayError> {
        let mut state = self.write();
        state.begin(GatewayCall::FindCampaigns)?;
        Ok(state
            .campaigns
            .iter()
            .filter(|(_, c)| like_matches(like_pattern, &c.name))
            .map(|(id, c)| CampaignSummary {
                campaign_id: CampaignId::new(id.clone()),
                name: c.name.clone(),
            })
            .collect())
    }

    async fn campaign_budget(
        &self,
        customer_id: &CustomerId,
        campaign_id: &CampaignId,
    ) -> Result<Option<CampaignBudgetInfo>, GatewayError> {
        let mut state = self.write();
        state.begin(GatewayCall::CampaignBudget)?;
        let Some(campaign) = state.campaigns.get(campaign_id.as_str()) else {
            return Ok(None);
        };
        let amount = campaign
            .budget_id
            .as_ref()
            .and_then(|id| state.budgets.get(id))
            .map_or(Micros::ZERO, |(_, amount)| *amount);
        let budget_id = campaign.budget_id.clone().unwrap_or_default();

        Ok(Some(CampaignBudgetInfo {
            campaign_name: campaign.name.clone(),
            budget: budget_resource_name(customer_id, &budget_id),
            amount,
        }))
    }

    async fn campaign_bidding(
        &self,
        _customer_id: &CustomerId,
        campaign_id: &CampaignId,
    ) -> Result<Option<CampaignBiddingInfo>, GatewayError> {
        let mut state = self.write();
        state.begin(GatewayCall::CampaignBidding)?;
        Ok(state
            .campaigns
            .get(campaign_id.as_str())
            .map(|c| CampaignBiddingInfo {
                campaign_name: c.name.clone(),
                ratio_target: c.ratio_target,
            }))
    }

    async fn search(
        &self,
        customer_id: &CustomerId,
        _query: &str,
        page_size: u32,
    ) -> Result<QueryRows, GatewayError> {
        let mut state = self.write();
        state.begin(GatewayCall::Search)?;
        let rows = state
            .campaigns
            .iter()
            .take(page_size as usize)
            .map(|(id, c)| {
                json!({
                    "campaign": {
                        "resourceName": campaign_resource_name(customer_id, id).as_str(),
                        "id": id,
                        "name": c.name,
                        "status": c.status.as_str(),
                    }
                })
            })
            .collect();

        Ok(QueryRows {
            rows,
            next_page_token: None,
        })
    }
}
