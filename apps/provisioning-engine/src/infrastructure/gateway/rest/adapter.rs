//! REST gateway adapter implementing `MutationGatewayPort` and `QueryPort`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::application::ports::{
    AssetGroupSpec, BiddingUpdateSpec, BudgetSpec, BudgetUpdateSpec, CampaignBiddingInfo,
    CampaignBudgetInfo, CampaignSpec, CampaignSummary, FeedLinkSpec, GatewayError, MutationAck,
    MutationGatewayPort, QueryPort, QueryRows,
};
use crate::domain::guardrails::mask_sensitive_text;
use crate::domain::provisioning::CampaignStatus;
use crate::domain::resource_names::{CustomerId, campaign_resource_name};
use crate::domain::shared::{CampaignId, Micros, ResourceName};
use crate::observability::record_gateway_call;

use super::api_types::{
    AssetGroupResource, BudgetAmountUpdate, BudgetResource, CampaignBiddingUpdate,
    CampaignResource, CampaignRow, CampaignShoppingUpdate, CampaignStatusUpdate, Int64,
    MaximizeConversionValue, MutateRequest, MutateResponse, SearchRequest, ShoppingSetting,
};
use super::config::RestGatewayConfig;
use super::error::RestGatewayError;
use super::http_client::RestHttpClient;

const BUDGETS: &str = "campaignBudgets";
const CAMPAIGNS: &str = "campaigns";
const ASSET_GROUPS: &str = "assetGroups";

/// Remote advertising API adapter over JSON REST.
#[derive(Debug, Clone)]
pub struct RestGateway {
    client: RestHttpClient,
}

impl RestGateway {
    /// Create a new REST gateway.
    pub fn new(config: &RestGatewayConfig) -> Result<Self, RestGatewayError> {
        Ok(Self {
            client: RestHttpClient::new(config)?,
        })
    }

    #[allow(clippy::future_not_send)]
    async fn mutate<B: serde::Serialize>(
        &self,
        call: &'static str,
        customer_id: &CustomerId,
        collection: &str,
        body: &MutateRequest<B>,
    ) -> Result<ResourceName, GatewayError> {
        let result = self
            .client
            .mutate(customer_id.as_str(), collection, body)
            .await
            .and_then(|response| first_resource_name(response, collection));
        track(call, result)
    }

    async fn search_rows<T: DeserializeOwned>(
        &self,
        call: &'static str,
        customer_id: &CustomerId,
        query: String,
    ) -> Result<Vec<T>, GatewayError> {
        let request = SearchRequest {
            query,
            page_size: None,
        };
        let result = self
            .client
            .search(customer_id.as_str(), &request)
            .await
            .and_then(|response| {
                response
                    .results
                    .into_iter()
                    .map(|row| {
                        serde_json::from_value(row)
                            .map_err(|e| RestGatewayError::JsonParse(e.to_string()))
                    })
                    .collect()
            });
        track(call, result)
    }
}

fn first_resource_name(
    response: MutateResponse,
    collection: &str,
) -> Result<ResourceName, RestGatewayError> {
    response
        .results
        .into_iter()
        .next()
        .map(|r| ResourceName::new(r.resource_name))
        .ok_or_else(|| RestGatewayError::MissingField(format!("{collection}:mutate result")))
}

/// Record the call outcome and convert the error.
fn track<T>(call: &'static str, result: Result<T, RestGatewayError>) -> Result<T, GatewayError> {
    record_gateway_call(call, result.is_ok());
    result.map_err(|e| {
        tracing::error!(call, error = %mask_sensitive_text(&e.to_string()), "Gateway call failed");
        e.into()
    })
}

/// Quote a value as a single-quoted query literal.
fn quote_literal(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

fn micros_field(value: Option<Micros>) -> Option<Int64> {
    value.map(|m| Int64::from_i64(m.value()))
}

/// Campaign ids are numeric; anything else cannot name a campaign.
fn is_numeric_id(id: &CampaignId) -> bool {
    !id.as_str().is_empty() && id.as_str().chars().all(|c| c.is_ascii_digit())
}

#[async_trait]
impl MutationGatewayPort for RestGateway {
    async fn create_budget(&self, spec: BudgetSpec) -> Result<ResourceName, GatewayError> {
        let body = MutateRequest::create(BudgetResource {
            name: spec.name,
            amount_micros: spec.amount.value().to_string(),
            delivery_method: "STANDARD",
            explicitly_shared: false,
        });
        self.mutate("create_budget", &spec.customer_id, BUDGETS, &body)
            .await
    }

    async fn create_campaign(&self, spec: CampaignSpec) -> Result<ResourceName, GatewayError> {
        let body = MutateRequest::create(CampaignResource {
            name: spec.name,
            status: spec.status.as_str(),
            advertising_channel_type: "PERFORMANCE_MAX",
            campaign_budget: spec.budget.into_inner(),
            maximize_conversion_value: MaximizeConversionValue {
                target_roas: spec.ratio_target,
                ..MaximizeConversionValue::default()
            },
            start_date: spec.start_date.map(|d| d.format("%Y%m%d").to_string()),
            end_date: spec.end_date.map(|d| d.format("%Y%m%d").to_string()),
        });
        self.mutate("create_campaign", &spec.customer_id, CAMPAIGNS, &body)
            .await
    }

    async fn create_asset_group(
        &self,
        spec: AssetGroupSpec,
    ) -> Result<ResourceName, GatewayError> {
        let body = MutateRequest::create(AssetGroupResource {
            name: spec.name,
            campaign: spec.campaign.into_inner(),
            final_urls: spec.final_urls,
            status: "ENABLED",
        });
        self.mutate("create_asset_group", &spec.customer_id, ASSET_GROUPS, &body)
            .await
    }

    async fn link_feed(&self, spec: FeedLinkSpec) -> Result<MutationAck, GatewayError> {
        let body = MutateRequest::update(
            CampaignShoppingUpdate {
                resource_name: spec.campaign.into_inner(),
                shopping_setting: ShoppingSetting {
                    merchant_id: spec.merchant_center_id.into_inner(),
                    enable_local: true,
                    feed_label: spec.feed_label,
                },
            },
            "shoppingSetting",
        );
        let resource_name = self
            .mutate("link_feed", &spec.customer_id, CAMPAIGNS, &body)
            .await?;
        Ok(MutationAck { resource_name })
    }

    async fn change_status(
        &self,
        customer_id: &CustomerId,
        campaign: &ResourceName,
        status: CampaignStatus,
    ) -> Result<MutationAck, GatewayError> {
        let body = MutateRequest::update(
            CampaignStatusUpdate {
                resource_name: campaign.to_string(),
                status: status.as_str(),
            },
            "status",
        );
        let resource_name = self
            .mutate("change_status", customer_id, CAMPAIGNS, &body)
            .await?;
        Ok(MutationAck { resource_name })
    }

    async fn update_budget(&self, spec: BudgetUpdateSpec) -> Result<MutationAck, GatewayError> {
        let body = MutateRequest::update(
            BudgetAmountUpdate {
                resource_name: spec.budget.into_inner(),
                amount_micros: spec.amount.value().to_string(),
            },
            "amountMicros",
        );
        let resource_name = self
            .mutate("update_budget", &spec.customer_id, BUDGETS, &body)
            .await?;
        Ok(MutationAck { resource_name })
    }

    async fn update_bidding(&self, spec: BiddingUpdateSpec) -> Result<MutationAck, GatewayError> {
        let body = MutateRequest::update(
            CampaignBiddingUpdate {
                resource_name: spec.campaign.into_inner(),
                maximize_conversion_value: MaximizeConversionValue {
                    target_roas: Some(spec.ratio_target),
                    cpc_bid_ceiling_micros: micros_field(spec.cpc_bid_ceiling),
                    cpc_bid_floor_micros: micros_field(spec.cpc_bid_floor),
                },
            },
            "maximizeConversionValue",
        );
        let resource_name = self
            .mutate("update_bidding", &spec.customer_id, CAMPAIGNS, &body)
            .await?;
        Ok(MutationAck { resource_name })
    }
}

#[async_trait]
impl QueryPort for RestGateway {
    async fn find_campaigns_by_pattern(
        &self,
        customer_id: &CustomerId,
        like_pattern: &str,
    ) -> Result<Vec<CampaignSummary>, GatewayError> {
        let query = format!(
            "SELECT campaign.id, campaign.name FROM campaign WHERE campaign.name LIKE {}",
            quote_literal(like_pattern)
        );
        let rows: Vec<CampaignRow> = self
            .search_rows("find_campaigns", customer_id, query)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let id = row.campaign.id?.to_text();
                Some(CampaignSummary {
                    campaign_id: CampaignId::new(id),
                    name: row.campaign.name.unwrap_or_default(),
                })
            })
            .collect())
    }

    async fn campaign_budget(
        &self,
        customer_id: &CustomerId,
        campaign_id: &CampaignId,
    ) -> Result<Option<CampaignBudgetInfo>, GatewayError> {
        if !is_numeric_id(campaign_id) {
            return Ok(None);
        }
        let query = format!(
            "SELECT campaign.id, campaign.name, campaign.campaign_budget, \
             campaign_budget.amount_micros FROM campaign WHERE campaign.resource_name = {}",
            quote_literal(campaign_resource_name(customer_id, campaign_id.as_str()).as_str())
        );
        let rows: Vec<CampaignRow> = self
            .search_rows("campaign_budget", customer_id, query)
            .await?;
        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };

        let budget = row.campaign.campaign_budget.ok_or_else(|| {
            GatewayError::from(RestGatewayError::MissingField(
                "campaign.campaignBudget".to_string(),
            ))
        })?;
        let amount = row
            .campaign_budget
            .and_then(|b| b.amount_micros)
            .and_then(|a| a.value())
            .map_or(Micros::ZERO, Micros::new);

        Ok(Some(CampaignBudgetInfo {
            campaign_name: row.campaign.name.unwrap_or_default(),
            budget: ResourceName::new(budget),
            amount,
        }))
    }

    async fn campaign_bidding(
        &self,
        customer_id: &CustomerId,
        campaign_id: &CampaignId,
    ) -> Result<Option<CampaignBiddingInfo>, GatewayError> {
        if !is_numeric_id(campaign_id) {
            return Ok(None);
        }
        let query = format!(
            "SELECT campaign.id, campaign.name, \
             campaign.maximize_conversion_value.target_roas, \
             campaign.maximize_conversion_value.cpc_bid_ceiling_micros, \
             campaign.maximize_conversion_value.cpc_bid_floor_micros \
             FROM campaign WHERE campaign.resource_name = {}",
            quote_literal(campaign_resource_name(customer_id, campaign_id.as_str()).as_str())
        );
        let rows: Vec<CampaignRow> = self
            .search_rows("campaign_bidding", customer_id, query)
            .await?;

        Ok(rows.into_iter().next().map(|row| CampaignBiddingInfo {
            campaign_name: row.campaign.name.unwrap_or_default(),
            ratio_target: row
                .campaign
                .maximize_conversion_value
                .and_then(|m| m.target_roas),
        }))
    }

    async fn search(
        &self,
        customer_id: &CustomerId,
        query: &str,
        page_size: u32,
    ) -> Result<QueryRows, GatewayError> {
        let request = SearchRequest {
            query: query.to_string(),
            page_size: Some(page_size),
        };
        let result = self
            .client
            .search(customer_id.as_str(), &request)
            .await
            .map(|response| QueryRows {
                rows: response.results,
                next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
            });
        track("search", result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_quotes_are_escaped() {
        assert_eq!(quote_literal("Summer%"), "'Summer%'");
        assert_eq!(quote_literal("Bob's %"), r"'Bob\'s %'");
        assert_eq!(quote_literal(r"a\b"), r"'a\\b'");
    }

    #[test]
    fn numeric_ids_only() {
        assert!(is_numeric_id(&CampaignId::new("123")));
        assert!(!is_numeric_id(&CampaignId::new("12a")));
        assert!(!is_numeric_id(&CampaignId::new("")));
    }

    #[test]
    fn empty_mutate_response_is_missing_field() {
        let err = first_resource_name(MutateResponse::default(), CAMPAIGNS).unwrap_err();
        assert!(matches!(err, RestGatewayError::MissingField(_)));
    }
}
