//! Conversion of flat parameter mappings into use case requests.
//!
//! Shapes are validated before these run; the checks here cover what a
//! shape cannot express (cross-field rules, exact decimal parsing).

use std::collections::HashSet;

use serde_json::{Map, Value};
use thiserror::Error;

use super::params::{ParamError, Params};
use crate::application::use_cases::{
    LinkFeedRequest, RunQueryRequest, SetRatioTargetRequest, UpdateBudgetRequest,
};
use crate::domain::bulk::{BulkOperationRequest, BulkTarget};
use crate::domain::provisioning::{
    AdjustmentType, BudgetAdjustment, BudgetInput, CampaignStatus, DateRange, FeedLink,
    ProvisioningError, ProvisioningRequest, ResumeFrom,
};
use crate::domain::resource_names::{CampaignRef, CustomerId, ResourceNameError};
use crate::domain::shared::{CampaignId, MerchantCenterId, Micros, ResourceName};

/// A parameter mapping could not be turned into a request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    /// Bad or missing parameter.
    #[error(transparent)]
    Param(#[from] ParamError),

    /// Bad identifier.
    #[error(transparent)]
    ResourceName(#[from] ResourceNameError),

    /// Inconsistent provisioning input.
    #[error(transparent)]
    Provisioning(#[from] ProvisioningError),
}

fn customer_id(p: &Params<'_>) -> Result<CustomerId, RequestError> {
    Ok(CustomerId::parse(p.required_str("account_id")?)?)
}

fn campaign_ref(p: &Params<'_>) -> Result<CampaignRef, RequestError> {
    if let Some(name) = p.str("campaign_resource_name")? {
        return Ok(CampaignRef::ResourceName(ResourceName::new(name)));
    }
    match p.str("campaign_id")? {
        Some(id) => Ok(CampaignRef::Id(CampaignId::new(id))),
        None => Err(ParamError::Missing("campaign_id or campaign_resource_name".to_string()).into()),
    }
}

fn micros(p: &Params<'_>, key: &str) -> Result<Option<Micros>, RequestError> {
    Ok(p.i64(key)?.map(Micros::new))
}

/// `provision-campaign`
pub fn provisioning_request(params: &Map<String, Value>) -> Result<ProvisioningRequest, RequestError> {
    let p = Params::new(params);

    let budget = BudgetInput::from_parts(
        p.i64("daily_budget_micros")?,
        p.decimal("daily_budget_currency")?,
    )?;
    let mut request =
        ProvisioningRequest::new(customer_id(&p)?, p.required_str("campaign_name")?, budget)?;

    if let Some(ratio) = p.f64("target_roas")? {
        request = request.with_ratio_target(ratio);
    }
    request = request.with_dates(DateRange::new(p.date("start_date")?, p.date("end_date")?)?);
    if let Some(status) = p.parsed::<CampaignStatus>("status")? {
        request = request.with_requested_status(status);
    }
    if let Some(url) = p.str("final_url")? {
        request = request.with_final_url(url, p.string("asset_group_name")?);
    }
    if let Some(merchant) = p.str("merchant_center_id")? {
        request = request.with_feed(FeedLink {
            merchant_center_id: MerchantCenterId::new(merchant),
            feed_label: p.string("feed_label")?,
        });
    }

    let resume = ResumeFrom {
        budget: p.str("resume_budget_resource_name")?.map(ResourceName::new),
        campaign: p.str("resume_campaign_resource_name")?.map(ResourceName::new),
    };

    Ok(request
        .with_targeting(p.string_list("country_codes")?, p.string_list("language_codes")?)
        .with_resume(resume))
}

/// `update-budget`
pub fn update_budget_request(params: &Map<String, Value>) -> Result<UpdateBudgetRequest, RequestError> {
    let p = Params::new(params);

    let kind = match p.str("adjustment_type")? {
        None => AdjustmentType::Set,
        Some(raw) => AdjustmentType::parse(raw).ok_or_else(|| ParamError::Invalid {
            field: "adjustment_type".to_string(),
            message: format!("unknown adjustment type {raw}"),
        })?,
    };

    let micros = p.i64("new_daily_budget_micros")?;
    let currency = p.decimal("new_daily_budget_currency")?;
    let new_amount = match (micros, currency) {
        (None, None) => None,
        (m, c) => Some(BudgetInput::from_parts(m, c)?),
    };

    Ok(UpdateBudgetRequest {
        customer_id: customer_id(&p)?,
        campaign: campaign_ref(&p)?,
        adjustment: BudgetAdjustment::from_parts(kind, new_amount, p.decimal("adjustment_value")?)?,
    })
}

/// `set-ratio-target`
pub fn set_ratio_target_request(
    params: &Map<String, Value>,
) -> Result<SetRatioTargetRequest, RequestError> {
    let p = Params::new(params);
    Ok(SetRatioTargetRequest {
        customer_id: customer_id(&p)?,
        campaign: campaign_ref(&p)?,
        ratio_target: p
            .f64("target_roas")?
            .ok_or_else(|| ParamError::Missing("target_roas".to_string()))?,
        cpc_bid_ceiling: micros(&p, "cpc_bid_ceiling_micros")?,
        cpc_bid_floor: micros(&p, "cpc_bid_floor_micros")?,
    })
}

fn bulk_target(p: &Params<'_>) -> Result<BulkTarget, RequestError> {
    if let Some(id) = p.str("campaign_id")? {
        return Ok(BulkTarget::Single(CampaignId::new(id)));
    }
    let ids = p.string_list("campaign_ids")?;
    if !ids.is_empty() {
        // First occurrence wins; order is kept.
        let mut seen = HashSet::new();
        let ids = ids
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .map(CampaignId::new)
            .collect();
        return Ok(BulkTarget::List(ids));
    }
    if let Some(name) = p.str("campaign_resource_name")? {
        return Ok(BulkTarget::ResourceName(ResourceName::new(name)));
    }
    if let Some(pattern) = p.str("campaign_name_pattern")? {
        return Ok(BulkTarget::Pattern(pattern.to_string()));
    }
    Err(ParamError::Missing(
        "campaign_id, campaign_ids, campaign_resource_name or campaign_name_pattern".to_string(),
    )
    .into())
}

/// `pause-campaign` and `enable-campaign`
pub fn bulk_request(
    params: &Map<String, Value>,
    status: CampaignStatus,
) -> Result<BulkOperationRequest, RequestError> {
    let p = Params::new(params);
    let cid = customer_id(&p)?;
    let target = bulk_target(&p)?;
    let confirm = p.bool("confirm")?.unwrap_or(false);

    Ok(match status {
        CampaignStatus::Paused => BulkOperationRequest::pause(cid, target, confirm),
        CampaignStatus::Enabled => BulkOperationRequest::enable(
            cid,
            target,
            confirm,
            p.bool("safety_check")?.unwrap_or(true),
        ),
    })
}

/// `link-feed`
pub fn link_feed_request(params: &Map<String, Value>) -> Result<LinkFeedRequest, RequestError> {
    let p = Params::new(params);
    Ok(LinkFeedRequest {
        customer_id: customer_id(&p)?,
        campaign: campaign_ref(&p)?,
        merchant_center_id: MerchantCenterId::new(p.required_str("merchant_center_id")?),
        feed_label: p.string("feed_label")?,
    })
}

/// `run-read-only-query`
pub fn run_query_request(params: &Map<String, Value>) -> Result<RunQueryRequest, RequestError> {
    let p = Params::new(params);
    Ok(RunQueryRequest {
        customer_id: customer_id(&p)?,
        query: p.required_str("query")?.to_string(),
        page_size: p.u32("page_size")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn provisioning_request_from_params() {
        let params = map(json!({
            "account_id": "123-456-7890",
            "campaign_name": "Summer",
            "daily_budget_currency": 1500,
            "target_roas": 4.0,
            "status": "ENABLED",
            "final_url": "https://example.com",
            "merchant_center_id": "998877",
            "feed_label": "promo",
            "start_date": "2025-11-01",
        }));

        let req = provisioning_request(&params).unwrap();

        assert_eq!(req.customer_id.as_str(), "1234567890");
        assert_eq!(req.budget.resolve().unwrap(), Micros::new(1_500_000_000));
        assert_eq!(req.ratio_target, Some(4.0));
        assert_eq!(req.requested_status, CampaignStatus::Enabled);
        assert_eq!(req.effective_asset_group_name(), "Summer Assets");
        assert_eq!(req.feed.unwrap().feed_label.as_deref(), Some("promo"));
        assert!(req.dates.start().is_some());
    }

    #[test]
    fn both_budget_forms_rejected() {
        let params = map(json!({
            "account_id": "1234567890",
            "campaign_name": "Summer",
            "daily_budget_currency": 10,
            "daily_budget_micros": 10_000_000,
        }));
        assert_eq!(
            provisioning_request(&params).unwrap_err(),
            RequestError::Provisioning(ProvisioningError::AmbiguousBudget)
        );
    }

    #[test]
    fn update_budget_defaults_to_set() {
        let params = map(json!({
            "account_id": "1234567890",
            "campaign_id": "42",
            "new_daily_budget_currency": 25.5,
        }));
        let req = update_budget_request(&params).unwrap();
        assert_eq!(
            req.adjustment,
            BudgetAdjustment::Set(BudgetInput::Currency(dec!(25.5)))
        );
    }

    #[test]
    fn update_budget_percent_needs_value() {
        let params = map(json!({
            "account_id": "1234567890",
            "campaign_id": "42",
            "adjustment_type": "INCREASE_BY_PERCENT",
        }));
        assert!(matches!(
            update_budget_request(&params),
            Err(RequestError::Provisioning(ProvisioningError::MissingAdjustmentValue(_)))
        ));
    }

    #[test]
    fn bulk_targets() {
        let params = map(json!({"account_id": "1234567890", "campaign_ids": ["1", "2"]}));
        let req = bulk_request(&params, CampaignStatus::Enabled).unwrap();
        assert_eq!(req.target, BulkTarget::List(vec![CampaignId::new("1"), CampaignId::new("2")]));
        assert!(req.safety_check);
        assert!(!req.confirm);

        let params = map(json!({
            "account_id": "1234567890",
            "campaign_name_pattern": "Summer*",
            "confirm": true,
        }));
        let req = bulk_request(&params, CampaignStatus::Paused).unwrap();
        assert!(req.target.is_pattern());
        assert!(req.confirm);
    }

    #[test]
    fn repeated_campaign_ids_collapse_in_order() {
        let params = map(json!({
            "account_id": "1234567890",
            "campaign_ids": ["7", "3", "7", "3", "9"],
        }));
        let req = bulk_request(&params, CampaignStatus::Paused).unwrap();
        assert_eq!(
            req.target,
            BulkTarget::List(vec![CampaignId::new("7"), CampaignId::new("3"), CampaignId::new("9")])
        );
    }

    #[test]
    fn campaign_resource_name_wins_over_id() {
        let params = map(json!({
            "account_id": "1234567890",
            "campaign_resource_name": "customers/1234567890/campaigns/9",
            "merchant_center_id": "1",
        }));
        let req = link_feed_request(&params).unwrap();
        assert!(matches!(req.campaign, CampaignRef::ResourceName(_)));
    }
}
