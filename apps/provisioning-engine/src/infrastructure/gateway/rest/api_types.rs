//! Remote API request and response types.
//!
//! These types map directly to the JSON REST surface: `{collection}:mutate`
//! bodies and `googleAds:search` rows. 64-bit integers travel as strings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Mutate envelope
// ============================================================================

/// Body of a `{collection}:mutate` call.
#[derive(Debug, Clone, Serialize)]
pub struct MutateRequest<T> {
    /// Operations to apply; this adapter always sends exactly one.
    pub operations: Vec<MutateOperation<T>>,
}

/// One create or update operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutateOperation<T> {
    /// Resource to create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create: Option<T>,
    /// Resource fields to update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<T>,
    /// Comma-separated field paths touched by `update`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_mask: Option<String>,
}

impl<T> MutateRequest<T> {
    /// Single create operation.
    pub fn create(resource: T) -> Self {
        Self {
            operations: vec![MutateOperation {
                create: Some(resource),
                update: None,
                update_mask: None,
            }],
        }
    }

    /// Single update operation.
    pub fn update(resource: T, mask: &str) -> Self {
        Self {
            operations: vec![MutateOperation {
                create: None,
                update: Some(resource),
                update_mask: Some(mask.to_string()),
            }],
        }
    }
}

/// Response of a `{collection}:mutate` call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MutateResponse {
    /// One entry per operation.
    #[serde(default)]
    pub results: Vec<MutateResult>,
}

/// Result of one operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutateResult {
    /// Affected resource.
    pub resource_name: String,
}

// ============================================================================
// Resources
// ============================================================================

/// New campaign budget.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResource {
    /// Budget name.
    pub name: String,
    /// Daily amount in micros.
    pub amount_micros: String,
    /// Always `STANDARD`.
    pub delivery_method: &'static str,
    /// Always false; each campaign owns its budget.
    pub explicitly_shared: bool,
}

/// Budget amount change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAmountUpdate {
    /// Budget to change.
    pub resource_name: String,
    /// New daily amount in micros.
    pub amount_micros: String,
}

/// Value-maximizing bid strategy settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaximizeConversionValue {
    /// Revenue-to-spend target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_roas: Option<f64>,
    /// CPC ceiling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpc_bid_ceiling_micros: Option<Int64>,
    /// CPC floor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpc_bid_floor_micros: Option<Int64>,
}

/// New campaign.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignResource {
    /// Campaign name.
    pub name: String,
    /// `PAUSED` or `ENABLED`.
    pub status: &'static str,
    /// Always `PERFORMANCE_MAX`.
    pub advertising_channel_type: &'static str,
    /// Budget resource name.
    pub campaign_budget: String,
    /// Bid strategy.
    pub maximize_conversion_value: MaximizeConversionValue,
    /// `YYYYMMDD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// `YYYYMMDD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Campaign status change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignStatusUpdate {
    /// Campaign to change.
    pub resource_name: String,
    /// `PAUSED` or `ENABLED`.
    pub status: &'static str,
}

/// Campaign bidding change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignBiddingUpdate {
    /// Campaign to change.
    pub resource_name: String,
    /// New bid strategy settings.
    pub maximize_conversion_value: MaximizeConversionValue,
}

/// Merchant feed settings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingSetting {
    /// Merchant Center account.
    pub merchant_id: String,
    /// Always true.
    pub enable_local: bool,
    /// Optional feed label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_label: Option<String>,
}

/// Campaign shopping-setting change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignShoppingUpdate {
    /// Campaign to change.
    pub resource_name: String,
    /// New shopping settings.
    pub shopping_setting: ShoppingSetting,
}

/// New asset group.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetGroupResource {
    /// Asset group name.
    pub name: String,
    /// Parent campaign resource name.
    pub campaign: String,
    /// Landing pages.
    pub final_urls: Vec<String>,
    /// Always `ENABLED`.
    pub status: &'static str,
}

// ============================================================================
// Search
// ============================================================================

/// Body of a `googleAds:search` call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Query text.
    pub query: String,
    /// Page size, when bounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

/// Response of a `googleAds:search` call.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Result rows.
    #[serde(default)]
    pub results: Vec<Value>,
    /// Token for the next page.
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// A row selecting campaign and budget fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRow {
    /// Campaign fields.
    #[serde(default)]
    pub campaign: CampaignFields,
    /// Budget fields.
    #[serde(default)]
    pub campaign_budget: Option<BudgetFields>,
}

/// Selected campaign fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignFields {
    /// Campaign id.
    #[serde(default)]
    pub id: Option<Int64>,
    /// Campaign name.
    #[serde(default)]
    pub name: Option<String>,
    /// Budget resource name.
    #[serde(default)]
    pub campaign_budget: Option<String>,
    /// Bid strategy settings.
    #[serde(default)]
    pub maximize_conversion_value: Option<MaximizeConversionValue>,
}

/// Selected budget fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetFields {
    /// Daily amount in micros.
    #[serde(default)]
    pub amount_micros: Option<Int64>,
}

/// A 64-bit integer that may arrive as a JSON string or number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Int64 {
    /// Canonical string encoding.
    Text(String),
    /// Plain number.
    Number(i64),
}

impl Int64 {
    /// Encode as the canonical string form.
    #[must_use]
    pub fn from_i64(value: i64) -> Self {
        Self::Text(value.to_string())
    }

    /// Decode, if well-formed.
    #[must_use]
    pub fn value(&self) -> Option<i64> {
        match self {
            Self::Text(s) => s.parse().ok(),
            Self::Number(n) => Some(*n),
        }
    }

    /// Decimal text form.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error envelope returned with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Error details.
    pub error: ApiErrorBody,
}

/// Error details.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Mirrors the HTTP status.
    #[serde(default)]
    #[allow(dead_code)]
    pub code: Option<u16>,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Canonical status string, e.g. `INVALID_ARGUMENT`.
    #[serde(default)]
    pub status: Option<String>,
}
