//! Building and parsing resource names.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{CustomerId, ResourceNameError};
use crate::domain::shared::ResourceName;

/// Maximum campaign name length accepted by the remote API.
pub const MAX_CAMPAIGN_NAME_LEN: usize = 255;

/// Collection segment of a resource name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// `campaignBudgets`
    CampaignBudget,
    /// `campaigns`
    Campaign,
    /// `assetGroups`
    AssetGroup,
    /// Any collection this service does not create itself.
    Other(String),
}

impl ResourceKind {
    /// The path segment naming this collection.
    #[must_use]
    pub fn collection(&self) -> &str {
        match self {
            Self::CampaignBudget => "campaignBudgets",
            Self::Campaign => "campaigns",
            Self::AssetGroup => "assetGroups",
            Self::Other(name) => name,
        }
    }

    fn from_collection(segment: &str) -> Self {
        match segment {
            "campaignBudgets" => Self::CampaignBudget,
            "campaigns" => Self::Campaign,
            "assetGroups" => Self::AssetGroup,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

/// Structured form of a resource name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResourceName {
    /// Owning account.
    pub customer_id: CustomerId,
    /// Collection the resource lives in.
    pub kind: ResourceKind,
    /// Identifier within the collection.
    pub resource_id: String,
}

impl ParsedResourceName {
    /// Rebuild the canonical resource name.
    #[must_use]
    pub fn to_resource_name(&self) -> ResourceName {
        build(&self.customer_id, &self.kind, &self.resource_id)
    }
}

fn build(customer_id: &CustomerId, kind: &ResourceKind, id: &str) -> ResourceName {
    ResourceName::new(format!(
        "customers/{}/{}/{}",
        customer_id,
        kind.collection(),
        id
    ))
}

/// `customers/{cid}/campaignBudgets/{id}`
#[must_use]
pub fn budget_resource_name(customer_id: &CustomerId, budget_id: &str) -> ResourceName {
    build(customer_id, &ResourceKind::CampaignBudget, budget_id)
}

/// `customers/{cid}/campaigns/{id}`
#[must_use]
pub fn campaign_resource_name(customer_id: &CustomerId, campaign_id: &str) -> ResourceName {
    build(customer_id, &ResourceKind::Campaign, campaign_id)
}

/// `customers/{cid}/assetGroups/{id}`
#[must_use]
pub fn asset_group_resource_name(customer_id: &CustomerId, asset_group_id: &str) -> ResourceName {
    build(customer_id, &ResourceKind::AssetGroup, asset_group_id)
}

/// Parse a resource name into its components.
///
/// # Errors
///
/// Returns [`ResourceNameError::Malformed`] if the name has fewer than four
/// segments, an empty id, or an unparseable customer id.
pub fn parse_resource_name(name: &str) -> Result<ParsedResourceName, ResourceNameError> {
    let parts: Vec<&str> = name.split('/').collect();
    if parts.len() < 4 || parts[3].is_empty() {
        return Err(ResourceNameError::Malformed(name.to_string()));
    }

    let customer_id =
        CustomerId::parse(parts[1]).map_err(|_| ResourceNameError::Malformed(name.to_string()))?;

    Ok(ParsedResourceName {
        customer_id,
        kind: ResourceKind::from_collection(parts[2]),
        resource_id: parts[3].to_string(),
    })
}

/// Extract the trailing numeric id from a resource name.
///
/// # Errors
///
/// Returns [`ResourceNameError::MissingId`] if the last segment is not numeric.
pub fn extract_trailing_id(name: &str) -> Result<String, ResourceNameError> {
    let last = name.rsplit('/').next().unwrap_or_default();
    if last.is_empty() || !last.chars().all(|c| c.is_ascii_digit()) {
        return Err(ResourceNameError::MissingId(name.to_string()));
    }
    Ok(last.to_string())
}

/// Trim a campaign name and cap it at [`MAX_CAMPAIGN_NAME_LEN`] characters.
///
/// # Errors
///
/// Returns [`ResourceNameError::EmptyCampaignName`] if nothing remains after trimming.
pub fn sanitize_campaign_name(name: &str) -> Result<String, ResourceNameError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ResourceNameError::EmptyCampaignName);
    }
    Ok(trimmed.chars().take(MAX_CAMPAIGN_NAME_LEN).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cid() -> CustomerId {
        CustomerId::parse("1234567890").unwrap()
    }

    #[test]
    fn builds_each_kind() {
        assert_eq!(
            budget_resource_name(&cid(), "11").as_str(),
            "customers/1234567890/campaignBudgets/11"
        );
        assert_eq!(
            campaign_resource_name(&cid(), "22").as_str(),
            "customers/1234567890/campaigns/22"
        );
        assert_eq!(
            asset_group_resource_name(&cid(), "33").as_str(),
            "customers/1234567890/assetGroups/33"
        );
    }

    #[test]
    fn parse_round_trips_known_kind() {
        let parsed = parse_resource_name("customers/1234567890/campaigns/22").unwrap();
        assert_eq!(parsed.customer_id, cid());
        assert_eq!(parsed.kind, ResourceKind::Campaign);
        assert_eq!(parsed.resource_id, "22");
        assert_eq!(
            parsed.to_resource_name().as_str(),
            "customers/1234567890/campaigns/22"
        );
    }

    #[test]
    fn parse_unknown_kind() {
        let parsed = parse_resource_name("customers/1234567890/adGroups/5").unwrap();
        assert_eq!(parsed.kind, ResourceKind::Other("adGroups".to_string()));
    }

    #[test]
    fn parse_rejects_short_names() {
        assert!(matches!(
            parse_resource_name("customers/1234567890/campaigns"),
            Err(ResourceNameError::Malformed(_))
        ));
        assert!(parse_resource_name("").is_err());
        assert!(parse_resource_name("customers/1234567890/campaigns/").is_err());
    }

    #[test]
    fn extract_trailing_id_requires_digits() {
        assert_eq!(
            extract_trailing_id("customers/1234567890/campaigns/987").unwrap(),
            "987"
        );
        assert!(extract_trailing_id("customers/1234567890/campaigns/abc").is_err());
        assert!(extract_trailing_id("customers/1234567890/campaigns/").is_err());
    }

    #[test]
    fn sanitize_trims_and_truncates() {
        assert_eq!(sanitize_campaign_name("  Summer  ").unwrap(), "Summer");
        assert_eq!(
            sanitize_campaign_name(&"x".repeat(300)).unwrap().len(),
            MAX_CAMPAIGN_NAME_LEN
        );
        assert_eq!(
            sanitize_campaign_name("   "),
            Err(ResourceNameError::EmptyCampaignName)
        );
    }
}
