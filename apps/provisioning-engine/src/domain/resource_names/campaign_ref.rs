//! Single-campaign references.

use super::{CustomerId, ResourceNameError, campaign_resource_name, extract_trailing_id};
use crate::domain::shared::{CampaignId, ResourceName};

/// A campaign identified by id or by resource name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CampaignRef {
    /// Numeric id within the account.
    Id(CampaignId),
    /// Full resource name.
    ResourceName(ResourceName),
}

impl CampaignRef {
    /// Resolve to both the id and the resource name.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceNameError::MissingId`] if a resource name has no
    /// trailing numeric id.
    pub fn resolve(
        &self,
        customer_id: &CustomerId,
    ) -> Result<(CampaignId, ResourceName), ResourceNameError> {
        match self {
            Self::Id(id) => Ok((id.clone(), campaign_resource_name(customer_id, id.as_str()))),
            Self::ResourceName(name) => {
                let id = extract_trailing_id(name.as_str())?;
                Ok((CampaignId::new(id), name.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cid() -> CustomerId {
        CustomerId::parse("1234567890").unwrap()
    }

    #[test]
    fn id_builds_resource_name() {
        let (id, name) = CampaignRef::Id(CampaignId::new("42")).resolve(&cid()).unwrap();
        assert_eq!(id.as_str(), "42");
        assert_eq!(name.as_str(), "customers/1234567890/campaigns/42");
    }

    #[test]
    fn resource_name_yields_id() {
        let r = CampaignRef::ResourceName(ResourceName::new("customers/1234567890/campaigns/77"));
        let (id, _) = r.resolve(&cid()).unwrap();
        assert_eq!(id.as_str(), "77");
    }

    #[test]
    fn resource_name_without_id_rejected() {
        let r = CampaignRef::ResourceName(ResourceName::new("customers/1234567890/campaigns/"));
        assert!(matches!(r.resolve(&cid()), Err(ResourceNameError::MissingId(_))));
    }
}
