//! Strongly-typed identifiers for provisioned resources.
//!
//! These prevent mixing up IDs from different contexts.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier from a string.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

define_id!(
    ResourceName,
    "Opaque remote resource identifier (e.g. `customers/123/campaigns/456`)."
);
define_id!(CampaignId, "Numeric campaign identifier within an account.");
define_id!(MerchantCenterId, "Merchant Center account identifier.");

/// Correlation identifier for a single operation invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(String);

impl OperationId {
    /// Generate a new unique identifier using UUID v4.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_name_new_and_display() {
        let name = ResourceName::new("customers/1234567890/campaigns/42");
        assert_eq!(name.as_str(), "customers/1234567890/campaigns/42");
        assert_eq!(format!("{name}"), "customers/1234567890/campaigns/42");
    }

    #[test]
    fn campaign_id_from_string() {
        let id: CampaignId = "9876543210".into();
        assert_eq!(id.as_str(), "9876543210");

        let id: CampaignId = String::from("111").into();
        assert_eq!(id.into_inner(), "111");
    }

    #[test]
    fn operation_id_generate_is_unique() {
        let id1 = OperationId::generate();
        let id2 = OperationId::generate();
        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn identifiers_serialize_transparently() {
        let id = MerchantCenterId::new("123456789");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"123456789\"");
    }
}
