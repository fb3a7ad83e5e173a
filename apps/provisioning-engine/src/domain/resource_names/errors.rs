//! Resource name errors.

use thiserror::Error;

/// Errors building or parsing resource identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceNameError {
    /// Customer identifier contains no digits or too many.
    #[error("Invalid customer id '{0}': expected up to 10 digits")]
    InvalidCustomerId(String),

    /// Resource name has fewer segments than `customers/{cid}/{kind}/{id}`.
    #[error("Invalid resource name format: '{0}'")]
    Malformed(String),

    /// Resource name does not end in a numeric identifier.
    #[error("Resource name '{0}' has no trailing numeric id")]
    MissingId(String),

    /// Campaign name is empty after trimming.
    #[error("Campaign name cannot be empty")]
    EmptyCampaignName,
}
