//! Resource Name Codec
//!
//! Builds and parses the opaque path-style identifiers the remote API uses
//! for accounts, budgets, campaigns and asset groups. Pure, no I/O.
//!
//! # Format
//!
//! ```text
//! customers/{customer_id}/{collection}/{resource_id}
//! ```

mod campaign_ref;
mod codec;
mod customer_id;
mod errors;

pub use campaign_ref::CampaignRef;
pub use codec::{
    MAX_CAMPAIGN_NAME_LEN, ParsedResourceName, ResourceKind, asset_group_resource_name,
    budget_resource_name, campaign_resource_name, extract_trailing_id, parse_resource_name,
    sanitize_campaign_name,
};
pub use customer_id::CustomerId;
pub use errors::ResourceNameError;
