//! Shared Value Objects
//!
//! Immutable domain types used across bounded contexts.
//! Value objects are compared by value, not identity.

mod identifiers;
mod micros;

pub use identifiers::{CampaignId, MerchantCenterId, OperationId, ResourceName};
pub use micros::{MICROS_PER_UNIT, MIN_BUDGET_MICROS, Micros, MoneyError};
