//! Shared Domain Types
//!
//! Value objects shared across bounded contexts.

pub mod value_objects;

pub use value_objects::{
    CampaignId, MICROS_PER_UNIT, MIN_BUDGET_MICROS, MerchantCenterId, Micros, MoneyError,
    OperationId, ResourceName,
};
