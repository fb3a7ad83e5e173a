//! Gateway adapters for the remote advertising API.
//!
//! - `rest/`: HTTP adapter used in production
//! - `in_memory`: recording adapter for tests and local runs

mod in_memory;
pub mod rest;

pub use in_memory::{GatewayCall, InMemoryGateway, StoredCampaign};
pub use rest::{RestGateway, RestGatewayConfig, RestGatewayError};
