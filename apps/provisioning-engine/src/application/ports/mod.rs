//! Application Ports (Driver and Driven)
//!
//! Ports define interfaces for interacting with external systems.
//! - **Driven Ports** (Secondary/Outbound): How our application uses the remote API

mod mutation_gateway_port;
mod query_port;

pub use mutation_gateway_port::{
    AssetGroupSpec, BiddingUpdateSpec, BudgetSpec, BudgetUpdateSpec, CampaignSpec, FeedLinkSpec,
    GatewayError, MutationAck, MutationGatewayPort,
};
pub use query_port::{CampaignBiddingInfo, CampaignBudgetInfo, CampaignSummary, QueryPort, QueryRows};
