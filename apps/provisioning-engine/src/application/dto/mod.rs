//! Data Transfer Objects (DTOs)
//!
//! Flat parameter mappings arrive at the operation boundary; these helpers
//! turn them into typed use case requests.

mod params;
mod requests;

pub use params::{ParamError, Params};
pub use requests::{
    RequestError, bulk_request, link_feed_request, provisioning_request, run_query_request,
    set_ratio_target_request, update_budget_request,
};
