//! REST Gateway Adapter
//!
//! Implementation of `MutationGatewayPort` and `QueryPort` over the remote
//! advertising API's JSON REST surface:
//! - One `{collection}:mutate` call per mutation, never retried
//! - `googleAds:search` for reads, retried with exponential backoff
//! - Developer token, bearer token and optional manager account headers

mod adapter;
mod api_types;
mod config;
mod error;
mod http_client;

pub use adapter::RestGateway;
pub use config::{RestGatewayConfig, RetryConfig};
pub use error::RestGatewayError;
