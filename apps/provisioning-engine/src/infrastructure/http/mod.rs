//! HTTP/REST API adapter.
//!
//! Inbound adapter exposing the named operations over axum.

mod controller;
mod request;
mod response;

pub use controller::{AppState, create_router};
pub use request::parse_params;
pub use response::*;
