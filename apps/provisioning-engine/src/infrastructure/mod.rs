//! Infrastructure Layer
//!
//! This module contains all adapters (implementations) for the ports defined
//! in the application layer. Following hexagonal architecture:
//!
//! - **Driven Adapters (Outbound)**: Implement ports for external systems
//!   - `gateway/`: remote advertising API (REST) and in-memory recording gateway
//!
//! - **Driver Adapters (Inbound)**: Expose application to external world
//!   - `http/`: REST API controller

pub mod gateway;
pub mod http;
