//! Application Layer
//!
//! The application layer orchestrates domain logic through use cases.
//! It defines:
//!
//! - **Ports**: Interfaces for interacting with external systems
//! - **Use Cases**: Application-specific business rules
//! - **DTOs**: Conversion of flat operation parameters into typed requests
//! - **Operations**: The named operation surface and its dispatcher

pub mod dto;
pub mod operations;
pub mod ports;
pub mod use_cases;

pub use operations::{Operation, OperationDispatcher, OperationResponse};
pub use ports::*;
pub use use_cases::*;
