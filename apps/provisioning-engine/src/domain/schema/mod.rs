//! Parameter Schemas
//!
//! Declarative shapes for the flat parameter mappings each operation
//! accepts, and one generic validator that interprets them.
//!
//! Validation is fail-fast: the first violated constraint is reported.
//! `null` values are treated as absent.

mod catalog;
mod errors;
mod shape;
mod validator;

pub use catalog::{find_shape, required_fields, shape_names};
pub use errors::SchemaError;
pub use shape::{Constraint, FieldRule, FieldType, GroupKind, GroupRule, Shape};
pub use validator::validate;
