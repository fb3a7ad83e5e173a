//! Schema validation errors.

use thiserror::Error;

/// First constraint a parameter set violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// No shape registered under this name.
    #[error("Unknown schema '{0}'")]
    UnknownShape(String),

    /// Required field missing or null.
    #[error("Missing required field '{0}'")]
    MissingField(String),

    /// Alternative group supplied with the wrong number of members.
    #[error("{message}")]
    Group {
        /// Members of the group.
        fields: Vec<String>,
        /// Explanation naming the group.
        message: String,
    },

    /// Field has the wrong JSON type.
    #[error("Field '{field}' must be {expected}")]
    WrongType {
        /// Field name.
        field: String,
        /// Expected type description.
        expected: String,
    },

    /// String does not match the declared pattern.
    #[error("Field '{field}' does not match pattern {pattern}")]
    PatternMismatch {
        /// Field name.
        field: String,
        /// Pattern source.
        pattern: String,
    },

    /// Any other constraint failure (range, length, enum, date).
    #[error("Field '{field}' {message}")]
    Invalid {
        /// Field name.
        field: String,
        /// What was wrong.
        message: String,
    },
}

impl SchemaError {
    /// The field the error refers to, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField(field) => Some(field),
            Self::WrongType { field, .. }
            | Self::PatternMismatch { field, .. }
            | Self::Invalid { field, .. } => Some(field),
            Self::UnknownShape(_) | Self::Group { .. } => None,
        }
    }
}
