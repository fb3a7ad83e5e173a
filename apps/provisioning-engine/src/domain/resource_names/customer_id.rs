//! Account (customer) identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ResourceNameError;
use crate::domain::guardrails::mask_identifier;

/// Number of digits in a canonical customer id.
const CUSTOMER_ID_DIGITS: usize = 10;

/// A ten-digit account identifier.
///
/// Accepts the common human spellings (`123-456-7890`, `"1234567890"`) and
/// normalizes them by dropping every non-digit and left-padding with zeros.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CustomerId(String);

impl CustomerId {
    /// Normalize a raw customer id.
    ///
    /// # Errors
    ///
    /// Returns an error if the input has no digits or more than ten.
    pub fn parse(raw: &str) -> Result<Self, ResourceNameError> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

        if digits.is_empty() || digits.len() > CUSTOMER_ID_DIGITS {
            return Err(ResourceNameError::InvalidCustomerId(raw.to_string()));
        }

        Ok(Self(format!(
            "{digits:0>width$}",
            width = CUSTOMER_ID_DIGITS
        )))
    }

    /// The canonical ten-digit form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id with all but the last four digits replaced by `*`.
    #[must_use]
    pub fn masked(&self) -> String {
        mask_identifier(&self.0)
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CustomerId {
    type Error = ResourceNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CustomerId> for String {
    fn from(value: CustomerId) -> Self {
        value.0
    }
}
