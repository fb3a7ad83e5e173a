//! Typed access to flat operation parameters.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use thiserror::Error;

/// A parameter is missing or has the wrong form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// Required key absent or null.
    #[error("Missing required parameter: {0}")]
    Missing(String),

    /// Present but unusable.
    #[error("Invalid parameter {field}: {message}")]
    Invalid {
        /// Parameter name.
        field: String,
        /// What is wrong with it.
        message: String,
    },
}

impl ParamError {
    fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Read-only view over a parameter mapping. `null` is treated as absent.
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    inner: &'a Map<String, Value>,
}

impl<'a> Params<'a> {
    /// Wrap a mapping.
    #[must_use]
    pub const fn new(inner: &'a Map<String, Value>) -> Self {
        Self { inner }
    }

    /// The underlying mapping.
    #[must_use]
    pub const fn raw(&self) -> &'a Map<String, Value> {
        self.inner
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.inner.get(key).filter(|v| !v.is_null())
    }

    /// Optional string.
    pub fn str(&self, key: &str) -> Result<Option<&'a str>, ParamError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(ParamError::invalid(key, "expected a string")),
        }
    }

    /// Required string.
    pub fn required_str(&self, key: &str) -> Result<&'a str, ParamError> {
        self.str(key)?
            .ok_or_else(|| ParamError::Missing(key.to_string()))
    }

    /// Optional owned string.
    pub fn string(&self, key: &str) -> Result<Option<String>, ParamError> {
        Ok(self.str(key)?.map(str::to_string))
    }

    /// Optional integer.
    pub fn i64(&self, key: &str) -> Result<Option<i64>, ParamError> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_i64()
                .map(Some)
                .ok_or_else(|| ParamError::invalid(key, "expected an integer")),
        }
    }

    /// Optional non-negative integer that fits in `u32`.
    pub fn u32(&self, key: &str) -> Result<Option<u32>, ParamError> {
        match self.i64(key)? {
            None => Ok(None),
            Some(v) => u32::try_from(v)
                .map(Some)
                .map_err(|_| ParamError::invalid(key, "out of range")),
        }
    }

    /// Optional float.
    pub fn f64(&self, key: &str) -> Result<Option<f64>, ParamError> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_f64()
                .map(Some)
                .ok_or_else(|| ParamError::invalid(key, "expected a number")),
        }
    }

    /// Optional exact decimal, parsed from the number's text.
    pub fn decimal(&self, key: &str) -> Result<Option<Decimal>, ParamError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => {
                let text = n.to_string();
                Decimal::from_str(&text)
                    .or_else(|_| Decimal::from_scientific(&text))
                    .map(Some)
                    .map_err(|e| ParamError::invalid(key, e.to_string()))
            }
            Some(_) => Err(ParamError::invalid(key, "expected a number")),
        }
    }

    /// Optional boolean.
    pub fn bool(&self, key: &str) -> Result<Option<bool>, ParamError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(ParamError::invalid(key, "expected a boolean")),
        }
    }

    /// Optional `YYYY-MM-DD` date.
    pub fn date(&self, key: &str) -> Result<Option<NaiveDate>, ParamError> {
        match self.str(key)? {
            None => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(Some)
                .map_err(|e| ParamError::invalid(key, e.to_string())),
        }
    }

    /// Optional list of strings; absent means empty.
    pub fn string_list(&self, key: &str) -> Result<Vec<String>, ParamError> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| ParamError::invalid(key, "expected an array of strings"))
                })
                .collect(),
            Some(_) => Err(ParamError::invalid(key, "expected an array of strings")),
        }
    }

    /// Optional value parsed with [`FromStr`].
    pub fn parsed<T>(&self, key: &str) -> Result<Option<T>, ParamError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.str(key)? {
            None => Ok(None),
            Some(s) => s
                .parse()
                .map(Some)
                .map_err(|e: T::Err| ParamError::invalid(key, e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn null_counts_as_absent() {
        let m = map(json!({"a": null}));
        let p = Params::new(&m);
        assert_eq!(p.str("a").unwrap(), None);
        assert_eq!(p.required_str("a"), Err(ParamError::Missing("a".to_string())));
    }

    #[test]
    fn decimal_keeps_exact_value() {
        let m = map(json!({"amount": 1500.25, "tiny": 1e-7}));
        let p = Params::new(&m);
        assert_eq!(p.decimal("amount").unwrap(), Some(dec!(1500.25)));
        assert_eq!(p.decimal("tiny").unwrap(), Some(dec!(0.0000001)));
    }

    #[test]
    fn wrong_types_are_invalid() {
        let m = map(json!({"n": "5", "b": 1, "l": [1, 2]}));
        let p = Params::new(&m);
        assert!(matches!(p.i64("n"), Err(ParamError::Invalid { .. })));
        assert!(matches!(p.bool("b"), Err(ParamError::Invalid { .. })));
        assert!(matches!(p.string_list("l"), Err(ParamError::Invalid { .. })));
    }

    #[test]
    fn dates_and_lists() {
        let m = map(json!({"d": "2025-11-01", "codes": ["TH", "US"], "page": 20}));
        let p = Params::new(&m);
        assert_eq!(
            p.date("d").unwrap(),
            NaiveDate::from_ymd_opt(2025, 11, 1)
        );
        assert_eq!(p.string_list("codes").unwrap(), vec!["TH", "US"]);
        assert_eq!(p.string_list("missing").unwrap(), Vec::<String>::new());
        assert_eq!(p.u32("page").unwrap(), Some(20));
    }
}
