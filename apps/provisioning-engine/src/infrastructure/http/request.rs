//! HTTP request parsing.

use serde_json::{Map, Value};

use crate::error::{ErrorCode, OperationError};

/// Parse an operation body into a flat parameter mapping.
///
/// An empty body is an empty mapping. Anything other than a JSON object is
/// a validation error.
pub fn parse_params(body: &[u8]) -> Result<Map<String, Value>, OperationError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(params)) => Ok(params),
        Ok(other) => Err(OperationError::new(
            ErrorCode::ValidationError,
            "Request body must be a JSON object",
        )
        .with_context("received", json_type(&other))),
        Err(e) => Err(OperationError::new(
            ErrorCode::ValidationError,
            format!("Request body is not valid JSON: {e}"),
        )),
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
