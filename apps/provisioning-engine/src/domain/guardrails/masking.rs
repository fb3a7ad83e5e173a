//! Sensitive-value masking for dry-run snapshots and log text.

use serde_json::{Map, Value};

/// Replacement for fully masked values.
const MASK: &str = "****";

/// Number of trailing characters left visible on identifiers.
const VISIBLE_SUFFIX: usize = 4;

const CREDENTIAL_MARKERS: [&str; 6] = [
    "token",
    "secret",
    "password",
    "authorization",
    "api_key",
    "credential",
];

/// Mask all but the last four characters with `*`.
///
/// Values of four characters or fewer are returned unchanged.
#[must_use]
pub fn mask_identifier(value: &str) -> String {
    let len = value.chars().count();
    if len <= VISIBLE_SUFFIX {
        return value.to_string();
    }
    let hidden = len - VISIBLE_SUFFIX;
    let suffix: String = value.chars().skip(hidden).collect();
    format!("{}{suffix}", "*".repeat(hidden))
}

fn is_identifier_field(key: &str) -> bool {
    key.ends_with("customer_id") || key.ends_with("account_id")
}

fn is_credential_field(key: &str) -> bool {
    CREDENTIAL_MARKERS.iter().any(|marker| key.contains(marker))
}

fn is_resource_name_field(key: &str) -> bool {
    key.ends_with("resource_name") || key.ends_with("resource_names")
}

/// Mask every purely numeric segment of a resource name.
fn mask_resource_name(name: &str) -> String {
    name.split('/')
        .map(|segment| {
            if !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()) {
                mask_identifier(segment)
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Mask a value stored under `key`, recursing into objects and arrays.
#[must_use]
pub fn mask_value(key: &str, value: &Value) -> Value {
    let key = key.to_ascii_lowercase();

    if is_credential_field(&key) {
        return match value {
            Value::Null => Value::Null,
            _ => Value::String(MASK.to_string()),
        };
    }

    match value {
        Value::Object(map) => Value::Object(mask_params(map)),
        Value::Array(items) => Value::Array(items.iter().map(|v| mask_value(&key, v)).collect()),
        Value::String(s) if is_identifier_field(&key) => Value::String(mask_identifier(s)),
        Value::Number(n) if is_identifier_field(&key) => {
            Value::String(mask_identifier(&n.to_string()))
        }
        Value::String(s) if is_resource_name_field(&key) => Value::String(mask_resource_name(s)),
        other => other.clone(),
    }
}

/// Mask a flat or nested parameter mapping.
#[must_use]
pub fn mask_params(params: &Map<String, Value>) -> Map<String, Value> {
    params
        .iter()
        .map(|(key, value)| (key.clone(), mask_value(key, value)))
        .collect()
}

/// Mask identifiers and credentials embedded in free-form text.
///
/// - ten-digit identifiers keep their first six digits
/// - `Bearer` tokens, `token: ...` and `Authorization: ...` values become `****`
#[must_use]
#[allow(clippy::expect_used)] // Regexes are compile-time constants; expect() is safe here
pub fn mask_sensitive_text(text: &str) -> String {
    use std::sync::OnceLock;

    static PATTERNS: OnceLock<Vec<(regex::Regex, &'static str)>> = OnceLock::new();

    let patterns = PATTERNS.get_or_init(|| {
        [
            (r"\b(\d{6})\d{4}\b", "${1}****"),
            (r"(Bearer\s+)[\w\-.~+/]+=*", "${1}****"),
            (
                r#"(?i)(authorization["']?\s*[:=]\s*["']?)[^"'\n,}]+"#,
                "${1}****",
            ),
            (
                r#"(?i)(token["']?\s*[:=]\s*["']?)[^"'\s,}]+"#,
                "${1}****",
            ),
        ]
        .into_iter()
        .map(|(pattern, replacement)| {
            (
                regex::Regex::new(pattern).expect("masking regex is valid"),
                replacement,
            )
        })
        .collect()
    });

    let mut masked = text.to_string();
    for (re, replacement) in patterns {
        masked = re.replace_all(&masked, *replacement).into_owned();
    }
    masked
}
