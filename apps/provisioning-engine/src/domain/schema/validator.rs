//! Generic shape interpreter.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::{Constraint, FieldRule, FieldType, GroupKind, SchemaError, Shape, find_shape};

/// Validate `params` against the named shape.
///
/// Pure and deterministic. Order of checks: required fields, alternative
/// groups, then each declared field (type first, then its constraints).
/// Undeclared extra keys are accepted.
pub fn validate(shape_name: &str, params: &Map<String, Value>) -> Result<(), SchemaError> {
    let shape =
        find_shape(shape_name).ok_or_else(|| SchemaError::UnknownShape(shape_name.to_string()))?;
    validate_shape(shape, params)
}

fn present<'a>(params: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    params.get(name).filter(|value| !value.is_null())
}

fn validate_shape(shape: &Shape, params: &Map<String, Value>) -> Result<(), SchemaError> {
    for rule in shape.fields.iter().filter(|f| f.required) {
        if present(params, rule.name).is_none() {
            return Err(SchemaError::MissingField(rule.name.to_string()));
        }
    }

    for group in &shape.groups {
        let supplied = group
            .fields
            .iter()
            .filter(|name| present(params, name).is_some())
            .count();
        let listed = group.fields.join(", ");
        let message = match group.kind {
            GroupKind::ExactlyOne if supplied == 0 => {
                Some(format!("Exactly one of [{listed}] is required, none supplied"))
            }
            GroupKind::ExactlyOne | GroupKind::AtMostOne if supplied > 1 => Some(format!(
                "Only one of [{listed}] may be supplied, got {supplied}"
            )),
            _ => None,
        };
        if let Some(message) = message {
            return Err(SchemaError::Group {
                fields: group.fields.iter().map(ToString::to_string).collect(),
                message,
            });
        }
    }

    for rule in &shape.fields {
        if let Some(value) = present(params, rule.name) {
            check_field(rule, value)?;
        }
    }

    Ok(())
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0),
        _ => false,
    }
}

fn check_type(rule: &FieldRule, value: &Value) -> Result<(), SchemaError> {
    let ok = match rule.field_type {
        FieldType::String => value.is_string(),
        FieldType::Integer => is_integer(value),
        FieldType::Number => value.is_number(),
        FieldType::Boolean => value.is_boolean(),
        FieldType::StringArray => value
            .as_array()
            .is_some_and(|items| items.iter().all(Value::is_string)),
    };
    if ok {
        Ok(())
    } else {
        Err(SchemaError::WrongType {
            field: rule.name.to_string(),
            expected: rule.field_type.describe().to_string(),
        })
    }
}

fn invalid(rule: &FieldRule, message: impl Into<String>) -> SchemaError {
    SchemaError::Invalid {
        field: rule.name.to_string(),
        message: message.into(),
    }
}

fn check_field(rule: &FieldRule, value: &Value) -> Result<(), SchemaError> {
    check_type(rule, value)?;

    let strings: Vec<&str> = match value {
        Value::String(s) => vec![s.as_str()],
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    };

    for constraint in &rule.constraints {
        match constraint {
            Constraint::Pattern(re) => {
                if let Some(bad) = strings.iter().find(|s| !re.is_match(s)) {
                    tracing::debug!(field = rule.name, len = bad.len(), "Pattern mismatch");
                    return Err(SchemaError::PatternMismatch {
                        field: rule.name.to_string(),
                        pattern: re.as_str().to_string(),
                    });
                }
            }
            Constraint::Length { min, max } => {
                for s in &strings {
                    let len = s.chars().count();
                    if len < *min || len > *max {
                        return Err(invalid(
                            rule,
                            format!("must be between {min} and {max} characters, got {len}"),
                        ));
                    }
                }
            }
            Constraint::Range {
                min,
                max,
                exclusive_min,
            } => {
                let Some(n) = value.as_f64() else { continue };
                if let Some(min) = min {
                    let below = if *exclusive_min { n <= *min } else { n < *min };
                    if below {
                        let op = if *exclusive_min { ">" } else { ">=" };
                        return Err(invalid(rule, format!("must be {op} {min}, got {n}")));
                    }
                }
                if let Some(max) = max
                    && n > *max
                {
                    return Err(invalid(rule, format!("must be <= {max}, got {n}")));
                }
            }
            Constraint::OneOf(allowed) => {
                if let Some(bad) = strings.iter().find(|s| !allowed.contains(s)) {
                    return Err(invalid(
                        rule,
                        format!("must be one of [{}], got '{bad}'", allowed.join(", ")),
                    ));
                }
            }
            Constraint::Date => {
                for s in &strings {
                    let well_formed = s.len() == 10
                        && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok();
                    if !well_formed {
                        return Err(invalid(rule, format!("must be a YYYY-MM-DD date, got '{s}'")));
                    }
                }
            }
            Constraint::NonEmpty => {
                if value.as_array().is_some_and(Vec::is_empty) {
                    return Err(invalid(rule, "must not be empty"));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use test_case::test_case;

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn minimal_pmax() -> Value {
        json!({
            "account_id": "1234567890",
            "campaign_name": "Test Campaign",
            "daily_budget_micros": 1_500_000_000_i64,
        })
    }

    #[test]
    fn create_pmax_minimal_is_valid() {
        assert_eq!(validate("create_pmax", &params(minimal_pmax())), Ok(()));
    }

    #[test]
    fn create_pmax_with_currency_is_valid() {
        let p = json!({
            "account_id": "1234567890",
            "campaign_name": "Test Campaign",
            "daily_budget_currency": 1500,
        });
        assert!(validate("create_pmax", &params(p)).is_ok());
    }

    #[test]
    fn create_pmax_full_is_valid() {
        let p = json!({
            "account_id": "1234567890",
            "campaign_name": "Test Campaign",
            "daily_budget_micros": 1_500_000_000_i64,
            "target_roas": 2.5,
            "merchant_center_id": "123456789",
            "feed_label": "promo_nov2025",
            "start_date": "2025-11-10",
            "status": "PAUSED",
            "final_url": "https://shop.example.com",
            "country_codes": ["TH"],
            "language_codes": ["th"],
        });
        assert!(validate("create_pmax", &params(p)).is_ok());
    }

    #[test]
    fn missing_required_names_field() {
        let mut p = params(minimal_pmax());
        p.remove("campaign_name");
        let err = validate("create_pmax", &p).unwrap_err();
        assert_eq!(err, SchemaError::MissingField("campaign_name".to_string()));
        assert!(err.to_string().contains("campaign_name"));
    }

    #[test]
    fn null_counts_as_missing() {
        let mut p = params(minimal_pmax());
        p.insert("campaign_name".to_string(), Value::Null);
        assert!(matches!(
            validate("create_pmax", &p),
            Err(SchemaError::MissingField(_))
        ));
    }

    #[test]
    fn both_budget_forms_rejected() {
        let mut p = params(minimal_pmax());
        p.insert("daily_budget_currency".to_string(), json!(1500));
        assert!(matches!(
            validate("create_pmax", &p),
            Err(SchemaError::Group { .. })
        ));
    }

    #[test]
    fn neither_budget_form_rejected() {
        let mut p = params(minimal_pmax());
        p.remove("daily_budget_micros");
        assert!(matches!(
            validate("create_pmax", &p),
            Err(SchemaError::Group { .. })
        ));
    }

    #[test_case("create_pmax", "account_id", json!("123") ; "short account id")]
    #[test_case("create_pmax", "start_date", json!("2025/11/10") ; "slashed date")]
    #[test_case("create_pmax", "start_date", json!("2025-02-30") ; "impossible date")]
    #[test_case("create_pmax", "status", json!("REMOVED") ; "unknown status")]
    #[test_case("create_pmax", "daily_budget_micros", json!(999_999) ; "budget below one unit")]
    #[test_case("create_pmax", "daily_budget_micros", json!("1500000000") ; "budget as string")]
    #[test_case("create_pmax", "target_roas", json!(0) ; "zero ratio")]
    #[test_case("create_pmax", "target_roas", json!("2.5") ; "ratio as string")]
    #[test_case("create_pmax", "country_codes", json!(["tha"]) ; "bad country")]
    #[test_case("create_pmax", "campaign_name", json!("") ; "empty name")]
    #[test_case("create_pmax", "final_url", json!("shop.example.com") ; "url without scheme")]
    fn create_pmax_rejects(shape: &str, field: &str, value: Value) {
        let mut p = params(minimal_pmax());
        p.insert(field.to_string(), value);
        let err = validate(shape, &p).unwrap_err();
        assert_eq!(err.field(), Some(field));
    }

    #[test]
    fn update_budget_variants() {
        let set = json!({
            "account_id": "1234567890",
            "campaign_id": "9876543210",
            "new_daily_budget_micros": 2_000_000_000_i64,
        });
        let percent = json!({
            "account_id": "1234567890",
            "campaign_id": "9876543210",
            "adjustment_type": "INCREASE_BY_PERCENT",
            "adjustment_value": 20,
        });
        let by_name = json!({
            "account_id": "1234567890",
            "campaign_resource_name": "customers/1234567890/campaigns/9876543210",
            "new_daily_budget_currency": 2000,
        });
        for p in [set, percent, by_name] {
            assert!(validate("update_budget", &params(p)).is_ok());
        }
    }

    #[test_case(json!(0.001), true ; "below default floor")]
    #[test_case(json!(150), true ; "above default ceiling")]
    #[test_case(json!(0), false ; "zero")]
    #[test_case(json!(-1.5), false ; "negative")]
    fn set_target_roas_checks_only_positivity(ratio: Value, ok: bool) {
        let p = json!({
            "account_id": "1234567890",
            "campaign_id": "9876543210",
            "target_roas": ratio,
        });
        assert_eq!(validate("set_target_roas", &params(p)).is_ok(), ok);
    }

    #[test]
    fn currency_budget_shares_the_one_unit_floor() {
        let mut p = params(minimal_pmax());
        p.remove("daily_budget_micros");
        p.insert("daily_budget_currency".to_string(), json!(0.5));
        let err = validate("create_pmax", &p).unwrap_err();
        assert_eq!(err.field(), Some("daily_budget_currency"));

        p.insert("daily_budget_currency".to_string(), json!(1));
        assert!(validate("create_pmax", &p).is_ok());
    }

    #[test]
    fn pause_requires_one_target_form() {
        let none = json!({ "account_id": "1234567890" });
        let two = json!({
            "account_id": "1234567890",
            "campaign_id": "1",
            "campaign_name_pattern": "Summer*",
        });
        let empty_list = json!({ "account_id": "1234567890", "campaign_ids": [] });
        assert!(validate("pause_campaign", &params(none)).is_err());
        assert!(validate("pause_campaign", &params(two)).is_err());
        assert!(validate("pause_campaign", &params(empty_list)).is_err());
    }

    #[test]
    fn attach_merchant_center_rejects_lowercase_country() {
        let p = json!({
            "account_id": "1234567890",
            "merchant_center_id": "123456789",
            "campaign_id": "1",
            "sales_country": "th",
        });
        let err = validate("attach_merchant_center", &params(p)).unwrap_err();
        assert_eq!(err.field(), Some("sales_country"));
    }

    #[test]
    fn query_page_size_bounds() {
        let ok = json!({ "account_id": "1234567890", "query": "SELECT campaign.id FROM campaign", "page_size": 10_000 });
        let too_big = json!({ "account_id": "1234567890", "query": "SELECT campaign.id FROM campaign", "page_size": 10_001 });
        assert!(validate("run_gaql_query", &params(ok)).is_ok());
        assert!(validate("run_gaql_query", &params(too_big)).is_err());
    }

    #[test]
    fn unknown_shape_rejected() {
        assert_eq!(
            validate("nonexistent_schema", &Map::new()),
            Err(SchemaError::UnknownShape("nonexistent_schema".to_string()))
        );
    }

    #[test]
    fn extra_keys_are_accepted() {
        let mut p = params(minimal_pmax());
        p.insert("note".to_string(), json!("anything"));
        assert!(validate("create_pmax", &p).is_ok());
    }

    proptest! {
        #[test]
        fn validation_is_deterministic(
            account in "[0-9]{0,12}",
            name in ".{0,20}",
            budget in proptest::option::of(-10_i64..3_000_000_000),
        ) {
            let mut p = Map::new();
            p.insert("account_id".to_string(), json!(account));
            p.insert("campaign_name".to_string(), json!(name));
            if let Some(b) = budget {
                p.insert("daily_budget_micros".to_string(), json!(b));
            }
            prop_assert_eq!(validate("create_pmax", &p), validate("create_pmax", &p));
        }
    }
}
