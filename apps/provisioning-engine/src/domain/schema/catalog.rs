//! Built-in operation shapes.

use std::sync::OnceLock;

use super::{FieldRule, Shape};

const ACCOUNT_ID_PATTERN: &str = r"^\d{10}$";
const NUMERIC_ID_PATTERN: &str = r"^\d+$";
const COUNTRY_PATTERN: &str = r"^[A-Z]{2}$";
const LANGUAGE_PATTERN: &str = r"^[a-z]{2}$";

const STATUSES: &[&str] = &["PAUSED", "ENABLED"];
const ADJUSTMENT_TYPES: &[&str] = &[
    "SET",
    "INCREASE_BY_PERCENT",
    "DECREASE_BY_PERCENT",
    "INCREASE_BY_AMOUNT",
    "DECREASE_BY_AMOUNT",
];

const MIN_BUDGET_MICROS: f64 = 1_000_000.0;
const MIN_BUDGET_CURRENCY: f64 = 1.0;
const MAX_PAGE_SIZE: f64 = 10_000.0;

fn account_id() -> FieldRule {
    FieldRule::string("account_id")
        .required()
        .pattern(ACCOUNT_ID_PATTERN)
}

fn campaign_id() -> FieldRule {
    FieldRule::string("campaign_id").pattern(NUMERIC_ID_PATTERN)
}

fn campaign_resource_name() -> FieldRule {
    FieldRule::string("campaign_resource_name").pattern(r"^customers/\d+/campaigns/\d+$")
}

fn create_pmax() -> Shape {
    Shape::new("create_pmax")
        .field(account_id())
        .field(FieldRule::string("campaign_name").required().length(1, 255))
        .field(FieldRule::integer("daily_budget_micros").at_least(MIN_BUDGET_MICROS))
        .field(FieldRule::number("daily_budget_currency").at_least(MIN_BUDGET_CURRENCY))
        .field(FieldRule::number("target_roas").positive())
        .field(FieldRule::string("merchant_center_id").pattern(NUMERIC_ID_PATTERN))
        .field(FieldRule::string("feed_label").length(1, 100))
        .field(FieldRule::string("start_date").date())
        .field(FieldRule::string("end_date").date())
        .field(FieldRule::string("status").one_of(STATUSES))
        .field(FieldRule::string("final_url").pattern(r"^https?://\S+$"))
        .field(FieldRule::string("asset_group_name").length(1, 255))
        .field(FieldRule::string_array("country_codes").pattern(COUNTRY_PATTERN))
        .field(FieldRule::string_array("language_codes").pattern(LANGUAGE_PATTERN))
        .field(FieldRule::string("resume_budget_resource_name").pattern(r"^customers/\d+/campaignBudgets/\d+$"))
        .field(FieldRule::string("resume_campaign_resource_name").pattern(r"^customers/\d+/campaigns/\d+$"))
        .exactly_one_of(&["daily_budget_micros", "daily_budget_currency"])
}

fn update_budget() -> Shape {
    Shape::new("update_budget")
        .field(account_id())
        .field(campaign_id())
        .field(campaign_resource_name())
        .field(FieldRule::string("adjustment_type").one_of(ADJUSTMENT_TYPES))
        .field(FieldRule::integer("new_daily_budget_micros").at_least(MIN_BUDGET_MICROS))
        .field(FieldRule::number("new_daily_budget_currency").at_least(MIN_BUDGET_CURRENCY))
        .field(FieldRule::number("adjustment_value").at_least(0.0))
        .exactly_one_of(&["campaign_id", "campaign_resource_name"])
        .at_most_one_of(&["new_daily_budget_micros", "new_daily_budget_currency"])
}

fn set_target_roas() -> Shape {
    Shape::new("set_target_roas")
        .field(account_id())
        .field(FieldRule::number("target_roas").required().positive())
        .field(campaign_id())
        .field(campaign_resource_name())
        .field(FieldRule::integer("cpc_bid_ceiling_micros").at_least(0.0))
        .field(FieldRule::integer("cpc_bid_floor_micros").at_least(0.0))
        .exactly_one_of(&["campaign_id", "campaign_resource_name"])
}

fn status_change(name: &'static str, with_safety_check: bool) -> Shape {
    let shape = Shape::new(name)
        .field(account_id())
        .field(campaign_id())
        .field(
            FieldRule::string_array("campaign_ids")
                .non_empty()
                .pattern(NUMERIC_ID_PATTERN),
        )
        .field(campaign_resource_name())
        .field(FieldRule::string("campaign_name_pattern").length(1, 255))
        .field(FieldRule::boolean("confirm"))
        .exactly_one_of(&[
            "campaign_id",
            "campaign_ids",
            "campaign_resource_name",
            "campaign_name_pattern",
        ]);

    if with_safety_check {
        shape.field(FieldRule::boolean("safety_check"))
    } else {
        shape
    }
}

fn attach_merchant_center() -> Shape {
    Shape::new("attach_merchant_center")
        .field(account_id())
        .field(
            FieldRule::string("merchant_center_id")
                .required()
                .pattern(NUMERIC_ID_PATTERN),
        )
        .field(campaign_id())
        .field(campaign_resource_name())
        .field(FieldRule::string("feed_label").length(1, 100))
        .field(FieldRule::string("sales_country").pattern(COUNTRY_PATTERN))
        .field(FieldRule::string("language_code").pattern(LANGUAGE_PATTERN))
        .field(FieldRule::string("asset_group_id").pattern(NUMERIC_ID_PATTERN))
        .field(FieldRule::boolean("replace_existing"))
        .exactly_one_of(&["campaign_id", "campaign_resource_name"])
}

fn run_gaql_query() -> Shape {
    Shape::new("run_gaql_query")
        .field(account_id())
        .field(FieldRule::string("query").required().length(1, 100_000))
        .field(FieldRule::integer("page_size").range(1.0, MAX_PAGE_SIZE))
}

fn catalog() -> &'static [Shape] {
    static CATALOG: OnceLock<Vec<Shape>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        vec![
            create_pmax(),
            update_budget(),
            set_target_roas(),
            status_change("pause_campaign", false),
            status_change("enable_campaign", true),
            attach_merchant_center(),
            run_gaql_query(),
        ]
    })
}

/// Look up a shape by name.
#[must_use]
pub fn find_shape(name: &str) -> Option<&'static Shape> {
    catalog().iter().find(|shape| shape.name == name)
}

/// Names of every registered shape.
#[must_use]
pub fn shape_names() -> Vec<&'static str> {
    catalog().iter().map(|shape| shape.name).collect()
}

/// Required fields of a shape, or `None` if the shape is unknown.
#[must_use]
pub fn required_fields(name: &str) -> Option<Vec<&'static str>> {
    find_shape(name).map(Shape::required_fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_all_shapes() {
        let names = shape_names();
        for expected in [
            "create_pmax",
            "update_budget",
            "set_target_roas",
            "pause_campaign",
            "enable_campaign",
            "attach_merchant_center",
            "run_gaql_query",
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn required_fields_of_create_pmax() {
        let required = required_fields("create_pmax").unwrap();
        assert_eq!(required, vec!["account_id", "campaign_name"]);
    }

    #[test]
    fn unknown_shape() {
        assert!(find_shape("nonexistent_schema").is_none());
        assert!(required_fields("nonexistent_schema").is_none());
    }

    #[test]
    fn only_enable_has_safety_check() {
        let has = |name| {
            find_shape(name)
                .unwrap()
                .fields
                .iter()
                .any(|f| f.name == "safety_check")
        };
        assert!(has("enable_campaign"));
        assert!(!has("pause_campaign"));
    }
}
