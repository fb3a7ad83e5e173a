//! REST Gateway Integration Tests
//!
//! Runs the REST adapter against a mock remote API and checks the wire
//! contract: paths, headers, mutate envelopes, search queries, error
//! propagation and the retry policy.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use provisioning_engine::application::ports::{
    BudgetSpec, BudgetUpdateSpec, CampaignSpec, FeedLinkSpec, GatewayError, MutationGatewayPort,
    QueryPort,
};
use provisioning_engine::domain::provisioning::CampaignStatus;
use provisioning_engine::domain::resource_names::CustomerId;
use provisioning_engine::domain::shared::{CampaignId, MerchantCenterId, Micros, ResourceName};
use provisioning_engine::infrastructure::gateway::rest::RetryConfig;
use provisioning_engine::infrastructure::gateway::{RestGateway, RestGatewayConfig};

const CID: &str = "1234567890";

fn customer() -> CustomerId {
    CustomerId::parse(CID).unwrap()
}

fn gateway(server: &MockServer) -> RestGateway {
    let config = RestGatewayConfig::new(server.uri(), "dev-token-abc", "ya29.access")
        .with_login_customer_id("9998887777")
        .with_timeout(Duration::from_secs(5))
        .with_retry(RetryConfig {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(5),
            max_backoff: Duration::from_millis(20),
            multiplier: 2.0,
        });
    RestGateway::new(&config).unwrap()
}

fn mutate_path(collection: &str) -> String {
    format!("/v19/customers/{CID}/{collection}:mutate")
}

fn search_path() -> String {
    format!("/v19/customers/{CID}/googleAds:search")
}

fn created(resource_name: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "results": [{"resourceName": resource_name}]
    }))
}

fn body_of(request: &Request) -> serde_json::Value {
    serde_json::from_slice(&request.body).unwrap()
}

// =============================================================================
// Mutations
// =============================================================================

#[tokio::test]
async fn create_budget_sends_credentials_and_string_micros() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(mutate_path("campaignBudgets")))
        .and(header("authorization", "Bearer ya29.access"))
        .and(header("developer-token", "dev-token-abc"))
        .and(header("login-customer-id", "9998887777"))
        .and(body_partial_json(json!({
            "operations": [{
                "create": {
                    "name": "Summer Budget",
                    "amountMicros": "50000000",
                    "deliveryMethod": "STANDARD",
                    "explicitlyShared": false
                }
            }]
        })))
        .respond_with(created("customers/1234567890/campaignBudgets/111"))
        .expect(1)
        .mount(&server)
        .await;

    let name = gateway(&server)
        .create_budget(BudgetSpec {
            customer_id: customer(),
            name: "Summer Budget".to_string(),
            amount: Micros::new(50_000_000),
        })
        .await
        .unwrap();

    assert_eq!(name.as_str(), "customers/1234567890/campaignBudgets/111");
}

#[tokio::test]
async fn create_campaign_is_performance_max_with_compact_dates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(mutate_path("campaigns")))
        .respond_with(created("customers/1234567890/campaigns/222"))
        .expect(1)
        .mount(&server)
        .await;

    let name = gateway(&server)
        .create_campaign(CampaignSpec {
            customer_id: customer(),
            name: "Summer".to_string(),
            budget: ResourceName::new("customers/1234567890/campaignBudgets/111"),
            status: CampaignStatus::Paused,
            ratio_target: Some(3.5),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            end_date: None,
        })
        .await
        .unwrap();
    assert_eq!(name.as_str(), "customers/1234567890/campaigns/222");

    let requests = server.received_requests().await.unwrap();
    let create = &body_of(&requests[0])["operations"][0]["create"];
    assert_eq!(create["status"], json!("PAUSED"));
    assert_eq!(create["advertisingChannelType"], json!("PERFORMANCE_MAX"));
    assert_eq!(
        create["campaignBudget"],
        json!("customers/1234567890/campaignBudgets/111")
    );
    assert_eq!(create["maximizeConversionValue"]["targetRoas"], json!(3.5));
    assert_eq!(create["startDate"], json!("20250601"));
    assert!(create.get("endDate").is_none());
}

#[tokio::test]
async fn link_feed_is_an_update_with_mask() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(mutate_path("campaigns")))
        .and(body_partial_json(json!({
            "operations": [{
                "update": {
                    "resourceName": "customers/1234567890/campaigns/222",
                    "shoppingSetting": {"merchantId": "555000111", "feedLabel": "summer"}
                },
                "updateMask": "shoppingSetting"
            }]
        })))
        .respond_with(created("customers/1234567890/campaigns/222"))
        .expect(1)
        .mount(&server)
        .await;

    let ack = gateway(&server)
        .link_feed(FeedLinkSpec {
            customer_id: customer(),
            campaign: ResourceName::new("customers/1234567890/campaigns/222"),
            merchant_center_id: MerchantCenterId::new("555000111"),
            feed_label: Some("summer".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(
        ack.resource_name.as_str(),
        "customers/1234567890/campaigns/222"
    );
}

#[tokio::test]
async fn budget_update_masks_amount_only() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(mutate_path("campaignBudgets")))
        .and(body_partial_json(json!({
            "operations": [{
                "update": {
                    "resourceName": "customers/1234567890/campaignBudgets/111",
                    "amountMicros": "75000000"
                },
                "updateMask": "amountMicros"
            }]
        })))
        .respond_with(created("customers/1234567890/campaignBudgets/111"))
        .expect(1)
        .mount(&server)
        .await;

    gateway(&server)
        .update_budget(BudgetUpdateSpec {
            customer_id: customer(),
            budget: ResourceName::new("customers/1234567890/campaignBudgets/111"),
            amount: Micros::new(75_000_000),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn remote_rejection_is_returned_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(mutate_path("campaigns")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "Request contains an invalid argument.",
                "status": "INVALID_ARGUMENT"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = gateway(&server)
        .change_status(
            &customer(),
            &ResourceName::new("customers/1234567890/campaigns/222"),
            CampaignStatus::Enabled,
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        GatewayError::Remote {
            status: 400,
            code: Some("INVALID_ARGUMENT".to_string()),
            message: "Request contains an invalid argument.".to_string(),
        }
    );
}

#[tokio::test]
async fn mutations_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(mutate_path("campaignBudgets")))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let err = gateway(&server)
        .create_budget(BudgetSpec {
            customer_id: customer(),
            name: "B".to_string(),
            amount: Micros::new(1_000_000),
        })
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn unauthorized_maps_to_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(mutate_path("campaignBudgets")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": 401, "message": "Invalid credentials", "status": "UNAUTHENTICATED"}
        })))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .create_budget(BudgetSpec {
            customer_id: customer(),
            name: "B".to_string(),
            amount: Micros::new(1_000_000),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Authentication { .. }));
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.code(), Some("UNAUTHENTICATED"));
}

#[tokio::test]
async fn permission_denied_keeps_403_and_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(mutate_path("campaignBudgets")))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {
                "code": 403,
                "message": "The caller does not have permission",
                "status": "PERMISSION_DENIED"
            }
        })))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .create_budget(BudgetSpec {
            customer_id: customer(),
            name: "B".to_string(),
            amount: Micros::new(1_000_000),
        })
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert_eq!(err.code(), Some("PERMISSION_DENIED"));
    assert!(err.to_string().contains("The caller does not have permission"));
}

#[tokio::test]
async fn rate_limited_mutation_keeps_remote_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(mutate_path("campaignBudgets")))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {
                "code": 429,
                "message": "Resource has been exhausted",
                "status": "RESOURCE_EXHAUSTED"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = gateway(&server)
        .create_budget(BudgetSpec {
            customer_id: customer(),
            name: "B".to_string(),
            amount: Micros::new(1_000_000),
        })
        .await
        .unwrap_err();

    assert_eq!(
        err,
        GatewayError::RateLimited {
            code: Some("RESOURCE_EXHAUSTED".to_string()),
            message: "Resource has been exhausted".to_string(),
        }
    );
    assert_eq!(err.status(), Some(429));
}

#[tokio::test]
async fn remote_not_found_keeps_status_and_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(mutate_path("campaigns")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "code": 404,
                "message": "Requested entity was not found",
                "status": "NOT_FOUND"
            }
        })))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .change_status(
            &customer(),
            &ResourceName::new("customers/1234567890/campaigns/404"),
            CampaignStatus::Paused,
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        GatewayError::Remote {
            status: 404,
            code: Some("NOT_FOUND".to_string()),
            message: "Requested entity was not found".to_string(),
        }
    );
}

#[tokio::test]
async fn empty_mutate_result_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(mutate_path("assetGroups")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .create_asset_group(provisioning_engine::application::ports::AssetGroupSpec {
            customer_id: customer(),
            campaign: ResourceName::new("customers/1234567890/campaigns/222"),
            name: "Summer Asset Group".to_string(),
            final_urls: vec!["https://shop.example.com".to_string()],
        })
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::InvalidResponse { .. }));
}

// =============================================================================
// Queries
// =============================================================================

#[tokio::test]
async fn pattern_lookup_uses_quoted_like() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(search_path()))
        .and(body_partial_json(json!({
            "query": "SELECT campaign.id, campaign.name FROM campaign WHERE campaign.name LIKE 'Bob\\'s %'"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"campaign": {"resourceName": "customers/1234567890/campaigns/1", "id": "1", "name": "Bob's Shoes"}},
                {"campaign": {"resourceName": "customers/1234567890/campaigns/2", "id": "2", "name": "Bob's Hats"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let found = gateway(&server)
        .find_campaigns_by_pattern(&customer(), "Bob's %")
        .await
        .unwrap();

    let ids: Vec<&str> = found.iter().map(|c| c.campaign_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(found[0].name, "Bob's Shoes");
}

#[tokio::test]
async fn campaign_budget_reads_string_micros() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(search_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "campaign": {
                    "id": "42",
                    "name": "Summer",
                    "campaignBudget": "customers/1234567890/campaignBudgets/111"
                },
                "campaignBudget": {"amountMicros": "10000000"}
            }]
        })))
        .mount(&server)
        .await;

    let info = gateway(&server)
        .campaign_budget(&customer(), &CampaignId::new("42"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(info.campaign_name, "Summer");
    assert_eq!(
        info.budget.as_str(),
        "customers/1234567890/campaignBudgets/111"
    );
    assert_eq!(info.amount.value(), 10_000_000);

    let requests = server.received_requests().await.unwrap();
    let query = body_of(&requests[0])["query"].as_str().unwrap().to_string();
    assert!(query.ends_with("campaign.resource_name = 'customers/1234567890/campaigns/42'"));
}

#[tokio::test]
async fn missing_campaign_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(search_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let info = gateway(&server)
        .campaign_bidding(&customer(), &CampaignId::new("42"))
        .await
        .unwrap();

    assert!(info.is_none());
}

#[tokio::test]
async fn non_numeric_campaign_id_never_reaches_remote() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let info = gateway(&server)
        .campaign_budget(&customer(), &CampaignId::new("42' OR '1'='1"))
        .await
        .unwrap();

    assert!(info.is_none());
}

#[tokio::test]
async fn search_is_retried_on_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(search_path()))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(search_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"campaign": {"id": "1"}}],
            "nextPageToken": "page-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let rows = gateway(&server)
        .search(&customer(), "SELECT campaign.id FROM campaign", 100)
        .await
        .unwrap();

    assert_eq!(rows.rows.len(), 1);
    assert_eq!(rows.next_page_token.as_deref(), Some("page-2"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(body_of(&requests[0])["pageSize"], json!(100));
}

#[tokio::test]
async fn search_gives_up_after_max_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(search_path()))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(3)
        .mount(&server)
        .await;

    let err = gateway(&server)
        .search(&customer(), "SELECT campaign.id FROM campaign", 10)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn empty_next_page_token_is_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(search_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [],
            "nextPageToken": ""
        })))
        .mount(&server)
        .await;

    let rows = gateway(&server)
        .search(&customer(), "SELECT campaign.id FROM campaign", 10)
        .await
        .unwrap();

    assert!(rows.rows.is_empty());
    assert!(rows.next_page_token.is_none());
}

#[test]
fn missing_credentials_are_rejected() {
    let config = RestGatewayConfig::new("http://localhost:1", "", "token");
    assert!(RestGateway::new(&config).is_err());
}
