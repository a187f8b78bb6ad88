//! Wire-level tests for the API client against a mock server.

use mockito::{Matcher, Server};
use serde_json::json;
use trapline_client::{ApiClient, ClientError};
use trapline_core::{NetworkProtocol, NewRule, NewRuleComponent};

const RULE_ID: &str = "7b2ae3e4-8a3c-4f8e-9d2a-222222222222";

fn rule_json(zone: &str, name: &str) -> serde_json::Value {
    json!({
        "ruleid": RULE_ID,
        "name": name,
        "zone": zone,
        "priority": 1,
        "networkprotocol": "http",
        "rulecomponents": []
    })
}

#[tokio::test]
async fn get_rules_sends_the_bearer_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/rules/abc.example.net")
        .match_header("authorization", "Bearer tok-123")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([rule_json("abc.example.net", "catch all")]).to_string())
        .create_async()
        .await;

    let client = ApiClient::new(server.url(), "tok-123").unwrap();
    let rules = client.get_rules("abc.example.net").await.unwrap();

    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].name, "catch all");
    assert_eq!(rules[0].protocol, NetworkProtocol::Http);
    mock.assert_async().await;
}

#[tokio::test]
async fn zone_exists_maps_statuses() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/zones/gone.example.net")
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("GET", "/zones/theirs.example.net")
        .with_status(403)
        .create_async()
        .await;

    let client = ApiClient::new(server.url(), "tok").unwrap();
    assert!(!client.zone_exists("gone.example.net").await.unwrap());
    assert!(client.zone_exists("theirs.example.net").await.unwrap());
}

#[tokio::test]
async fn failed_calls_carry_status_and_context() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/rules/abc.example.net")
        .with_status(500)
        .create_async()
        .await;

    let client = ApiClient::new(server.url(), "tok").unwrap();
    match client.get_rules("abc.example.net").await.unwrap_err() {
        ClientError::UnexpectedStatus { status, context } => {
            assert_eq!(status.as_u16(), 500);
            assert!(context.contains("get_rules"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn add_rule_defaults_an_empty_name() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/rules")
        .match_body(Matcher::PartialJson(json!({
            "zone": "abc.example.net",
            "networkprotocol": "http",
            "name": "http abc.example.net"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(rule_json("abc.example.net", "http abc.example.net").to_string())
        .create_async()
        .await;

    let client = ApiClient::new(server.url(), "tok").unwrap();
    let rule = client
        .add_rule("abc.example.net", NetworkProtocol::Http, 1, "")
        .await
        .unwrap();

    assert_eq!(rule.name, "http abc.example.net");
    mock.assert_async().await;
}

#[tokio::test]
async fn apply_rules_creates_rule_then_components() {
    let mut server = Server::new_async().await;
    let rule_mock = server
        .mock("POST", "/rules")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(rule_json("abc.example.net", "reply with js alert").to_string())
        .create_async()
        .await;
    let component_mock = server
        .mock(
            "POST",
            format!("/rules/abc.example.net/{RULE_ID}/components").as_str(),
        )
        .match_body(Matcher::PartialJson(json!({ "ispredicate": false })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "componentid": "7b2ae3e4-8a3c-4f8e-9d2a-333333333333",
                "actionname": "http.code",
                "actionvalue": "200",
                "ispredicate": false
            })
            .to_string(),
        )
        .expect(2)
        .create_async()
        .await;

    let mut definition = NewRule::new("reply with js alert", NetworkProtocol::Http);
    definition
        .components
        .push(NewRuleComponent::result("http.code", "200"));
    definition
        .components
        .push(NewRuleComponent::result("http.body", "hi"));

    let client = ApiClient::new(server.url(), "tok").unwrap();
    let created = client
        .apply_rules("abc.example.net", &[definition])
        .await
        .unwrap();

    assert_eq!(created.len(), 1);
    rule_mock.assert_async().await;
    component_mock.assert_async().await;
}

#[tokio::test]
async fn get_requests_clamps_the_page_size() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/requests/abc.example.net")
        .match_query(Matcher::UrlEncoded("limit".into(), "1024".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let client = ApiClient::new(server.url(), "tok").unwrap();
    let requests = client
        .get_requests("abc.example.net", 5000, 0, "")
        .await
        .unwrap();

    assert!(requests.is_empty());
    mock.assert_async().await;
}
