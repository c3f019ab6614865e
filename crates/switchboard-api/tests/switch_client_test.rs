#![allow(clippy::unwrap_used)]
// Integration tests for `SwitchClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use switchboard_api::{BasicAuth, Error, SwitchClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, SwitchClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = SwitchClient::with_client(reqwest::Client::new(), &base_url, None);
    (server, client)
}

const SWITCH_ID: &str = "00:00:00:22:3d:5a:04:87";

fn flows_path() -> String {
    format!("/api/switch/{SWITCH_ID}/flows")
}

// ── Switch list ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_switches() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/switch/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "switch_id": SWITCH_ID,
                "name": "ofsw-01",
                "common-name": "edge-east",
                "address": "10.0.0.7:6653",
                "hostname": "ofsw-01.lab",
                "pop-location": "AMS",
                "description": "Centec",
                "state": "ACTIVATED",
                "controller-switch": true
            },
            { "switch_id": "00:00:00:00:00:00:00:02" }
        ])))
        .mount(&server)
        .await;

    let switches = client.list_switches().await.unwrap();
    assert_eq!(switches.len(), 2);

    let first = &switches[0];
    assert_eq!(first.switch_id, SWITCH_ID);
    assert_eq!(first.common_name.as_deref(), Some("edge-east"));
    assert_eq!(first.pop_location.as_deref(), Some("AMS"));
    assert_eq!(first.controller_switch, Some(true));
    assert_eq!(first.inventory_switch, None);

    let second = &switches[1];
    assert!(second.name.is_none());
    assert!(second.controller_switch.is_none());
}

#[tokio::test]
async fn test_list_switches_accepts_pop_alias() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/switch/list"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "switch_id": SWITCH_ID, "pop": "FRA" }])),
        )
        .mount(&server)
        .await;

    let switches = client.list_switches().await.unwrap();
    assert_eq!(switches[0].pop_location.as_deref(), Some("FRA"));
}

// ── Flows ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_switch_flows_sends_fixed_parameters() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(flows_path()))
        .and(query_param("inventory", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "flowid": "flow-a", "maximum_bandwidth": 1000, "status": "UP" },
            { "flowid": "flow-b", "maximum_bandwidth": 2000 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let flows = client.switch_flows(SWITCH_ID, false, None).await.unwrap();
    assert_eq!(flows.len(), 2);
    assert_eq!(flows[0].flow_id.as_deref(), Some("flow-a"));
    assert_eq!(flows[1].maximum_bandwidth, Some(2000));
}

#[tokio::test]
async fn test_switch_flows_with_port() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(flows_path()))
        .and(query_param("inventory", "true"))
        .and(query_param("port", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let flows = client.switch_flows(SWITCH_ID, true, Some(12)).await.unwrap();
    assert!(flows.is_empty());
}

#[tokio::test]
async fn test_switch_flows_null_body_is_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(flows_path()))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let flows = client.switch_flows(SWITCH_ID, false, None).await.unwrap();
    assert!(flows.is_empty());
}

#[tokio::test]
async fn test_switch_flows_empty_body_is_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(flows_path()))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let flows = client.switch_flows(SWITCH_ID, false, None).await.unwrap();
    assert!(flows.is_empty());
}

// ── Errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/switch/list"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.list_switches().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_server_error_carries_status_and_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(flows_path()))
        .respond_with(ResponseTemplate::new(500).set_body_string("storm topology down"))
        .mount(&server)
        .await;

    let err = client
        .switch_flows(SWITCH_ID, false, None)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(err.is_transient());
    assert!(err.to_string().contains("storm topology down"));
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/switch/list"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let result = client.list_switches().await;
    assert!(
        matches!(result, Err(Error::Deserialization { ref body, .. }) if body == "{not json"),
        "expected Deserialization error, got: {result:?}"
    );
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_basic_auth_header_is_sent() {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/northbound", server.uri())).unwrap();
    let auth = BasicAuth {
        username: "kilda".into(),
        password: "secret".to_string().into(),
    };
    let client = SwitchClient::with_client(reqwest::Client::new(), &base_url, Some(auth));

    Mock::given(method("GET"))
        .and(path("/northbound/api/switch/list"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let switches = client.list_switches().await.unwrap();
    assert!(switches.is_empty());
}
