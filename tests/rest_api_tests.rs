//! End-to-end tests for the REST boundary.
//!
//! Spins up the server on an ephemeral port with a scripted transport
//! and drives it with a real HTTP client.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use reachprobe::probe::mock::{MockBehavior, MockCounters, MockTransport};
use reachprobe::probe::ProbeController;
use reachprobe::rest::{ApiState, RestApiServer};

async fn start_server(
    behavior: MockBehavior,
    connect_deadline: Duration,
    overall_deadline: Duration,
) -> (RestApiServer, Arc<MockCounters>) {
    let transport = MockTransport::new(behavior);
    let counters = transport.counters();
    let controller = ProbeController::with_transport(Arc::new(transport));
    let state = Arc::new(ApiState::new(controller, connect_deadline, overall_deadline));
    let server = RestApiServer::start(state, Some(0))
        .await
        .expect("server should bind an ephemeral port");
    (server, counters)
}

async fn post_probe(server: &RestApiServer, body: Value) -> (u16, Value) {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/v1/ssh/test", server.url()))
        .json(&body)
        .send()
        .await
        .expect("request should reach the server");
    let status = response.status().as_u16();
    let body: Value = response.json().await.expect("response should be JSON");
    (status, body)
}

#[tokio::test]
async fn missing_fields_return_400_with_validation_message() {
    let (server, counters) = start_server(
        MockBehavior::success(),
        Duration::from_secs(8),
        Duration::from_secs(10),
    )
    .await;

    let (status, body) = post_probe(&server, json!({ "ipAddress": "10.0.0.5" })).await;

    assert_eq!(status, 400);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("IP address and username are required"));
    assert_eq!(counters.opened(), 0);
}

#[tokio::test]
async fn successful_probe_returns_200() {
    let (server, _counters) = start_server(
        MockBehavior::success(),
        Duration::from_secs(8),
        Duration::from_secs(10),
    )
    .await;

    let (status, body) = post_probe(
        &server,
        json!({ "ipAddress": "10.0.0.5", "username": "admin", "password": "pw" }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Connection successful"));
}

#[tokio::test]
async fn non_zero_exit_returns_400_with_code_and_stderr() {
    let (server, _counters) = start_server(
        MockBehavior::non_zero(127, "sh: not found"),
        Duration::from_secs(8),
        Duration::from_secs(10),
    )
    .await;

    let (status, body) = post_probe(
        &server,
        json!({ "ipAddress": "10.0.0.5", "username": "admin" }),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["success"], json!(false));
    let message = body["message"].as_str().unwrap_or_default();
    assert!(message.contains("Command exited with code 127"));
    assert!(message.contains("sh: not found"));
}

#[tokio::test]
async fn refused_connect_returns_400_with_underlying_error() {
    let (server, _counters) = start_server(
        MockBehavior::refused(),
        Duration::from_secs(8),
        Duration::from_secs(10),
    )
    .await;

    let (status, body) = post_probe(
        &server,
        json!({ "ipAddress": "10.0.0.9", "username": "admin" }),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(
        body["message"],
        json!("Connection failed: connection refused")
    );
}

#[tokio::test]
async fn deadline_elapsing_returns_408() {
    let (server, _counters) = start_server(
        MockBehavior::Exec {
            connect_delay: Duration::from_secs(5),
            exec_delay: Duration::ZERO,
            exit_status: 0,
            stdout: String::new(),
            stderr: String::new(),
        },
        Duration::from_millis(50),
        Duration::from_millis(50),
    )
    .await;

    let (status, body) = post_probe(
        &server,
        json!({ "ipAddress": "10.0.0.5", "username": "admin" }),
    )
    .await;

    assert_eq!(status, 408);
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["message"],
        json!("Connection timed out. Please verify the IP address is reachable.")
    );
}

#[tokio::test]
async fn port_accepted_as_string_and_number() {
    let (server, counters) = start_server(
        MockBehavior::success(),
        Duration::from_secs(8),
        Duration::from_secs(10),
    )
    .await;

    let (status, _) = post_probe(
        &server,
        json!({ "ipAddress": "10.0.0.5", "username": "admin", "port": "2222" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(counters.last_port(), 2222);

    let (status, _) = post_probe(
        &server,
        json!({ "ipAddress": "10.0.0.5", "username": "admin", "port": 2022 }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(counters.last_port(), 2022);
}

#[tokio::test]
async fn unparsable_port_falls_back_to_22() {
    let (server, counters) = start_server(
        MockBehavior::success(),
        Duration::from_secs(8),
        Duration::from_secs(10),
    )
    .await;

    let (status, _) = post_probe(
        &server,
        json!({ "ipAddress": "10.0.0.5", "username": "admin", "port": "ssh" }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(counters.last_port(), 22);
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let (server, _counters) = start_server(
        MockBehavior::success(),
        Duration::from_secs(8),
        Duration::from_secs(10),
    )
    .await;

    let response = reqwest::get(format!("{}/api/v1/health", server.url()))
        .await
        .expect("request should reach the server");
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.expect("response should be JSON");
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["version"], json!(env!("CARGO_PKG_VERSION")));
}
