//! HTTP-level tests for the agent service client.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use stacked_agents::{
    AgentDirectory, AgentServiceClient, AgentServiceConfig, AgentServiceError, StatusPoller,
};
use stacked_common::EventBus;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(base: &str) -> AgentServiceClient {
    AgentServiceClient::new(AgentServiceConfig::new(base).with_timeout(Duration::from_secs(5)))
        .unwrap_or_else(|e| panic!("client build failed: {e}"))
}

fn agents_body() -> serde_json::Value {
    json!([
        {"id": "monitor", "name": "Monitor", "emoji": "👁", "status": "idle",
         "last_run": "2024-05-01T10:00:00", "autonomy_level": 9},
        {"id": "optimizer", "name": "Optimizer", "emoji": "⚙", "status": "running",
         "last_run": null, "autonomy_level": 7}
    ])
}

fn notifications_body() -> serde_json::Value {
    json!([
        {"timestamp": "2024-05-01T10:00:00", "agent": "Monitor", "emoji": "👁",
         "message": "CPU hot", "priority": 10}
    ])
}

#[tokio::test]
async fn lists_agents_and_notifications() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(agents_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(notifications_body()))
        .mount(&server)
        .await;

    let client = client(&server.uri());
    let agents = client.agents().await.unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(agents.len(), 2);
    assert_eq!(agents[1].last_run, None);

    let notifications = client.notifications().await.unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(notifications[0].message, "CPU hot");
}

#[tokio::test]
async fn thoughts_send_limit_and_encode_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/agents/my%20agent/thoughts"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "agent_id": "my agent", "timestamp": "2024-05-01T10:00:00",
             "trigger": "schedule", "thought": "All quiet", "action_taken": "observe",
             "priority": 2}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let thoughts = client(&server.uri())
        .thoughts("my agent", 20)
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(thoughts.len(), 1);
    assert_eq!(thoughts[0].action_taken, "observe");
}

#[tokio::test]
async fn trigger_unknown_agent_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/agents/ghost/trigger"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Agent not found"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server.uri()).trigger("ghost").await.unwrap_err();
    assert!(matches!(err, AgentServiceError::Api { status: 404, .. }));
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"not": "a list"})))
        .mount(&server)
        .await;

    let err = client(&server.uri()).agents().await.unwrap_err();
    assert!(matches!(err, AgentServiceError::Parse(_)));
}

#[tokio::test]
async fn health_reports_scheduler() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "running", "agents": 4, "scheduler_running": true, "jobs": 4
        })))
        .mount(&server)
        .await;

    let health = client(&server.uri())
        .health()
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(health.status, "running");
    assert_eq!(health.jobs, 4);
}

#[tokio::test]
async fn poller_keeps_snapshot_when_notifications_endpoint_breaks() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(agents_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(notifications_body()))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/notifications"))
        .respond_with(ResponseTemplate::new(500))
        .with_priority(2)
        .mount(&server)
        .await;

    let poller = StatusPoller::new(Arc::new(client(&server.uri())), EventBus::default());

    let first = poller.poll_once().await.unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(first.statuses.len(), 2);
    assert_eq!(first.notifications.len(), 1);

    assert!(poller.poll_once().await.is_err());
    assert_eq!(poller.snapshot().await, first);
}
