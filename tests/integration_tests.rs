//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: config → HTTP requests → messages → state file

use serde_json::{json, Value};
use std::sync::Arc;
use tap_jira::context::Context;
use tap_jira::engine::{SyncConfig, SyncEngine};
use tap_jira::http::HttpClient;
use tap_jira::sink::MemorySink;
use tap_jira::state::StateManager;
use tap_jira::{jira_streams, Error, TapConfig};
use tempfile::tempdir;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// base64("user:pass")
const BASIC_AUTH: &str = "Basic dXNlcjpwYXNz";

fn config_for(server: &MockServer) -> TapConfig {
    let json = json!({
        "username": "user",
        "api_key": "pass",
        "domain": server.uri(),
        "page_size": 2,
        "user_agent": "tap-jira-test",
        "custom_fields": {"customfield_10016": "story_points"},
        "http": {"requests_per_second": 0, "max_retries": 2, "initial_backoff_ms": 1}
    });
    TapConfig::from_json(&json.to_string()).unwrap()
}

fn engine_for(config: &TapConfig, state: StateManager) -> SyncEngine {
    let client = HttpClient::with_auth(config.http_client_config(), config.auth_config()).unwrap();
    SyncEngine::new(
        Arc::new(client),
        state,
        jira_streams(config),
        config.origin().unwrap(),
    )
}

fn issue(id: &str, updated: &str) -> Value {
    json!({
        "id": id,
        "key": format!("EX-{id}"),
        "fields": {"updated": updated, "customfield_10016": 3, "sprint": {"id": 7}}
    })
}

async fn mount_single_board(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/agile/1.0/board"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"total": 1, "values": [{"id": 1}]})),
        )
        .mount(server)
        .await;
}

// ============================================================================
// Read Tests
// ============================================================================

#[tokio::test]
async fn test_read_boards_and_issues() {
    let server = MockServer::start().await;
    mount_single_board(&server).await;

    Mock::given(method("GET"))
        .and(path("/rest/agile/1.0/board/1/issue"))
        .and(header("Authorization", BASIC_AUTH))
        .and(header("User-Agent", "tap-jira-test"))
        .and(query_param_is_missing("startAt"))
        .and(query_param("maxResults", "2"))
        .and(query_param("jql", "ORDER BY updated ASC"))
        .and(query_param("fields", "customfield_10016"))
        .and(query_param("fields", "summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 3,
            "issues": [
                issue("1", "2024-01-01T10:00:00.000+0000"),
                issue("2", "2024-01-03T10:00:00.000+0000")
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/agile/1.0/board/1/issue"))
        .and(query_param("startAt", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 3,
            "issues": [issue("3", "2024-01-02T10:00:00.000+0000")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let state_path = dir.path().join("state.json");
    let config = config_for(&server);
    let mut engine = engine_for(&config, StateManager::new(&state_path))
        .with_config(SyncConfig::new().with_streams(["boards", "issues"]));
    let mut sink = MemorySink::new();

    let stats = engine.run(&mut sink).await.unwrap();

    assert_eq!(sink.records("boards").len(), 1);
    let issues = sink.records("issues");
    assert_eq!(issues.len(), 3);
    assert_eq!(issues[0]["fields"]["story_points"], json!(3));
    assert!(issues[0]["fields"].get("customfield_10016").is_none());
    assert_eq!(issues[0]["sprint_id"], json!(7));
    assert_eq!(issues[0]["updated"], json!("2024-01-01T10:00:00.000+0000"));
    assert_eq!(stats.pages_fetched, 3);

    // Highest value wins, not the last one seen
    let saved: Value =
        serde_json::from_str(&std::fs::read_to_string(&state_path).unwrap()).unwrap();
    assert_eq!(
        saved["bookmarks"]["issues"]["partitions"][0],
        json!({
            "context": {"board_id": 1},
            "replication_key": "updated",
            "replication_key_value": "2024-01-03T10:00:00.000+0000"
        })
    );
}

#[tokio::test]
async fn test_rerun_uses_bookmark() {
    let server = MockServer::start().await;
    mount_single_board(&server).await;

    Mock::given(method("GET"))
        .and(path("/rest/agile/1.0/board/1/issue"))
        .and(query_param(
            "jql",
            "updated >= '2024-02-01 10:30' ORDER BY updated ASC",
        ))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"total": 0, "issues": []})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let state_path = dir.path().join("state.json");
    std::fs::write(
        &state_path,
        json!({
            "bookmarks": {"issues": {"partitions": [{
                "context": {"board_id": 1},
                "replication_key": "updated",
                "replication_key_value": "2024-02-01T10:30:45.000+0200"
            }]}}
        })
        .to_string(),
    )
    .unwrap();

    let config = config_for(&server);
    let state = StateManager::from_file(&state_path).unwrap();
    let mut engine = engine_for(&config, state.clone())
        .with_config(SyncConfig::new().with_streams(["issues"]));
    let mut sink = MemorySink::new();

    engine.run(&mut sink).await.unwrap();

    assert!(sink.records("issues").is_empty());
    assert_eq!(
        state
            .bookmark("issues", &Context::new().with_value("board_id", 1))
            .await,
        Some(json!("2024-02-01T10:30:45.000+0200"))
    );
}

#[tokio::test]
async fn test_retry_on_503() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/agile/1.0/board"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_single_board(&server).await;

    let config = config_for(&server);
    let mut engine = engine_for(&config, StateManager::in_memory())
        .with_config(SyncConfig::new().with_streams(["boards"]));
    let mut sink = MemorySink::new();

    engine.run(&mut sink).await.unwrap();
    assert_eq!(sink.records("boards").len(), 1);
}

#[tokio::test]
async fn test_board_without_sprint_support() {
    let server = MockServer::start().await;
    mount_single_board(&server).await;

    Mock::given(method("GET"))
        .and(path("/rest/agile/1.0/board/1/sprint"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errorMessages": ["The board does not support sprints"],
            "errors": {}
        })))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let mut engine = engine_for(&config, StateManager::in_memory())
        .with_config(SyncConfig::new().with_streams(["sprints"]));
    let mut sink = MemorySink::new();

    engine.run(&mut sink).await.unwrap();
    assert!(sink.records("sprints").is_empty());
    assert!(sink.records("boards").is_empty());
}

#[tokio::test]
async fn test_other_400_is_fatal() {
    let server = MockServer::start().await;
    mount_single_board(&server).await;

    Mock::given(method("GET"))
        .and(path("/rest/agile/1.0/board/1/sprint"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errorMessages": ["Something else went wrong"]
        })))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let mut engine = engine_for(&config, StateManager::in_memory())
        .with_config(SyncConfig::new().with_streams(["sprints"]));

    let result = engine.run(&mut MemorySink::new()).await;
    assert!(matches!(result, Err(Error::HttpStatus { status: 400, .. })));
}

#[tokio::test]
async fn test_users_short_page_pagination() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/3/users"))
        .and(query_param_is_missing("startAt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"accountId": "a1"}, {"accountId": "a2"}])),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/api/3/users"))
        .and(query_param("startAt", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"accountId": "a3"}])))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let mut engine = engine_for(&config, StateManager::in_memory())
        .with_config(SyncConfig::new().with_streams(["users"]));
    let mut sink = MemorySink::new();

    engine.run(&mut sink).await.unwrap();

    let ids: Vec<&Value> = sink
        .records("users")
        .iter()
        .map(|r| &r["accountId"])
        .collect();
    assert_eq!(ids, vec![&json!("a1"), &json!("a2"), &json!("a3")]);
}
