//! Integration tests for the hub HTTP API
//!
//! Each test binds a fresh hub to an ephemeral port and exercises it with a
//! real HTTP client. The chat upstream is stubbed so no model server is
//! needed.

use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::Arc;

use hub::chat::{ChatReply, ChatUpstream};
use hub::config::{FilesConfig, HubConfig};
use hub::error::{HubError, HubResult};
use hub::web::state::AppState;
use hub::web::create_router;

struct EchoUpstream;

#[async_trait]
impl ChatUpstream for EchoUpstream {
    async fn relay(&self, message: &str, context: Option<&str>) -> HubResult<ChatReply> {
        let suffix = context.map(|c| format!(" [{}]", c)).unwrap_or_default();
        Ok(ChatReply {
            reply: format!("echo: {}{}", message, suffix),
            model: "stub".to_string(),
        })
    }
}

struct DownUpstream;

#[async_trait]
impl ChatUpstream for DownUpstream {
    async fn relay(&self, _message: &str, _context: Option<&str>) -> HubResult<ChatReply> {
        Err(HubError::Upstream("connection refused".to_string()))
    }
}

fn test_config(root: &std::path::Path) -> HubConfig {
    let mut config = HubConfig::default();
    config.files = FilesConfig {
        root: root.display().to_string(),
        ..FilesConfig::default()
    };
    config
}

async fn spawn_hub(config: HubConfig, upstream: Arc<dyn ChatUpstream>) -> SocketAddr {
    let state = AppState::with_upstream(&config, upstream).unwrap();
    let app = create_router(state, false);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn health_returns_ok_with_valid_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_hub(test_config(dir.path()), Arc::new(EchoUpstream)).await;

    let response = reqwest::get(format!("http://{}/health", addr)).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    let timestamp = body["timestamp"].as_str().unwrap();
    chrono::DateTime::parse_from_rfc3339(timestamp).unwrap();
}

#[tokio::test]
async fn tool_registry_crud_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_hub(test_config(dir.path()), Arc::new(EchoUpstream)).await;
    let client = reqwest::Client::new();
    let base = format!("http://{}/api/tools", addr);

    // Default config seeds the builtin set
    let listing: serde_json::Value = client.get(&base).send().await.unwrap().json().await.unwrap();
    let seeded = listing["total"].as_u64().unwrap();
    assert_eq!(seeded, 2);

    // Register without an id
    let response = client
        .post(&base)
        .json(&serde_json::json!({
            "name": "Grafana",
            "url": "http://localhost:3000",
            "description": "Dashboards"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let created: serde_json::Value = response.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(created["type"], "web");
    assert_eq!(created["icon"], "tool");

    // Reachable by id
    let fetched: serde_json::Value = client
        .get(format!("{}/{}", base, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["name"], "Grafana");

    // Disable it; it leaves the listing but stays reachable by id
    let response = client
        .patch(format!("{}/{}", base, id))
        .json(&serde_json::json!({ "enabled": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let listing: serde_json::Value = client.get(&base).send().await.unwrap().json().await.unwrap();
    assert_eq!(listing["total"].as_u64().unwrap(), seeded);
    let response = client.get(format!("{}/{}", base, id)).send().await.unwrap();
    assert_eq!(response.status(), 200);

    // Remove it
    let response = client
        .delete(format!("{}/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let response = client.get(format!("{}/{}", base, id)).send().await.unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn unknown_tool_ids_return_json_404() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_hub(test_config(dir.path()), Arc::new(EchoUpstream)).await;
    let client = reqwest::Client::new();
    let base = format!("http://{}/api/tools/ghost", addr);

    let response = client
        .patch(&base)
        .json(&serde_json::json!({ "enabled": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
    assert!(body["message"].as_str().unwrap().contains("ghost"));

    let response = client.delete(&base).send().await.unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn registering_with_invalid_url_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_hub(test_config(dir.path()), Arc::new(EchoUpstream)).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/api/tools", addr))
        .json(&serde_json::json!({ "name": "Broken", "url": "not a url" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn files_save_content_tree_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_hub(test_config(dir.path()), Arc::new(EchoUpstream)).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{}/api/files/save", addr))
        .json(&serde_json::json!({
            "path": "src/app.ts",
            "content": "export const x = 1;\n"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let saved: serde_json::Value = response.json().await.unwrap();
    assert_eq!(saved["path"], "src/app.ts");

    let content: serde_json::Value = client
        .get(format!("http://{}/api/files/content?path=src/app.ts", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(content["content"], "export const x = 1;\n");

    let tree: serde_json::Value = client
        .get(format!("http://{}/api/files/tree", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tree["type"], "directory");
    let children = tree["children"].as_array().unwrap();
    assert_eq!(children[0]["name"], "src");
    assert_eq!(children[0]["children"][0]["path"], "src/app.ts");
}

#[tokio::test]
async fn path_traversal_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_hub(test_config(dir.path()), Arc::new(EchoUpstream)).await;

    let response = reqwest::get(format!(
        "http://{}/api/files/content?path=../../../etc/passwd",
        addr
    ))
    .await
    .unwrap();
    assert_eq!(response.status(), 403);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "access_denied");
}

#[tokio::test]
async fn missing_file_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_hub(test_config(dir.path()), Arc::new(EchoUpstream)).await;

    let response = reqwest::get(format!("http://{}/api/files/content?path=ghost.txt", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn chat_relays_message_and_context() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_hub(test_config(dir.path()), Arc::new(EchoUpstream)).await;

    let body: serde_json::Value = reqwest::Client::new()
        .post(format!("http://{}/api/chat", addr))
        .json(&serde_json::json!({ "message": "hi", "context": "open file: a.rs" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["reply"], "echo: hi [open file: a.rs]");
    assert_eq!(body["model"], "stub");
}

#[tokio::test]
async fn chat_requires_a_message() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_hub(test_config(dir.path()), Arc::new(EchoUpstream)).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/api/chat", addr))
        .json(&serde_json::json!({ "message": "  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn chat_upstream_failure_maps_to_502() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_hub(test_config(dir.path()), Arc::new(DownUpstream)).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/api/chat", addr))
        .json(&serde_json::json!({ "message": "hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 502);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "upstream_error");
}

#[tokio::test]
async fn remote_session_crud_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_hub(test_config(dir.path()), Arc::new(EchoUpstream)).await;
    let client = reqwest::Client::new();
    let base = format!("http://{}/api/remote", addr);

    let listing: serde_json::Value = client.get(&base).send().await.unwrap().json().await.unwrap();
    assert_eq!(listing["total"].as_u64().unwrap(), 0);

    let response = client
        .post(&base)
        .json(&serde_json::json!({ "name": "dev desktop", "host": "127.0.0.1", "port": 5901 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let session: serde_json::Value = response.json().await.unwrap();
    let id = session["id"].as_str().unwrap().to_string();

    let fetched: serde_json::Value = client
        .get(format!("{}/{}", base, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["name"], "dev desktop");
    assert_eq!(fetched["port"], 5901);

    let response = client
        .delete(format!("{}/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client.get(format!("{}/{}", base, id)).send().await.unwrap();
    assert_eq!(response.status(), 404);

    let response = client.get(format!("{}/ghost", base)).send().await.unwrap();
    assert_eq!(response.status(), 404);
}
