//! REST API handlers: health, tools, chat, remote sessions

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use hub_common::{HealthResponse, Tool};
use serde::Serialize;

use super::state::AppState;
use crate::chat::{ChatReply, ChatRequest};
use crate::error::HubError;
use crate::registry::{RegisterTool, UpdateTool};
use crate::remote::{RegisterSession, RemoteSession};

// ============================================================================
// Health
// ============================================================================

/// Health check endpoint; always 200
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Tools
// ============================================================================

/// List tools response
#[derive(Debug, Serialize)]
pub struct ToolsListResponse {
    pub tools: Vec<Tool>,
    pub total: usize,
}

/// List enabled tools
pub async fn list_tools(State(state): State<AppState>) -> Json<ToolsListResponse> {
    let tools = state.tools.all_tools();
    let total = tools.len();
    Json(ToolsListResponse { tools, total })
}

/// Fetch one tool by id
pub async fn get_tool(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Tool>, HubError> {
    Ok(Json(state.tools.tool_by_id(&id)?))
}

/// Register a new tool
pub async fn register_tool(
    State(state): State<AppState>,
    Json(spec): Json<RegisterTool>,
) -> Result<(StatusCode, Json<Tool>), HubError> {
    let tool = state.tools.register(spec)?;
    tracing::info!("registered tool {} ({})", tool.name, tool.id);
    Ok((StatusCode::CREATED, Json(tool)))
}

/// Merge updates onto a tool
pub async fn update_tool(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(updates): Json<UpdateTool>,
) -> Result<Json<Tool>, HubError> {
    Ok(Json(state.tools.update(&id, updates)?))
}

/// Remove a tool
pub async fn delete_tool(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Tool>, HubError> {
    let removed = state.tools.remove(&id)?;
    tracing::info!("removed tool {} ({})", removed.name, removed.id);
    Ok(Json(removed))
}

// ============================================================================
// Chat
// ============================================================================

/// Relay a chat message to the upstream
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, HubError> {
    if request.message.trim().is_empty() {
        return Err(HubError::InvalidRequest("message is required".to_string()));
    }

    let reply = state
        .chat
        .relay(&request.message, request.context.as_deref())
        .await?;
    Ok(Json(reply))
}

// ============================================================================
// Remote sessions
// ============================================================================

/// List remote sessions response
#[derive(Debug, Serialize)]
pub struct SessionsListResponse {
    pub sessions: Vec<RemoteSession>,
    pub total: usize,
}

/// List registered remote sessions
pub async fn list_sessions(State(state): State<AppState>) -> Json<SessionsListResponse> {
    let sessions = state.remote.list();
    let total = sessions.len();
    Json(SessionsListResponse { sessions, total })
}

/// Register a remote session
pub async fn register_session(
    State(state): State<AppState>,
    Json(spec): Json<RegisterSession>,
) -> Result<(StatusCode, Json<RemoteSession>), HubError> {
    if spec.host.trim().is_empty() {
        return Err(HubError::InvalidRequest("host is required".to_string()));
    }

    let session = state.remote.register(spec);
    tracing::info!(
        "registered remote session {} -> {}:{}",
        session.id,
        session.host,
        session.port
    );
    Ok((StatusCode::CREATED, Json(session)))
}

/// Fetch one remote session
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RemoteSession>, HubError> {
    Ok(Json(state.remote.get(&id)?))
}

/// Unregister a remote session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RemoteSession>, HubError> {
    Ok(Json(state.remote.remove(&id)?))
}
