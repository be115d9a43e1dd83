//! File proxy handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::state::AppState;
use crate::error::HubError;
use crate::files::{self, FileContent, FileNode, SaveResult};

/// Query parameters for `GET /api/files/tree`
#[derive(Debug, Deserialize)]
pub struct TreeQuery {
    pub path: Option<String>,
    pub depth: Option<usize>,
}

/// Query parameters for `GET /api/files/content`
#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    pub path: String,
}

/// Body of `POST /api/files/save`
#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub path: String,
    pub content: String,
}

/// Bounded-depth file tree
pub async fn tree(
    State(state): State<AppState>,
    Query(params): Query<TreeQuery>,
) -> Result<Json<FileNode>, HubError> {
    let depth = params
        .depth
        .unwrap_or(state.max_tree_depth)
        .min(state.max_tree_depth);

    let node = files::tree(&state.sandbox, params.path.as_deref(), depth).await?;
    Ok(Json(node))
}

/// File contents
pub async fn content(
    State(state): State<AppState>,
    Query(params): Query<ContentQuery>,
) -> Result<Json<FileContent>, HubError> {
    let file = files::content(&state.sandbox, &params.path).await?;
    Ok(Json(file))
}

/// Save file contents
pub async fn save(
    State(state): State<AppState>,
    Json(request): Json<SaveRequest>,
) -> Result<Json<SaveResult>, HubError> {
    let result = files::save(&state.sandbox, &request.path, &request.content).await?;
    tracing::info!("saved {} ({} bytes)", result.path, result.bytes_written);
    Ok(Json(result))
}
