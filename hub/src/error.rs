//! Error types for the hub
//!
//! [`HubError`] is the library-wide error. The HTTP layer relies on its
//! `IntoResponse` impl to turn any failed handler into a JSON error body
//! with the matching status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hub_common::ErrorBody;
use std::sync::OnceLock;
use thiserror::Error;

/// Whether error responses carry a `detail` field (dev mode only).
///
/// Set once at server startup; defaults to off so production responses
/// never leak internals.
static EXPOSE_DETAIL: OnceLock<bool> = OnceLock::new();

pub fn set_expose_detail(on: bool) {
    let _ = EXPOSE_DETAIL.set(on);
}

fn expose_detail() -> bool {
    EXPOSE_DETAIL.get().copied().unwrap_or(false)
}

pub type HubResult<T> = Result<T, HubError>;

#[derive(Debug, Error)]
pub enum HubError {
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    #[error("remote session not found: {0}")]
    SessionNotFound(String),

    #[error("path not found: {0}")]
    PathNotFound(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("file too large: {size} bytes (max {max})")]
    FileTooLarge { size: u64, max: u64 },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("chat upstream error: {0}")]
    Upstream(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl HubError {
    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            HubError::ToolNotFound(_)
            | HubError::SessionNotFound(_)
            | HubError::PathNotFound(_) => StatusCode::NOT_FOUND,
            HubError::AccessDenied(_) => StatusCode::FORBIDDEN,
            HubError::InvalidPath(_) | HubError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            HubError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            HubError::Upstream(_) => StatusCode::BAD_GATEWAY,
            HubError::Config(_) | HubError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short category for the `error` field of the JSON body
    fn category(&self) -> &'static str {
        match self {
            HubError::ToolNotFound(_)
            | HubError::SessionNotFound(_)
            | HubError::PathNotFound(_) => "not_found",
            HubError::AccessDenied(_) => "access_denied",
            HubError::InvalidPath(_) => "invalid_path",
            HubError::FileTooLarge { .. } => "file_too_large",
            HubError::InvalidRequest(_) => "invalid_request",
            HubError::Upstream(_) => "upstream_error",
            HubError::Config(_) => "config_error",
            HubError::Io(_) => "io_error",
        }
    }
}

impl IntoResponse for HubError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }

        let mut body = ErrorBody::new(self.category(), self.to_string());
        if expose_detail() {
            body.detail = Some(format!("{:?}", self));
        }

        (status, Json(body)).into_response()
    }
}
