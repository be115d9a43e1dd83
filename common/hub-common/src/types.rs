//! Wire types shared between the hub server and its clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of a registered tool
///
/// Serialized as the `type` field of a [`Tool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// Code editor reachable over HTTP (e.g. a code-server instance)
    Editor,
    /// Web terminal
    Terminal,
    /// Remote desktop session
    Desktop,
    /// Generic web tool
    #[default]
    Web,
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ToolKind::Editor => "editor",
            ToolKind::Terminal => "terminal",
            ToolKind::Desktop => "desktop",
            ToolKind::Web => "web",
        };
        f.write_str(s)
    }
}

/// An external developer utility registered for access from the hub UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// Unique identifier (assigned at registration when absent)
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ToolKind,
    #[serde(default)]
    pub description: String,
    /// Where the frontend should point to reach the tool
    pub url: String,
    pub icon: String,
    pub enabled: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// RFC 3339 UTC timestamp of the probe
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

/// JSON error body returned by the HTTP layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Short error category (e.g. "not_found")
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Source chain, present only in dev mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: Some(message.into()),
            detail: None,
        }
    }
}
