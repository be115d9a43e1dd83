//! Remote desktop session registry
//!
//! Sessions registered here are the targets the VNC WebSocket bridge
//! (`/ws/vnc/{id}`) connects to. In-memory, process lifetime, same shape as
//! the tool registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::{HubError, HubResult};

/// A registered remote-desktop endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSession {
    pub id: String,
    pub name: String,
    /// TCP endpoint of the VNC server
    pub host: String,
    pub port: u16,
    /// Tool this session belongs to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/remote`
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterSession {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub tool_id: Option<String>,
}

pub struct RemoteManager {
    sessions: RwLock<Vec<RemoteSession>>,
}

impl RemoteManager {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(Vec::new()),
        }
    }

    pub fn list(&self) -> Vec<RemoteSession> {
        self.sessions
            .read()
            .expect("remote session lock poisoned")
            .clone()
    }

    pub fn register(&self, spec: RegisterSession) -> RemoteSession {
        let session = RemoteSession {
            id: Uuid::new_v4().to_string(),
            name: spec.name,
            host: spec.host,
            port: spec.port,
            tool_id: spec.tool_id,
            created_at: Utc::now(),
        };

        self.sessions
            .write()
            .expect("remote session lock poisoned")
            .push(session.clone());
        session
    }

    pub fn get(&self, id: &str) -> HubResult<RemoteSession> {
        self.sessions
            .read()
            .expect("remote session lock poisoned")
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| HubError::SessionNotFound(id.to_string()))
    }

    pub fn remove(&self, id: &str) -> HubResult<RemoteSession> {
        let mut sessions = self.sessions.write().expect("remote session lock poisoned");
        let index = sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| HubError::SessionNotFound(id.to_string()))?;
        Ok(sessions.remove(index))
    }
}

impl Default for RemoteManager {
    fn default() -> Self {
        Self::new()
    }
}
