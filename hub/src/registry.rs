//! In-memory tool registry
//!
//! Holds the set of external developer tools (editors, terminals, remote
//! desktops) the hub UI can open. Process-lifetime only; the registry is
//! rebuilt from hub.toml on every start.

use hub_common::{Tool, ToolKind};
use serde::Deserialize;
use std::sync::RwLock;
use uuid::Uuid;

use crate::config::ToolEntry;
use crate::error::{HubError, HubResult};

/// Fields accepted when registering a tool
///
/// Everything but `name` and `url` is optional and defaulted.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterTool {
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<ToolKind>,
    pub description: Option<String>,
    pub url: String,
    pub icon: Option<String>,
    pub enabled: Option<bool>,
}

/// Field-wise update, merged onto the stored tool
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTool {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ToolKind>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub enabled: Option<bool>,
}

/// Tool registry service
pub struct ToolService {
    tools: RwLock<Vec<Tool>>,
}

impl ToolService {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            tools: RwLock::new(Vec::new()),
        }
    }

    /// Registry seeded from config entries; falls back to the builtin set
    /// when the config declares no tools
    pub fn from_config(entries: &[ToolEntry]) -> Self {
        if entries.is_empty() {
            return Self::with_builtins();
        }

        let tools = entries
            .iter()
            .map(|entry| Tool {
                id: entry
                    .id
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string()),
                name: entry.name.clone(),
                kind: entry.kind,
                description: entry.description.clone(),
                url: entry.url.clone(),
                icon: entry.icon.clone().unwrap_or_else(|| "tool".to_string()),
                enabled: entry.enabled,
            })
            .collect();

        Self {
            tools: RwLock::new(tools),
        }
    }

    /// Registry with the default tool set the hub UI expects on first run
    pub fn with_builtins() -> Self {
        let service = Self::new();
        let builtins = [
            RegisterTool {
                id: None,
                name: "Code Editor".to_string(),
                kind: Some(ToolKind::Editor),
                description: Some("Browser code editor".to_string()),
                url: "http://localhost:4440".to_string(),
                icon: Some("code".to_string()),
                enabled: Some(true),
            },
            RegisterTool {
                id: None,
                name: "Remote Desktop".to_string(),
                kind: Some(ToolKind::Desktop),
                description: Some("noVNC remote desktop".to_string()),
                url: "http://localhost:6080/vnc.html".to_string(),
                icon: Some("desktop".to_string()),
                enabled: Some(true),
            },
        ];
        for spec in builtins {
            // Builtin specs are static and always valid
            let _ = service.register(spec);
        }
        service
    }

    /// All enabled tools, in registration order
    pub fn all_tools(&self) -> Vec<Tool> {
        self.tools
            .read()
            .expect("tool registry lock poisoned")
            .iter()
            .filter(|t| t.enabled)
            .cloned()
            .collect()
    }

    /// Every registered tool, including disabled ones (CLI listing)
    pub fn registered_tools(&self) -> Vec<Tool> {
        self.tools
            .read()
            .expect("tool registry lock poisoned")
            .clone()
    }

    /// Look up a tool by id
    pub fn tool_by_id(&self, id: &str) -> HubResult<Tool> {
        self.tools
            .read()
            .expect("tool registry lock poisoned")
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| HubError::ToolNotFound(id.to_string()))
    }

    /// Register a tool, assigning a fresh id (and default kind/icon) when absent
    pub fn register(&self, spec: RegisterTool) -> HubResult<Tool> {
        url::Url::parse(&spec.url)
            .map_err(|e| HubError::InvalidRequest(format!("invalid tool url: {}", e)))?;

        let tool = Tool {
            id: spec.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: spec.name,
            kind: spec.kind.unwrap_or_default(),
            description: spec.description.unwrap_or_default(),
            url: spec.url,
            icon: spec.icon.unwrap_or_else(|| "tool".to_string()),
            enabled: spec.enabled.unwrap_or(true),
        };

        let mut tools = self.tools.write().expect("tool registry lock poisoned");
        if tools.iter().any(|t| t.id == tool.id) {
            return Err(HubError::InvalidRequest(format!(
                "tool id already registered: {}",
                tool.id
            )));
        }
        tools.push(tool.clone());
        Ok(tool)
    }

    /// Merge updates onto an existing tool; errors when the id is unknown
    pub fn update(&self, id: &str, updates: UpdateTool) -> HubResult<Tool> {
        let mut tools = self.tools.write().expect("tool registry lock poisoned");
        let tool = tools
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| HubError::ToolNotFound(id.to_string()))?;

        if let Some(url) = &updates.url {
            url::Url::parse(url)
                .map_err(|e| HubError::InvalidRequest(format!("invalid tool url: {}", e)))?;
        }

        if let Some(name) = updates.name {
            tool.name = name;
        }
        if let Some(kind) = updates.kind {
            tool.kind = kind;
        }
        if let Some(description) = updates.description {
            tool.description = description;
        }
        if let Some(url) = updates.url {
            tool.url = url;
        }
        if let Some(icon) = updates.icon {
            tool.icon = icon;
        }
        if let Some(enabled) = updates.enabled {
            tool.enabled = enabled;
        }

        Ok(tool.clone())
    }

    /// Remove a tool; errors when the id is unknown
    pub fn remove(&self, id: &str) -> HubResult<Tool> {
        let mut tools = self.tools.write().expect("tool registry lock poisoned");
        let index = tools
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| HubError::ToolNotFound(id.to_string()))?;
        Ok(tools.remove(index))
    }
}

impl Default for ToolService {
    fn default() -> Self {
        Self::new()
    }
}
