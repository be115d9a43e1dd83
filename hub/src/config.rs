//! Configuration loading

use anyhow::Result;
use hub_common::ToolKind;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Find a config file by walking up the directory tree, then checking global config.
///
/// Search order:
/// 1. Current directory and parent directories (walking up to root)
/// 2. Global config at ~/.config/hub/
///
/// Returns the path if found, None otherwise.
fn find_config_file(filename: &str) -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let candidate = current.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break, // Reached filesystem root
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global_path = config_dir.join("hub").join(filename);
        if global_path.exists() {
            return Some(global_path);
        }
    }

    None
}

/// Top-level hub configuration (from hub.toml)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HubConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    /// Tools seeded into the registry at startup
    #[serde(default)]
    pub tools: Vec<ToolEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Include error detail in responses and serve the dev fallback page
    #[serde(default)]
    pub dev_mode: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            dev_mode: false,
        }
    }
}

/// File proxy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Workspace root all browse/save requests are resolved against
    #[serde(default = "default_root")]
    pub root: String,
    /// Entry names never listed or served
    #[serde(default = "default_deny")]
    pub deny: Vec<String>,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    #[serde(default = "default_max_tree_depth")]
    pub max_tree_depth: usize,
}

fn default_root() -> String {
    "~".to_string()
}

fn default_deny() -> Vec<String> {
    vec![
        ".git".to_string(),
        "node_modules".to_string(),
        "target".to_string(),
    ]
}

fn default_max_file_size() -> u64 {
    2 * 1024 * 1024
}

fn default_max_tree_depth() -> usize {
    4
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            deny: default_deny(),
            max_file_size: default_max_file_size(),
            max_tree_depth: default_max_tree_depth(),
        }
    }
}

/// Chat relay configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Base URL of the upstream chat endpoint
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    pub system_prompt: Option<String>,
}

fn default_upstream_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.1:8b".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            upstream_url: default_upstream_url(),
            model: default_model(),
            system_prompt: None,
        }
    }
}

/// A tool declared in hub.toml
#[derive(Debug, Clone, Deserialize)]
pub struct ToolEntry {
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ToolKind,
    #[serde(default)]
    pub description: String,
    pub url: String,
    pub icon: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl HubConfig {
    /// Load hub.toml
    ///
    /// Search order:
    /// 1. Walk up directory tree from cwd looking for hub.toml
    /// 2. Check ~/.config/hub/hub.toml (global fallback)
    ///
    /// Falls back to defaults when no file is found.
    pub fn load() -> Result<Self> {
        if let Some(config_path) = find_config_file("hub.toml") {
            tracing::debug!("Loading config from: {}", config_path.display());
            return Self::load_from_path(&config_path);
        }

        tracing::debug!("No hub.toml found, using defaults");
        Ok(Self::default())
    }

    /// Load from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }
}
