//! Shared application state

use std::sync::Arc;

use crate::chat::{ChatUpstream, OllamaUpstream};
use crate::config::HubConfig;
use crate::error::HubResult;
use crate::files::Sandbox;
use crate::registry::ToolService;
use crate::remote::RemoteManager;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Tool registry
    pub tools: Arc<ToolService>,
    /// File proxy sandbox
    pub sandbox: Arc<Sandbox>,
    /// Chat relay backend
    pub chat: Arc<dyn ChatUpstream>,
    /// Remote desktop sessions
    pub remote: Arc<RemoteManager>,
    /// Depth cap for tree listings
    pub max_tree_depth: usize,
}

impl AppState {
    /// Create app state from config with the production chat upstream
    pub fn new(config: &HubConfig) -> HubResult<Self> {
        let upstream = Arc::new(OllamaUpstream::new(&config.chat));
        Self::with_upstream(config, upstream)
    }

    /// Create app state with a specific chat upstream (tests inject stubs)
    pub fn with_upstream(
        config: &HubConfig,
        upstream: Arc<dyn ChatUpstream>,
    ) -> HubResult<Self> {
        Ok(Self {
            tools: Arc::new(ToolService::from_config(&config.tools)),
            sandbox: Arc::new(Sandbox::new(&config.files)?),
            chat: upstream,
            remote: Arc::new(RemoteManager::new()),
            max_tree_depth: config.files.max_tree_depth,
        })
    }
}
