//! Chat relay
//!
//! The hub does not run a model itself; `POST /api/chat` forwards to an
//! upstream chat endpoint and hands the reply back. The upstream sits behind
//! [`ChatUpstream`] so tests can swap in a stub.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ChatConfig;
use crate::error::{HubError, HubResult};

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Optional frontend context (open file, selection) passed through as a
    /// system message
    #[serde(default)]
    pub context: Option<String>,
}

/// Relayed reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    pub model: String,
}

/// Trait for chat backends
#[async_trait]
pub trait ChatUpstream: Send + Sync {
    /// Relay a single message and return the reply
    async fn relay(&self, message: &str, context: Option<&str>) -> HubResult<ChatReply>;
}

// Ollama-style /api/chat wire format

#[derive(Debug, Serialize)]
struct UpstreamMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct UpstreamRequest {
    model: String,
    messages: Vec<UpstreamMessage>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct UpstreamReplyMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct UpstreamResponse {
    message: UpstreamReplyMessage,
}

/// Relay to an Ollama-compatible `/api/chat` endpoint
pub struct OllamaUpstream {
    client: reqwest::Client,
    base: url::Url,
    model: String,
    system_prompt: Option<String>,
}

impl OllamaUpstream {
    pub fn new(config: &ChatConfig) -> Self {
        let base = url::Url::parse(&config.upstream_url)
            .unwrap_or_else(|_| url::Url::parse("http://localhost:11434").unwrap());

        Self {
            client: reqwest::Client::new(),
            base,
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
        }
    }
}

#[async_trait]
impl ChatUpstream for OllamaUpstream {
    async fn relay(&self, message: &str, context: Option<&str>) -> HubResult<ChatReply> {
        let mut messages = Vec::new();
        if let Some(system) = &self.system_prompt {
            messages.push(UpstreamMessage {
                role: "system",
                content: system.clone(),
            });
        }
        if let Some(context) = context {
            messages.push(UpstreamMessage {
                role: "system",
                content: format!("Context:\n{}", context),
            });
        }
        messages.push(UpstreamMessage {
            role: "user",
            content: message.to_string(),
        });

        let request = UpstreamRequest {
            model: self.model.clone(),
            messages,
            stream: false,
        };

        let api_url = format!("{}api/chat", self.base);
        let response = self
            .client
            .post(&api_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| HubError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(HubError::Upstream(format!(
                "upstream returned {}",
                response.status()
            )));
        }

        let body: UpstreamResponse = response
            .json()
            .await
            .map_err(|e| HubError::Upstream(format!("invalid upstream body: {}", e)))?;

        Ok(ChatReply {
            reply: body.message.content,
            model: self.model.clone(),
        })
    }
}
