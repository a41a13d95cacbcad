//! Provider trait: the abstraction over inference backends.
//!
//! A Provider takes a system prompt plus a conversation-derived prompt and
//! hands back a stream of text fragments. The stream is finite and ends with
//! exactly one fragment marked `done`, or with an error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use crate::error::ProviderError;

/// A single generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "llama3:latest")
    pub model: String,

    /// System instructions, including the tool catalogue
    #[serde(rename = "system")]
    pub system_prompt: String,

    /// The rendered conversation
    pub prompt: String,

    /// Whether to stream the response
    #[serde(default = "default_stream")]
    pub stream: bool,
}

fn default_stream() -> bool {
    true
}

impl ProviderRequest {
    /// Create a streaming request.
    pub fn new(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            system_prompt: system_prompt.into(),
            prompt: prompt.into(),
            stream: true,
        }
    }
}

/// A single fragment in a streaming response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamChunk {
    /// Partial text
    #[serde(default)]
    pub content: String,

    /// Whether this is the final fragment
    #[serde(default)]
    pub done: bool,
}

impl StreamChunk {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            done: false,
        }
    }

    pub fn last(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            done: true,
        }
    }
}

/// Receiving half of a provider stream.
///
/// Items are delivered in emission order. `Err` items for which
/// [`ProviderError::is_recoverable`] is true may be skipped; any other
/// `Err` ends the stream.
pub type ChunkReceiver = mpsc::Receiver<std::result::Result<StreamChunk, ProviderError>>;

/// The core Provider trait.
///
/// The agent loop calls `stream()` without knowing which backend is in use.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "ollama").
    fn name(&self) -> &str;

    /// Send a request and get a stream of response fragments.
    ///
    /// Fails before any fragment is produced when the backend cannot be
    /// reached or rejects the request.
    async fn stream(&self, request: ProviderRequest) -> std::result::Result<ChunkReceiver, ProviderError>;

    /// List available models for this provider.
    async fn list_models(&self) -> std::result::Result<Vec<String>, ProviderError> {
        Ok(Vec::new())
    }

    /// Health check: can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}
