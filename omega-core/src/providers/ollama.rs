//! Ollama provider implementation using rig-core

use async_trait::async_trait;
use rig::client::{CompletionClient, Nothing};
use rig::completion::Prompt;
use rig::providers::ollama;

use crate::config::RuntimeConfig;
use crate::{Error, Result};

use super::{CompletionRequest, CompletionResponse, LlmProvider, TokenUsage};

/// Ollama provider using rig-core
///
/// One client serves every council seat; the model is chosen per request.
pub struct OllamaProvider {
    client: ollama::Client,
}

impl OllamaProvider {
    /// Create with default localhost URL (http://localhost:11434)
    pub fn new() -> Result<Self> {
        let client = ollama::Client::builder()
            .api_key(Nothing)
            .build()
            .map_err(|e| Error::Provider(format!("Failed to build Ollama client: {}", e)))?;

        Ok(Self { client })
    }

    /// Create with custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = ollama::Client::builder()
            .api_key(Nothing)
            .base_url(base_url.into())
            .build()
            .map_err(|e| Error::Provider(format!("Failed to build Ollama client: {}", e)))?;

        Ok(Self { client })
    }

    /// Create from runtime configuration (base_url, then OLLAMA_API_BASE_URL, then localhost)
    pub fn from_config(config: &RuntimeConfig) -> Result<Self> {
        match config.resolved_base_url() {
            Some(base_url) => Self::with_base_url(base_url),
            None => Self::new(),
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let mut builder = self.client.agent(request.model.as_str());
        if let Some(max_tokens) = request.max_tokens {
            builder = builder.max_tokens(u64::from(max_tokens));
        }
        if let Some(temperature) = request.temperature {
            builder = builder.temperature(f64::from(temperature));
        }
        let agent = builder.build();

        let response = agent.prompt(request.prompt.as_str()).await.map_err(|e| {
            Error::Provider(format!(
                "Ollama completion failed for model {}: {}",
                request.model, e
            ))
        })?;

        // rig's plain prompt API exposes no usage counts
        let usage = TokenUsage::estimate(&request.prompt, &response);

        Ok(CompletionResponse {
            content: response,
            usage,
        })
    }
}
