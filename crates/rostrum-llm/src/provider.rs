//! LLM Provider trait and common types

use async_trait::async_trait;
use rostrum_core::{Agent, ModelConfig, Speaker};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Errors from LLM providers
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Rate limited")]
    RateLimited,
}

/// Chat role of a prior message as seen by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A prior message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// A request to an LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    /// System prompt (role/persona)
    pub system: String,
    /// Accumulated conversation, oldest first
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    /// New input for this step
    pub prompt: String,
    /// Temperature (0.0 = deterministic, 1.0 = creative)
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Model override; providers fall back to their own default
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl LlmRequest {
    /// Create a simple request with default settings
    pub fn simple(prompt: &str) -> Self {
        Self::with_role("You are a helpful assistant.", prompt)
    }

    /// Create a request with a specific role
    pub fn with_role(system: &str, prompt: &str) -> Self {
        Self {
            system: system.to_string(),
            history: Vec::new(),
            prompt: prompt.to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            model: None,
            seed: None,
        }
    }

    /// Rough prompt size, at four characters per token
    pub fn estimated_prompt_tokens(&self) -> u32 {
        let chars = self.system.len()
            + self.history.iter().map(|m| m.content.len()).sum::<usize>()
            + self.prompt.len();
        u32::try_from(chars / 4).unwrap_or(u32::MAX)
    }

    /// System prompt, history and the new prompt as `(role, content)`
    /// pairs, in the order chat APIs expect them
    pub fn conversation(&self) -> Vec<(&'static str, &str)> {
        std::iter::once(("system", self.system.as_str()))
            .chain(
                self.history
                    .iter()
                    .map(|m| (m.role.as_str(), m.content.as_str())),
            )
            .chain(std::iter::once(("user", self.prompt.as_str())))
            .collect()
    }

    /// Build the request for one generation step of an agent.
    ///
    /// The agent's own utterances become assistant messages; everything it
    /// heard becomes user messages, prefixed with the speaker so the model
    /// can tell its opponent from tool output.
    pub fn for_agent(agent: &Agent, model: &ModelConfig, prompt: &str) -> Self {
        let own = agent.own_speaker();
        let history = agent
            .history()
            .records()
            .iter()
            .map(|record| {
                if record.speaker == own || record.speaker == Speaker::Agent(agent.role) {
                    ChatMessage {
                        role: ChatRole::Assistant,
                        content: record.content.clone(),
                    }
                } else {
                    ChatMessage {
                        role: ChatRole::User,
                        content: format!("{}: {}", record.speaker, record.content),
                    }
                }
            })
            .collect();

        let mut request = Self {
            system: agent.system_message().to_string(),
            history,
            prompt: prompt.to_string(),
            temperature: model.temperature,
            max_tokens: model.max_output_tokens,
            model: Some(model.model_name().to_string()),
            seed: model.seed,
        };
        request.max_tokens = model.output_limit(request.estimated_prompt_tokens());
        request
    }
}

/// Response from an LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// The generated text
    pub content: String,
    /// Model used
    pub model: String,
    /// Tokens used (if available)
    pub tokens_used: Option<u32>,
    /// Time taken in milliseconds
    pub latency_ms: u64,
}

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync + std::fmt::Debug {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Check if the provider is available
    async fn is_available(&self) -> bool;

    /// Generate a completion
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Generate with a simple prompt (convenience method)
    async fn ask(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self.complete(LlmRequest::simple(prompt)).await?;
        Ok(response.content)
    }
}

#[async_trait]
impl<P: LlmProvider + ?Sized> LlmProvider for Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn is_available(&self) -> bool {
        (**self).is_available().await
    }

    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        (**self).complete(request).await
    }
}
