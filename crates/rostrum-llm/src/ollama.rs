//! Ollama provider for local models
//!
//! Reached through model names of the form `ollama/<model>`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::provider::{LlmError, LlmProvider, LlmRequest, LlmResponse};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

#[derive(Debug, Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: Vec<ChatLine<'a>>,
    stream: bool,
    options: Options,
}

#[derive(Debug, Serialize)]
struct ChatLine<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct Options {
    temperature: f32,
    num_predict: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_ctx: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    message: ReplyLine,
    model: String,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ReplyLine {
    content: String,
}

#[derive(Debug)]
pub struct OllamaProvider {
    base_url: String,
    /// Used when a request names no model
    model: String,
    /// Sent as `num_ctx` when set
    context_length: Option<u32>,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(model: &str) -> Self {
        Self::with_url(DEFAULT_OLLAMA_URL, model)
    }

    pub fn with_url(base_url: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            context_length: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_context_length(mut self, context_length: Option<u32>) -> Self {
        self.context_length = context_length;
        self
    }

    fn options(&self, request: &LlmRequest) -> Options {
        Options {
            temperature: request.temperature,
            num_predict: request.max_tokens,
            num_ctx: self.context_length,
            seed: request.seed,
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn is_available(&self) -> bool {
        self.client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .is_ok()
    }

    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let started = Instant::now();
        let body = ChatBody {
            model: request.model.as_deref().unwrap_or(&self.model),
            messages: request
                .conversation()
                .into_iter()
                .map(|(role, content)| ChatLine { role, content })
                .collect(),
            stream: false,
            options: self.options(&request),
        };
        debug!(model = body.model, num_ctx = ?body.options.num_ctx, "Sending Ollama chat request");

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LlmError::RequestFailed(format!("Ollama returned {}", response.status())));
        }

        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        Ok(LlmResponse {
            content: reply.message.content,
            model: reply.model,
            tokens_used: reply.eval_count,
            latency_ms: started.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_skip_unset_fields() {
        let provider = OllamaProvider::new("mistral:7b-instruct-v0.2-q8_0");
        let request = LlmRequest::with_role("Judge.", "Transcript");

        let json = serde_json::to_value(provider.options(&request)).unwrap();
        assert!(json.get("num_ctx").is_none());
        assert_eq!(json["num_predict"], request.max_tokens);

        let provider = provider.with_context_length(Some(16_000));
        let json = serde_json::to_value(provider.options(&request)).unwrap();
        assert_eq!(json["num_ctx"], 16_000);
    }

    #[test]
    fn test_reply_parses() {
        let body = r#"{"model": "mistral", "message": {"role": "assistant", "content": "Hi"}, "done": true}"#;
        let reply: ChatReply = serde_json::from_str(body).unwrap();
        assert_eq!(reply.message.content, "Hi");
        assert!(reply.eval_count.is_none());
    }

    #[tokio::test]
    #[ignore] // Requires Ollama running locally
    async fn test_ollama_available() {
        let provider = OllamaProvider::new("mistral:7b-instruct-v0.2-q8_0");
        if provider.is_available().await {
            let response = provider.ask("Say hello in one word").await.unwrap();
            assert!(!response.is_empty());
        }
    }
}
