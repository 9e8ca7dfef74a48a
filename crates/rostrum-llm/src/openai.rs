//! OpenAI chat-completions provider
//!
//! Also serves any OpenAI-compatible endpoint through `OPENAI_BASE_URL`.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::provider::{LlmError, LlmProvider, LlmRequest, LlmResponse};

#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionReply {
    choices: Vec<Choice>,
    model: String,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u32,
}

#[derive(Debug)]
pub struct OpenAIProvider {
    api_key: String,
    /// Used when a request names no model
    model: String,
    client: reqwest::Client,
    base_url: String,
}

impl OpenAIProvider {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
            base_url: "https://api.openai.com".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn is_available(&self) -> bool {
        self.client
            .get(format!("{}/v1/models", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .is_ok_and(|r| r.status().is_success())
    }

    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let started = Instant::now();
        let body = CompletionBody {
            model: request.model.as_deref().unwrap_or(&self.model),
            messages: request
                .conversation()
                .into_iter()
                .map(|(role, content)| WireMessage { role, content })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            seed: request.seed,
        };
        debug!(model = body.model, messages = body.messages.len(), "Sending completion request");

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ConnectionFailed(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::TOO_MANY_REQUESTS => return Err(LlmError::RateLimited),
            status => {
                let detail = response.text().await.unwrap_or_default();
                return Err(LlmError::RequestFailed(format!("{}: {}", status, detail)));
            }
        }

        let reply: CompletionReply = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("reply has no message content".to_string()))?;

        Ok(LlmResponse {
            content,
            model: reply.model,
            tokens_used: reply.usage.map(|u| u.total_tokens),
            latency_ms: started.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalised() {
        let provider = OpenAIProvider::new("sk-test", "gpt-4o").with_base_url("http://localhost:8080/");
        assert_eq!(provider.base_url, "http://localhost:8080");
        assert_eq!(provider.model, "gpt-4o");
    }

    #[test]
    fn test_body_uses_request_model() {
        let mut request = LlmRequest::with_role("Argue for.", "Open.");
        request.model = Some("gpt-4".to_string());
        let body = CompletionBody {
            model: request.model.as_deref().unwrap_or("gpt-4o"),
            messages: request
                .conversation()
                .into_iter()
                .map(|(role, content)| WireMessage { role, content })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            seed: None,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["messages"][0]["role"], "system");
        assert!(json.get("seed").is_none());
    }

    #[test]
    fn test_reply_without_content_parses() {
        let body = r#"{"choices": [{"message": {"content": null}}], "model": "gpt-4o"}"#;
        let parsed: CompletionReply = serde_json::from_str(body).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
        assert!(parsed.usage.is_none());
    }
}
