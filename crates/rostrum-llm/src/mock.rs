//! Mock LLM provider for testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use crate::provider::{LlmError, LlmProvider, LlmRequest, LlmResponse};

/// A mock LLM provider that returns predefined responses
/// Perfect for testing without needing actual LLM access
#[derive(Debug)]
pub struct MockProvider {
    /// Name of this mock
    pub name: String,
    /// Canned responses (cycles through them)
    responses: Vec<String>,
    /// Current response index
    index: AtomicUsize,
    /// Simulated latency in ms
    latency_ms: u64,
    /// Fail every request with this message
    failure: Option<String>,
    /// Every request seen, in order
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockProvider {
    /// Create a new mock provider with given responses
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            name: "mock".to_string(),
            responses,
            index: AtomicUsize::new(0),
            latency_ms: 50,
            failure: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that always returns the same response
    pub fn constant(response: &str) -> Self {
        Self::new(vec![response.to_string()])
    }

    /// Create a mock that replays a script of responses in order
    pub fn scripted<S: AsRef<str>>(responses: &[S]) -> Self {
        Self::new(responses.iter().map(|r| r.as_ref().to_string()).collect())
    }

    /// Create a mock whose every call fails
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new(Vec::new())
        }
    }

    /// Create a smart mock that responds based on prompt and persona
    pub fn smart() -> Self {
        Self {
            name: "smart-mock".to_string(),
            ..Self::new(Vec::new())
        }
    }

    /// Override the simulated latency
    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Number of completions requested so far
    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Snapshot of every request seen so far
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn generate_smart_response(&self, request: &LlmRequest) -> String {
        let system_lower = request.system.to_lowercase();
        let prompt_lower = request.prompt.to_lowercase();

        // Judge persona
        if system_lower.contains("judge") || system_lower.contains("feedback") {
            return "Winner: Pro.\n\n\
                 Strengths: concrete examples and direct rebuttals.\n\
                 Weaknesses: several claims lacked supporting evidence."
                .to_string();
        }

        // Research persona: search once, then finish
        if system_lower.contains("metaphor_search") {
            if prompt_lower.contains("search_results") || prompt_lower.contains("\"url\"") {
                return r#"{"request": "done_tool", "content": "Search complete."}"#.to_string();
            }
            return r#"{"request": "metaphor_search", "query": "debate topic evidence", "num_results": 3}"#
                .to_string();
        }

        if system_lower.contains("against") || system_lower.contains("con side") {
            return format!(
                "I must disagree. Responding to \"{}\": the costs outweigh the benefits.",
                preview(&request.prompt, 60)
            );
        }

        if system_lower.contains("in favor") || system_lower.contains("pro side") {
            return format!(
                "I maintain my position. Responding to \"{}\": the evidence supports it.",
                preview(&request.prompt, 60)
            );
        }

        // Default intelligent response
        format!(
            "I understand you're asking about: \"{}\"\n\n\
             Here's my response based on the context provided.",
            preview(&request.prompt, 50)
        )
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn is_available(&self) -> bool {
        true // Mock is always available
    }

    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = Instant::now();

        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request.clone());
        }

        // Simulate latency
        tokio::time::sleep(std::time::Duration::from_millis(self.latency_ms)).await;

        if let Some(message) = &self.failure {
            return Err(LlmError::RequestFailed(message.clone()));
        }

        let content = if self.responses.is_empty() {
            self.generate_smart_response(&request)
        } else {
            // Cycle through canned responses
            let idx = self.index.fetch_add(1, Ordering::Relaxed);
            self.responses[idx % self.responses.len()].clone()
        };

        Ok(LlmResponse {
            content,
            model: self.name.clone(),
            tokens_used: Some((request.prompt.len() / 4) as u32 + 100),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider() {
        let mock = MockProvider::constant("Hello, world!");
        let response = mock.ask("test").await.unwrap();
        assert_eq!(response, "Hello, world!");
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_scripted_cycles() {
        let mock = MockProvider::scripted(&["one", "two"]).with_latency(0);
        assert_eq!(mock.ask("a").await.unwrap(), "one");
        assert_eq!(mock.ask("b").await.unwrap(), "two");
        assert_eq!(mock.ask("c").await.unwrap(), "one");
        assert_eq!(mock.requests()[1].prompt, "b");
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let mock = MockProvider::failing("quota exceeded").with_latency(0);
        let err = mock.ask("anything").await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_smart_mock_judge() {
        let mock = MockProvider::smart().with_latency(0);
        let response = mock
            .complete(LlmRequest::with_role("You are a debate judge.", "transcript"))
            .await
            .unwrap();
        assert!(response.content.contains("Winner"));
    }
}
