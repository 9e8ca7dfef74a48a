//! Provider integration tests
//!
//! Tests that reach a real endpoint are `#[ignore]`d and need:
//! - OPENAI_API_KEY for OpenAI tests
//! - a local Ollama server with `mistral:7b-instruct-v0.2-q8_0` pulled
//!
//! Run with: cargo test -p rostrum-llm --test llm_integration -- --ignored

use rostrum_core::{Agent, AgentRole, ModelConfig, ModelPreset, Speaker};
use rostrum_llm::{
    CachedProvider, LlmProvider, LlmRequest, MockProvider, OllamaProvider, OpenAIProvider,
    ToolCall, ToolExecutor,
};

#[tokio::test]
#[ignore = "Requires OPENAI_API_KEY"]
async fn test_openai_real_request() {
    let api_key =
        std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY must be set for this test");

    let provider = OpenAIProvider::new(&api_key, "gpt-4o");
    assert!(provider.is_available().await, "OpenAI should be available");

    let mut request = LlmRequest::with_role(
        "You are a helpful assistant. Be extremely concise.",
        "What is 2 + 2? Answer with just the number.",
    );
    request.temperature = 0.0;
    request.max_tokens = 10;

    let response = provider.complete(request).await.expect("request should succeed");
    assert!(response.content.contains('4'));
    assert!(response.latency_ms > 0);
}

#[tokio::test]
#[ignore = "Requires a local Ollama server"]
async fn test_ollama_real_request() {
    let config = ModelConfig::preset(ModelPreset::Mistral);
    let provider = OllamaProvider::new(config.model_name())
        .with_context_length(config.chat_context_length);

    let response = provider.ask("Say 'hello' in one word").await;
    assert!(response.is_ok(), "Request should succeed: {:?}", response);
}

#[tokio::test]
async fn test_agent_history_reaches_provider() {
    let model = ModelConfig::new("mock");
    let mut agent = Agent::new(AgentRole::Con, "You argue against the motion.", model.clone());
    agent.hear(Speaker::Agent(AgentRole::Pro), "Remote work cuts commutes.");

    let mock = MockProvider::smart().with_latency(0);
    let request = LlmRequest::for_agent(&agent, &model, "Remote work cuts commutes.");
    let reply = mock.complete(request).await.unwrap();

    assert!(reply.content.contains("disagree"));
    let seen = mock.requests();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].history.len(), 1);
    assert_eq!(seen[0].model.as_deref(), Some("mock"));
}

#[tokio::test]
async fn test_cached_mock_is_called_once() {
    let cached = CachedProvider::wrap(MockProvider::constant("same").with_latency(0));

    for _ in 0..3 {
        assert_eq!(cached.ask("repeat").await.unwrap(), "same");
    }
    let stats = cached.stats();
    assert_eq!((stats.hits, stats.misses), (2, 1));
}

#[tokio::test]
async fn test_research_mock_drives_search_tool() {
    use async_trait::async_trait;
    use rostrum_llm::{research_registry, SearchBackend, SearchHit, ToolError};
    use std::sync::Arc;

    #[derive(Debug)]
    struct OneHit;

    #[async_trait]
    impl SearchBackend for OneHit {
        async fn search(&self, _q: &str, _n: usize) -> Result<Vec<SearchHit>, ToolError> {
            Ok(vec![SearchHit {
                title: "Commute study".to_string(),
                url: "https://example.org/commute".to_string(),
                snippet: String::new(),
            }])
        }
    }

    let agent = Agent::research("Use metaphor_search, then done_tool.", ModelConfig::new("mock"));
    let executor = ToolExecutor::new(research_registry(Arc::new(OneHit)), agent.capabilities());
    let mock = MockProvider::smart().with_latency(0);

    let first = ask_as(&mock, &agent, "run the search").await;
    let call = ToolCall::parse(&first).expect("mock should emit a search call");
    let result = executor.execute(&call.name, call.args).await.unwrap();
    assert!(result.message().contains("https://example.org/commute"));

    let second = ask_as(&mock, &agent, &result.message()).await;
    assert!(ToolCall::parse(&second).unwrap().is_done());
}

async fn ask_as(mock: &MockProvider, agent: &Agent, prompt: &str) -> String {
    let model = ModelConfig::new("mock");
    mock.complete(LlmRequest::for_agent(agent, &model, prompt))
        .await
        .unwrap()
        .content
}
