//! Web search tool backed by the Exa (formerly Metaphor) search API
//!
//! The tool is exposed to agents as `metaphor_search`. The backend is a
//! trait so sessions can run against a recorded or scripted search in tests.

use async_trait::async_trait;
use rostrum_core::AgentCapability;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::tool::{Tool, ToolDefinition};
use crate::tool_error::ToolError;

pub const SEARCH_TOOL_NAME: &str = "metaphor_search";

const DEFAULT_NUM_RESULTS: u64 = 3;
const MAX_NUM_RESULTS: u64 = 10;

/// One search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub snippet: String,
}

/// A web search service
#[async_trait]
pub trait SearchBackend: Send + Sync + std::fmt::Debug {
    /// Run a query and return at most `num_results` hits
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchHit>, ToolError>;
}

/// Exa search API client
#[derive(Debug)]
pub struct ExaSearchBackend {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExaRequest<'a> {
    query: &'a str,
    num_results: usize,
    use_autoprompt: bool,
    contents: ExaContents,
}

#[derive(Debug, Serialize)]
struct ExaContents {
    highlights: bool,
}

#[derive(Debug, Deserialize)]
struct ExaResponse {
    results: Vec<ExaResult>,
}

#[derive(Debug, Deserialize)]
struct ExaResult {
    url: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    highlights: Vec<String>,
}

impl ExaSearchBackend {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: "https://api.exa.ai".to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SearchBackend for ExaSearchBackend {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchHit>, ToolError> {
        let body = ExaRequest {
            query,
            num_results,
            use_autoprompt: true,
            contents: ExaContents { highlights: true },
        };

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("x-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ToolError::execution_failed(SEARCH_TOOL_NAME, e.to_string()))?;

        if !response.status().is_success() {
            return Err(ToolError::execution_failed(
                SEARCH_TOOL_NAME,
                format!("Status: {}", response.status()),
            ));
        }

        let parsed: ExaResponse = response
            .json()
            .await
            .map_err(|e| ToolError::execution_failed(SEARCH_TOOL_NAME, e.to_string()))?;

        Ok(parsed
            .results
            .into_iter()
            .map(|r| SearchHit {
                title: r.title.unwrap_or_default(),
                url: r.url,
                snippet: r.highlights.join(" "),
            })
            .collect())
    }
}

/// The `metaphor_search` tool
pub struct WebSearchTool {
    backend: Arc<dyn SearchBackend>,
}

impl WebSearchTool {
    pub const DEFINITION: ToolDefinition = ToolDefinition::new(
        SEARCH_TOOL_NAME,
        "search the web (num_results between 1 and 10)",
        r#"{"request": "metaphor_search", "query": "<query>", "num_results": 3}"#,
    );

    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    fn num_results(args: &Value) -> u64 {
        args.get("num_results")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_NUM_RESULTS)
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn definition(&self) -> &ToolDefinition {
        &Self::DEFINITION
    }

    fn capability(&self) -> AgentCapability {
        AgentCapability::Search
    }

    fn validate(&self, args: &Value) -> Result<(), ToolError> {
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::invalid_args(SEARCH_TOOL_NAME, "Missing 'query' field"))?;
        if query.trim().is_empty() {
            return Err(ToolError::invalid_args(SEARCH_TOOL_NAME, "Query must not be empty"));
        }

        let n = Self::num_results(args);
        if n == 0 || n > MAX_NUM_RESULTS {
            return Err(ToolError::invalid_args(
                SEARCH_TOOL_NAME,
                format!("num_results must be between 1 and {}, got {}", MAX_NUM_RESULTS, n),
            ));
        }
        Ok(())
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(20)
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let query = args.get("query").and_then(Value::as_str).unwrap_or_default();
        let hits = self
            .backend
            .search(query, Self::num_results(&args) as usize)
            .await?;

        Ok(serde_json::json!({ "search_results": hits }))
    }
}
