//! # Rostrum LLM
//!
//! Model providers and tool plumbing for Rostrum agents.
//!
//! ## Supported Backends
//!
//! | Provider | Type | Key Required |
//! |----------|------|--------------|
//! | OpenAI (and compatible) | API | `OPENAI_API_KEY` |
//! | Ollama | Local | None |
//! | Mock | Testing | None |
//!
//! Model names prefixed with `ollama/` route to Ollama; see [`ProviderRouter`].
//!
//! ## Quick Start
//!
//! ```rust
//! use rostrum_llm::{MockProvider, LlmProvider};
//!
//! #[tokio::main]
//! async fn main() {
//!     let llm = MockProvider::smart();
//!     let response = llm.ask("Is remote work here to stay?").await.unwrap();
//!     println!("{}", response);
//! }
//! ```
//!
//! ## Tools
//!
//! Research agents call tools by replying with `{"request": "<tool>", ...}`.
//! [`ToolCall::parse`] extracts the call and [`ToolExecutor`] runs it after
//! checking the agent holds the tool's capability.

pub mod cached_provider;
pub mod config;
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod provider;
pub mod router;
pub mod tool;
pub mod tool_call;
pub mod tool_error;
pub mod tool_executor;
pub mod tool_result;
pub mod tools;

pub use cached_provider::{CacheStats, CachedProvider, LlmCacheConfig};
pub use config::{ConfigError, LlmConfig, RostrumConfig, Settings};
pub use mock::MockProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAIProvider;
pub use provider::{ChatMessage, ChatRole, LlmError, LlmProvider, LlmRequest, LlmResponse};
pub use router::{ProviderResolver, ProviderRouter, RoleProviders};
pub use tool::{Tool, ToolDefinition, ToolRegistry};
pub use tool_call::{is_done_signal, ToolCall};
pub use tool_error::ToolError;
pub use tool_executor::ToolExecutor;
pub use tool_result::ToolResult;
pub use tools::{
    research_registry, research_tool_usage, DoneTool, ExaSearchBackend, SearchBackend, SearchHit, WebSearchTool,
    DONE_TOOL_NAME, SEARCH_TOOL_NAME,
};
