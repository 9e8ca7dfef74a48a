//! Tools granted to research agents
//!
//! - [`WebSearchTool`] - `metaphor_search`, backed by a [`SearchBackend`]
//! - [`DoneTool`] - `done_tool`, the completion signal

mod done;
mod search;

pub use done::{DoneTool, DONE_TOOL_NAME};
pub use search::{ExaSearchBackend, SearchBackend, SearchHit, WebSearchTool, SEARCH_TOOL_NAME};

use std::sync::Arc;
use crate::tool::ToolRegistry;

/// Create the registry offered to a research agent: search plus done
pub fn research_registry(backend: Arc<dyn SearchBackend>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(WebSearchTool::new(backend)));
    registry.register(Arc::new(DoneTool::new()));
    registry
}

/// Usage lines for the research tools, in registry order
pub fn research_tool_usage() -> String {
    [DoneTool::DEFINITION, WebSearchTool::DEFINITION]
        .iter()
        .map(|def| def.usage_hint())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::tool_error::ToolError;

    #[derive(Debug)]
    struct EmptyBackend;

    #[async_trait]
    impl SearchBackend for EmptyBackend {
        async fn search(&self, _query: &str, _n: usize) -> Result<Vec<SearchHit>, ToolError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_research_registry() {
        let registry = research_registry(Arc::new(EmptyBackend));

        assert!(registry.contains(SEARCH_TOOL_NAME));
        assert!(registry.contains(DONE_TOOL_NAME));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.usage(), research_tool_usage());
    }
}
