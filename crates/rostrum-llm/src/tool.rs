//! Tools an agent can call, and the registry that holds them
//!
//! Agents call a tool by replying with a JSON object whose `request` field
//! names it. Each tool is tied to the [`AgentCapability`] an agent must
//! hold before the executor will run it.

use async_trait::async_trait;
use rostrum_core::AgentCapability;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::tool_error::ToolError;

/// Name, purpose and call format of a tool.
///
/// ```
/// use rostrum_llm::ToolDefinition;
///
/// const LOOKUP: ToolDefinition = ToolDefinition::new(
///     "lookup",
///     "look a term up",
///     r#"{"request": "lookup", "term": "<term>"}"#,
/// );
/// assert!(LOOKUP.usage_hint().contains(r#"{"request": "lookup""#));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolDefinition {
    /// Value of the `request` field that selects this tool
    pub name: &'static str,
    pub description: &'static str,
    /// A complete call, with placeholders in angle brackets
    pub example: &'static str,
}

impl ToolDefinition {
    pub const fn new(name: &'static str, description: &'static str, example: &'static str) -> Self {
        Self {
            name,
            description,
            example,
        }
    }

    /// One line telling a model when and how to call this tool
    pub fn usage_hint(&self) -> String {
        format!("To {}, reply with only {}", self.description, self.example)
    }
}

/// A callable tool.
///
/// The executor calls `validate()` first, then `execute()` under `timeout()`.
#[async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> &ToolDefinition;

    /// Capability the calling agent must hold
    fn capability(&self) -> AgentCapability;

    async fn execute(&self, args: Value) -> Result<Value, ToolError>;

    fn validate(&self, _args: &Value) -> Result<(), ToolError> {
        Ok(())
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(30)
    }
}

/// Tools offered to one agent, keyed by name
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. Returns `false` and keeps the first one on a name clash.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> bool {
        let name = tool.definition().name;
        if self.tools.contains_key(name) {
            warn!(tool = name, "Duplicate tool name; keeping the first registration");
            return false;
        }
        self.tools.insert(name, tool);
        true
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Tool names in sorted order
    pub fn names(&self) -> Vec<&'static str> {
        self.tools.keys().copied().collect()
    }

    /// Usage hints for every tool, one per line
    pub fn usage(&self) -> String {
        self.tools
            .values()
            .map(|tool| tool.definition().usage_hint())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.tools.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(ToolDefinition);

    #[async_trait]
    impl Tool for Named {
        fn definition(&self) -> &ToolDefinition {
            &self.0
        }

        fn capability(&self) -> AgentCapability {
            AgentCapability::Search
        }

        async fn execute(&self, _args: Value) -> Result<Value, ToolError> {
            Ok(Value::Null)
        }
    }

    fn named(name: &'static str) -> Arc<dyn Tool> {
        Arc::new(Named(ToolDefinition::new(name, "do nothing", r#"{"request": "x"}"#)))
    }

    #[test]
    fn test_usage_hint() {
        let def = ToolDefinition::new("done_tool", "finish", r#"{"request": "done_tool"}"#);
        assert_eq!(def.usage_hint(), r#"To finish, reply with only {"request": "done_tool"}"#);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut registry = ToolRegistry::new();
        assert!(registry.register(named("dup")));
        assert!(!registry.register(named("dup")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = ToolRegistry::new();
        registry.register(named("zeta"));
        registry.register(named("alpha"));

        assert_eq!(registry.names(), vec!["alpha", "zeta"]);
        assert_eq!(registry.usage().lines().count(), 2);
        assert!(registry.get("missing").is_none());
    }
}
