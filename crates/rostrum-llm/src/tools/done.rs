//! Done signal tool
//!
//! Lets an agent declare its phase complete. Execution only echoes the
//! optional closing message; the caller ends its loop on seeing the call.

use async_trait::async_trait;
use rostrum_core::AgentCapability;
use serde_json::Value;

use crate::tool::{Tool, ToolDefinition};
use crate::tool_error::ToolError;

pub const DONE_TOOL_NAME: &str = "done_tool";

/// The `done_tool` tool
#[derive(Debug, Default)]
pub struct DoneTool;

impl DoneTool {
    pub const DEFINITION: ToolDefinition = ToolDefinition::new(
        DONE_TOOL_NAME,
        "finish once you have found enough sources",
        r#"{"request": "done_tool", "content": "<one line summary>"}"#,
    );

    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for DoneTool {
    fn definition(&self) -> &ToolDefinition {
        &Self::DEFINITION
    }

    fn capability(&self) -> AgentCapability {
        AgentCapability::Done
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let content = args.get("content").and_then(Value::as_str).unwrap_or_default();
        Ok(serde_json::json!({ "done": true, "content": content }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_done_echoes_content() {
        let tool = DoneTool::new();
        let output = tool
            .execute(serde_json::json!({"content": "Found three sources."}))
            .await
            .unwrap();
        assert_eq!(output["done"], true);
        assert_eq!(output["content"], "Found three sources.");
        assert_eq!(tool.capability(), AgentCapability::Done);
    }
}
