//! Runs tool calls for one agent
//!
//! Every call is checked against the agent's granted capabilities, then
//! validated, then executed under the tool's timeout.

use rostrum_core::AgentCapability;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::tool::{Tool, ToolRegistry};
use crate::tool_error::ToolError;
use crate::tool_result::ToolResult;

pub struct ToolExecutor {
    registry: ToolRegistry,
    granted: Vec<AgentCapability>,
}

impl ToolExecutor {
    /// `granted` is fixed for the executor's lifetime
    pub fn new(registry: ToolRegistry, granted: &[AgentCapability]) -> Self {
        Self {
            registry,
            granted: granted.to_vec(),
        }
    }

    fn lookup(&self, name: &str) -> Result<Arc<dyn Tool>, ToolError> {
        let tool = self
            .registry
            .get(name)
            .ok_or_else(|| ToolError::not_found(name))?;
        if !self.granted.contains(&tool.capability()) {
            return Err(ToolError::not_granted(name));
        }
        Ok(tool)
    }

    /// Run `name` with `args`. Unknown, ungranted and invalid calls fail
    /// before the tool is touched.
    pub async fn execute(&self, name: &str, args: Value) -> Result<ToolResult, ToolError> {
        let tool = self.lookup(name).inspect_err(|e| warn!(tool = name, error = %e, "Call rejected"))?;
        tool.validate(&args)?;

        let limit = tool.timeout();
        debug!(tool = name, timeout_ms = limit.as_millis() as u64, "Running tool");
        let started = Instant::now();
        let output = tokio::time::timeout(limit, tool.execute(args))
            .await
            .map_err(|_| ToolError::timeout(name, limit.as_millis() as u64))??;

        let result = ToolResult::new(name, output, started.elapsed());
        info!(
            tool = name,
            elapsed_ms = result.elapsed.as_millis() as u64,
            hash = %result.hash,
            "Tool finished"
        );
        Ok(result)
    }
}

impl std::fmt::Debug for ToolExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolExecutor")
            .field("tools", &self.registry)
            .field("granted", &self.granted)
            .finish()
    }
}
