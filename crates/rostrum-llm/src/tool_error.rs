//! Tool call failures
//!
//! Messages never echo raw arguments back to the model.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("No tool named '{name}'")]
    NotFound { name: String },

    /// The calling agent lacks the capability the tool requires
    #[error("Tool '{name}' is not enabled for this agent")]
    NotGranted { name: String },

    #[error("Invalid arguments for '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error("'{tool}' failed: {message}")]
    ExecutionFailed { tool: String, message: String },

    #[error("'{tool}' timed out after {timeout_ms}ms")]
    Timeout { tool: String, timeout_ms: u64 },
}

impl ToolError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn not_granted(name: impl Into<String>) -> Self {
        Self::NotGranted { name: name.into() }
    }

    pub fn invalid_args(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    pub fn execution_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn timeout(tool: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            tool: tool.into(),
            timeout_ms,
        }
    }

    /// Whether the model can fix this by sending a different call.
    ///
    /// Recoverable errors go back to the agent as a tool result; the rest
    /// end the research loop as a collaborator fault.
    pub fn is_recoverable_by_agent(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::NotGranted { .. } | Self::InvalidArguments { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_tool() {
        let err = ToolError::invalid_args("metaphor_search", "Missing 'query' field");
        assert_eq!(
            err.to_string(),
            "Invalid arguments for 'metaphor_search': Missing 'query' field"
        );
        assert_eq!(ToolError::not_found("calculator").to_string(), "No tool named 'calculator'");
    }

    #[test]
    fn test_recoverable_by_agent() {
        assert!(ToolError::not_found("calculator").is_recoverable_by_agent());
        assert!(ToolError::not_granted("metaphor_search").is_recoverable_by_agent());
        assert!(ToolError::invalid_args("metaphor_search", "empty").is_recoverable_by_agent());
        assert!(!ToolError::timeout("metaphor_search", 1000).is_recoverable_by_agent());
        assert!(!ToolError::execution_failed("metaphor_search", "502").is_recoverable_by_agent());
    }
}
