//! Output of one tool call, as handed back to the calling agent

use rostrum_core::{ContentHash, Speaker};
use serde_json::Value;
use std::time::Duration;

/// What a tool returned.
///
/// `hash` is computed the same way as the hash of the history record the
/// message becomes, so a logged result can be matched to its record.
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub tool_name: String,
    pub output: Value,
    message: String,
    pub hash: ContentHash,
    pub elapsed: Duration,
}

impl ToolResult {
    pub fn new(tool_name: &str, output: Value, elapsed: Duration) -> Self {
        let message = output.to_string();
        let speaker = Speaker::Tool(tool_name.to_string());
        Self {
            tool_name: tool_name.to_string(),
            hash: ContentHash::of_utterance(&speaker.to_string(), &message),
            output,
            message,
            elapsed,
        }
    }

    /// Compact JSON rendering of the output
    pub fn message(&self) -> &str {
        &self.message
    }
}
