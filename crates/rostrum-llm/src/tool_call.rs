//! Parsing tool calls out of model utterances
//!
//! Agents call tools by replying with a JSON object whose `request` field
//! names the tool; the remaining fields are the arguments. The object may be
//! wrapped in prose or a code fence.

use serde_json::{Map, Value};

use crate::tools::DONE_TOOL_NAME;

/// A tool call found in an utterance
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    /// Tool name (the `request` field)
    pub name: String,
    /// Remaining fields as an object
    pub args: Value,
}

impl ToolCall {
    /// Extract the first tool call from an utterance, if any.
    ///
    /// Each `{` is tried in turn as the start of a JSON value; text after
    /// that value is ignored, so prose and later calls do not get in the way.
    pub fn parse(utterance: &str) -> Option<ToolCall> {
        utterance
            .match_indices('{')
            .filter_map(|(start, _)| {
                serde_json::Deserializer::from_str(&utterance[start..])
                    .into_iter::<Value>()
                    .next()?
                    .ok()
            })
            .find_map(Self::from_value)
    }

    fn from_value(value: Value) -> Option<ToolCall> {
        let mut object: Map<String, Value> = match value {
            Value::Object(object) => object,
            _ => return None,
        };

        let name = match object.remove("request")? {
            Value::String(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => return None,
        };

        Some(ToolCall {
            name,
            args: Value::Object(object),
        })
    }

    pub fn is_done(&self) -> bool {
        self.name == DONE_TOOL_NAME
    }
}

/// Whether an utterance ends the current task.
///
/// Either the literal `DONE` (trimmed, any case) or a `done_tool` call.
pub fn is_done_signal(utterance: &str) -> bool {
    let trimmed = utterance.trim().trim_end_matches('.');
    if trimmed.eq_ignore_ascii_case("done") {
        return true;
    }
    ToolCall::parse(utterance).is_some_and(|call| call.is_done())
}
