//! Agent types for Rostrum
//!
//! An [`Agent`] is a named participant with a role, a system message, an
//! [`InputSource`] and its own [`MessageHistory`].

use crate::history::{MessageHistory, Speaker, TurnRecord};
use crate::model::ModelConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Unique identifier for an agent
pub type AgentId = Uuid;

/// Role an agent plays in the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentRole {
    Pro,
    Con,
    Feedback,
    MetaphorSearch,
    DocQa,
}

impl AgentRole {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pro => "Pro",
            Self::Con => "Con",
            Self::Feedback => "Feedback",
            Self::MetaphorSearch => "MetaphorSearch",
            Self::DocQa => "DocQA",
        }
    }

    /// The other debate side, if this is a debater
    pub fn opponent(&self) -> Option<AgentRole> {
        match self {
            Self::Pro => Some(Self::Con),
            Self::Con => Some(Self::Pro),
            _ => None,
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing a debate side
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown side '{0}' (expected pro or con)")]
pub struct UnknownSide(pub String);

/// The debate side occupied by the controlling actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebateSide {
    Pro,
    Con,
}

impl DebateSide {
    pub fn role(&self) -> AgentRole {
        match self {
            Self::Pro => AgentRole::Pro,
            Self::Con => AgentRole::Con,
        }
    }

    pub fn opposite(&self) -> DebateSide {
        match self {
            Self::Pro => Self::Con,
            Self::Con => Self::Pro,
        }
    }
}

impl fmt::Display for DebateSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.role().label())
    }
}

impl FromStr for DebateSide {
    type Err = UnknownSide;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pro" => Ok(Self::Pro),
            "con" => Ok(Self::Con),
            other => Err(UnknownSide(other.to_string())),
        }
    }
}

/// Where an agent's utterances come from.
///
/// A human value and a model binding are mutually exclusive: when the agent
/// is bound to a human, its steps return the literal value and no model is
/// invoked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputSource {
    Model(ModelConfig),
    Human(String),
}

impl InputSource {
    pub fn is_human(&self) -> bool {
        matches!(self, Self::Human(_))
    }

    pub fn model(&self) -> Option<&ModelConfig> {
        match self {
            Self::Model(config) => Some(config),
            Self::Human(_) => None,
        }
    }
}

/// A capability an agent may invoke through tool calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentCapability {
    /// Web search for reference material
    Search,
    /// Declare the current phase complete
    Done,
}

/// A dialogue participant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub role: AgentRole,
    /// Human-readable name (defaults to the role label)
    pub name: String,
    system_message: String,
    source: InputSource,
    capabilities: Vec<AgentCapability>,
    history: MessageHistory,
    pub created_at: DateTime<Utc>,
}

impl Agent {
    /// Create a model-backed agent with no capabilities
    pub fn new(role: AgentRole, system_message: &str, model: ModelConfig) -> Self {
        Self::with_capabilities(role, system_message, model, Vec::new())
    }

    /// Create the research agent, granted exactly search and done
    pub fn research(system_message: &str, model: ModelConfig) -> Self {
        Self::with_capabilities(
            AgentRole::MetaphorSearch,
            system_message,
            model,
            vec![AgentCapability::Search, AgentCapability::Done],
        )
    }

    fn with_capabilities(
        role: AgentRole,
        system_message: &str,
        model: ModelConfig,
        capabilities: Vec<AgentCapability>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            name: role.label().to_string(),
            system_message: system_message.to_string(),
            source: InputSource::Model(model),
            capabilities,
            history: MessageHistory::new(),
            created_at: Utc::now(),
        }
    }

    pub fn system_message(&self) -> &str {
        &self.system_message
    }

    pub fn source(&self) -> &InputSource {
        &self.source
    }

    /// Answer from a human-supplied value instead of a model
    pub fn bind_human(&mut self, value: &str) {
        debug!(agent = %self.name, "Bound to human input");
        self.source = InputSource::Human(value.to_string());
    }

    /// Answer from a model again
    pub fn bind_model(&mut self, model: ModelConfig) {
        self.source = InputSource::Model(model);
    }

    pub fn capabilities(&self) -> &[AgentCapability] {
        &self.capabilities
    }

    pub fn has_capability(&self, capability: AgentCapability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn history(&self) -> &MessageHistory {
        &self.history
    }

    /// Speaker label for this agent's own utterances
    pub fn own_speaker(&self) -> Speaker {
        match self.source {
            InputSource::Human(_) => Speaker::Human(self.role),
            InputSource::Model(_) => Speaker::Agent(self.role),
        }
    }

    /// Record something this agent heard
    pub fn hear(&mut self, speaker: Speaker, content: &str) -> &TurnRecord {
        self.history.push(speaker, content)
    }

    /// Record something this agent said
    pub fn say(&mut self, content: &str) -> &TurnRecord {
        let speaker = self.own_speaker();
        self.history.push(speaker, content)
    }

    /// Drop the history (used by tasks configured to restart)
    pub fn restart(&mut self) {
        debug!(agent = %self.name, records = self.history.len(), "Clearing history");
        self.history.clear();
    }
}
