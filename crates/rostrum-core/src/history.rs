//! Message history for Rostrum agents
//!
//! A [`MessageHistory`] is the append-only, ordered record of everything an
//! agent has heard and said. Each [`TurnRecord`] is immutable once appended
//! and carries a content hash.

use crate::agent::AgentRole;
use crate::hash::ContentHash;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who produced an utterance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    /// Seed or orchestration input
    Moderator,
    /// A human occupying a debate role
    Human(AgentRole),
    /// Model output of the agent playing a role
    Agent(AgentRole),
    /// Result of a capability invocation
    Tool(String),
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Moderator => f.write_str("Moderator"),
            Self::Human(role) => write!(f, "{} (human)", role),
            Self::Agent(role) => write!(f, "{}", role),
            Self::Tool(name) => write!(f, "Tool[{}]", name),
        }
    }
}

/// A single entry in an agent's history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Position in the owning history (0-based)
    pub position: usize,
    pub speaker: Speaker,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// SHA-256 of speaker and content
    pub hash: ContentHash,
}

impl TurnRecord {
    /// Whether this record holds a capability invocation result
    pub fn is_tool_result(&self) -> bool {
        matches!(self.speaker, Speaker::Tool(_))
    }
}

/// Append-only ordered sequence of turn records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageHistory {
    records: Vec<TurnRecord>,
}

impl MessageHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an utterance and return the stored record
    pub fn push(&mut self, speaker: Speaker, content: &str) -> &TurnRecord {
        let hash = ContentHash::of_utterance(&speaker.to_string(), content);
        let position = self.records.len();
        self.records.push(TurnRecord {
            position,
            speaker,
            content: content.to_string(),
            created_at: Utc::now(),
            hash,
        });
        &self.records[position]
    }

    pub fn records(&self) -> &[TurnRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&TurnRecord> {
        self.records.last()
    }

    /// Records spoken by a given speaker, in order
    pub fn spoken_by<'a>(&'a self, speaker: &'a Speaker) -> impl Iterator<Item = &'a TurnRecord> {
        self.records.iter().filter(move |r| &r.speaker == speaker)
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }
}
