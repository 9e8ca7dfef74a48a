//! Debate topics: the built-in catalog and JSON topic files

use rostrum_core::DebateSide;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopicError {
    #[error("Failed to read topics file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse topics file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Topics file contains no topics")]
    Empty,
    #[error("Unknown topic: {0}")]
    NotFound(String),
}

/// A motion with the system message for each side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    #[serde(rename = "pro")]
    pub pro_message: String,
    #[serde(rename = "con")]
    pub con_message: String,
}

impl Topic {
    pub fn new(name: &str, pro_message: &str, con_message: &str) -> Self {
        Self {
            name: name.to_string(),
            pro_message: pro_message.to_string(),
            con_message: con_message.to_string(),
        }
    }

    /// System message for the debater on `side`
    pub fn message_for(&self, side: DebateSide) -> &str {
        match side {
            DebateSide::Pro => &self.pro_message,
            DebateSide::Con => &self.con_message,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TopicFile {
    topics: Vec<Topic>,
}

/// Ordered list of topics to choose from
#[derive(Debug, Clone, PartialEq)]
pub struct TopicCatalog {
    topics: Vec<Topic>,
}

impl Default for TopicCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TopicCatalog {
    pub fn builtin() -> Self {
        Self {
            topics: vec![
                Topic::new(
                    "Should remote work be mandatory?",
                    "You are a debater arguing in favor of making remote work mandatory for \
                     office jobs. Stress productivity, reduced commuting, lower emissions and \
                     access to a wider talent pool.",
                    "You are a debater arguing against making remote work mandatory. Stress \
                     collaboration, mentorship, company culture and the needs of workers \
                     without a good home setup.",
                ),
                Topic::new(
                    "Should AI development be regulated by governments?",
                    "You are a debater arguing in favor of government regulation of AI. \
                     Stress safety, accountability, bias and the protection of workers.",
                    "You are a debater arguing against government regulation of AI. Stress \
                     innovation, regulatory capture and how fast the field moves.",
                ),
                Topic::new(
                    "Is nuclear power essential to fight climate change?",
                    "You are a debater arguing in favor of nuclear power as essential to \
                     decarbonisation. Stress reliability, land use and lifecycle emissions.",
                    "You are a debater arguing against relying on nuclear power. Stress cost, \
                     build times, waste and the falling price of renewables.",
                ),
                Topic::new(
                    "Should social media platforms be liable for user content?",
                    "You are a debater arguing in favor of platform liability for user \
                     content. Stress harm reduction and the incentives it creates.",
                    "You are a debater arguing against platform liability. Stress free \
                     expression, over-moderation and the burden on small platforms.",
                ),
            ],
        }
    }

    /// Parse `{"topics": [{"name", "pro", "con"}, ...]}`
    pub fn from_json(json: &str) -> Result<Self, TopicError> {
        let file: TopicFile = serde_json::from_str(json)?;
        if file.topics.is_empty() {
            return Err(TopicError::Empty);
        }
        Ok(Self {
            topics: file.topics,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TopicError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Look up a topic by 1-based menu number or by name (case-insensitive)
    pub fn select(&self, key: &str) -> Result<&Topic, TopicError> {
        let key = key.trim();
        if let Ok(index) = key.parse::<usize>() {
            if let Some(topic) = index.checked_sub(1).and_then(|i| self.topics.get(i)) {
                return Ok(topic);
            }
        }
        self.topics
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(key))
            .ok_or_else(|| TopicError::NotFound(key.to_string()))
    }
}
