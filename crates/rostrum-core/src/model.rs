//! Language-model configuration bound to agents
//!
//! A [`ModelConfig`] names the chat model and its sampling parameters. It is
//! plain data: resolving it to a live provider is the job of the LLM crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::agent::AgentRole;

/// Temperature used by the feedback judge
pub const FEEDBACK_TEMPERATURE: f32 = 0.2;

/// Error returned when a model preset name is not recognised
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown model preset '{0}' (expected gpt-4o, gpt-4, mistral or mock)")]
pub struct UnknownPreset(pub String);

/// Built-in model choices offered at session setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelPreset {
    Gpt4o,
    Gpt4,
    /// Mistral 7B served by a local Ollama
    Mistral,
    /// Offline scripted replies
    Mock,
}

impl ModelPreset {
    pub fn all() -> [ModelPreset; 4] {
        [Self::Gpt4o, Self::Gpt4, Self::Mistral, Self::Mock]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Gpt4o => "gpt-4o",
            Self::Gpt4 => "gpt-4",
            Self::Mistral => "mistral",
            Self::Mock => "mock",
        }
    }
}

impl fmt::Display for ModelPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ModelPreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "gpt-4o" | "gpt4o" => Ok(Self::Gpt4o),
            "2" | "gpt-4" | "gpt4" => Ok(Self::Gpt4),
            "3" | "mistral" => Ok(Self::Mistral),
            "mock" => Ok(Self::Mock),
            other => Err(UnknownPreset(other.to_string())),
        }
    }
}

/// Model configuration for one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier; `ollama/` prefix routes to a local Ollama
    pub chat_model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub min_output_tokens: u32,
    pub seed: Option<u64>,
    /// Only set for local models with a small context window
    pub chat_context_length: Option<u32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::preset(ModelPreset::Gpt4o)
    }
}

impl ModelConfig {
    /// Create a config for an arbitrary model name with default sampling
    pub fn new(chat_model: &str) -> Self {
        Self {
            chat_model: chat_model.to_string(),
            temperature: 0.7,
            max_output_tokens: 1500,
            min_output_tokens: 1,
            seed: None,
            chat_context_length: None,
        }
    }

    /// Create a config from a built-in preset
    pub fn preset(preset: ModelPreset) -> Self {
        match preset {
            ModelPreset::Gpt4o => Self::new("gpt-4o"),
            ModelPreset::Gpt4 => Self::new("gpt-4"),
            ModelPreset::Mistral => Self {
                chat_context_length: Some(16000),
                ..Self::new("ollama/mistral:7b-instruct-v0.2-q8_0")
            },
            ModelPreset::Mock => Self::new("mock"),
        }
    }

    /// Derive the judge configuration: same model and limits, low temperature
    pub fn for_feedback(&self) -> Self {
        Self {
            chat_model: self.chat_model.clone(),
            temperature: FEEDBACK_TEMPERATURE,
            max_output_tokens: self.max_output_tokens,
            min_output_tokens: self.min_output_tokens,
            seed: self.seed,
            chat_context_length: self.chat_context_length,
        }
    }

    /// Output tokens to ask for once `prompt_tokens` of the context window
    /// are taken: at most what is left of the window, never below
    /// `min_output_tokens`
    pub fn output_limit(&self, prompt_tokens: u32) -> u32 {
        let remaining = self
            .chat_context_length
            .map_or(u32::MAX, |window| window.saturating_sub(prompt_tokens));
        self.max_output_tokens
            .min(remaining)
            .max(self.min_output_tokens)
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Whether this model is served by a local Ollama
    pub fn is_ollama(&self) -> bool {
        self.chat_model.starts_with("ollama/")
    }

    /// Model name with any routing prefix removed
    pub fn model_name(&self) -> &str {
        self.chat_model
            .strip_prefix("ollama/")
            .unwrap_or(&self.chat_model)
    }
}

/// Which models the session's agents use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModelSelection {
    /// One model for every agent
    Shared(ModelConfig),
    /// A separate model per debater and for the judge
    PerRole {
        pro: ModelConfig,
        con: ModelConfig,
        feedback: ModelConfig,
    },
}

impl ModelSelection {
    /// Config for the feedback judge (always low temperature)
    pub fn feedback(&self) -> ModelConfig {
        match self {
            Self::Shared(shared) => shared.for_feedback(),
            Self::PerRole { feedback, .. } => feedback.clone().with_temperature(FEEDBACK_TEMPERATURE),
        }
    }

    /// Config for a given role. Research and Doc-QA agents follow the judge.
    pub fn for_role(&self, role: AgentRole) -> ModelConfig {
        match (self, role) {
            (Self::Shared(shared), AgentRole::Pro | AgentRole::Con) => shared.clone(),
            (Self::PerRole { pro, .. }, AgentRole::Pro) => pro.clone(),
            (Self::PerRole { con, .. }, AgentRole::Con) => con.clone(),
            (_, AgentRole::Feedback | AgentRole::MetaphorSearch | AgentRole::DocQa) => {
                self.feedback()
            }
        }
    }
}
