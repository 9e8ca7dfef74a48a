//! Configuration management for Rostrum
//!
//! Handles API keys, provider settings, and session-wide settings. Nothing
//! here is global: values are loaded once and passed to whoever needs them.

use serde::{Deserialize, Serialize};
use std::env;

use crate::ollama::DEFAULT_OLLAMA_URL;

/// Error types for configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";

/// LLM and search provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// OpenAI API key (env: OPENAI_API_KEY)
    pub openai_api_key: Option<String>,
    /// OpenAI-compatible base URL (env: OPENAI_BASE_URL)
    pub openai_base_url: String,
    /// Ollama base URL (default: http://localhost:11434)
    pub ollama_url: String,
    /// Exa/Metaphor search key (env: EXA_API_KEY or METAPHOR_API_KEY)
    pub search_api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_URL.to_string(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            search_api_key: None,
        }
    }
}

impl LlmConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            openai_base_url: non_empty_var("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string()),
            ollama_url: non_empty_var("OLLAMA_URL")
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            search_api_key: non_empty_var("EXA_API_KEY").or_else(|| non_empty_var("METAPHOR_API_KEY")),
        }
    }

    /// Get the OpenAI key or fail with the variable to set
    pub fn require_openai_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()))
    }

    /// Whether the optional search capability can be enabled
    pub fn search_available(&self) -> bool {
        self.search_api_key.is_some()
    }
}

/// Session-wide switches, passed explicitly at session start
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Verbose logging of prompts and replies
    pub debug: bool,
    /// Cache model responses for identical requests
    pub cache: bool,
}

impl Settings {
    /// Load from environment (ROSTRUM_DEBUG, ROSTRUM_CACHE); caching is off by default
    pub fn from_env() -> Self {
        Self {
            debug: flag_var("ROSTRUM_DEBUG"),
            cache: flag_var("ROSTRUM_CACHE"),
        }
    }
}

/// Full Rostrum configuration
#[derive(Debug, Clone, Default)]
pub struct RostrumConfig {
    /// Provider settings
    pub llm: LlmConfig,
    /// Debug/cache switches
    pub settings: Settings,
}

impl RostrumConfig {
    /// Load from environment
    pub fn from_env() -> Self {
        Self {
            llm: LlmConfig::from_env(),
            settings: Settings::from_env(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn flag_var(name: &str) -> bool {
    env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LlmConfig::default();
        assert_eq!(config.ollama_url, "http://localhost:11434");
        assert!(!config.search_available());
        assert!(matches!(
            config.require_openai_key(),
            Err(ConfigError::MissingEnvVar(_))
        ));
    }

    #[test]
    fn test_default_settings_disable_cache() {
        let settings = Settings::default();
        assert!(!settings.cache);
        assert!(!settings.debug);
    }
}
