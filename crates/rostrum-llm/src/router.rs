//! Provider resolution per agent
//!
//! A session asks a [`ProviderResolver`] for one provider per agent, keyed by
//! the agent's role and model configuration. [`ProviderRouter`] picks the
//! backend from the model name; [`RoleProviders`] maps roles to fixed
//! providers for tests and offline runs.

use rostrum_core::{AgentRole, ModelConfig};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::cached_provider::{CachedProvider, LlmCacheConfig};
use crate::config::{ConfigError, LlmConfig, Settings};
use crate::mock::MockProvider;
use crate::ollama::OllamaProvider;
use crate::openai::OpenAIProvider;
use crate::provider::LlmProvider;

/// Resolves the provider an agent talks to
pub trait ProviderResolver: Send + Sync {
    fn resolve(
        &self,
        role: AgentRole,
        model: &ModelConfig,
    ) -> Result<Arc<dyn LlmProvider>, ConfigError>;
}

/// Chooses a backend from the model name.
///
/// - `ollama/<model>` goes to the local Ollama server
/// - `mock` gets the offline smart mock
/// - anything else goes to the OpenAI-compatible endpoint
#[derive(Debug, Clone)]
pub struct ProviderRouter {
    config: LlmConfig,
    settings: Settings,
}

impl ProviderRouter {
    pub fn new(config: LlmConfig, settings: Settings) -> Self {
        Self { config, settings }
    }

    fn build(&self, model: &ModelConfig) -> Result<Arc<dyn LlmProvider>, ConfigError> {
        if model.is_ollama() {
            let provider = OllamaProvider::with_url(&self.config.ollama_url, model.model_name())
                .with_context_length(model.chat_context_length);
            return Ok(self.maybe_cached(provider));
        }

        if model.chat_model == "mock" {
            return Ok(self.maybe_cached(MockProvider::smart()));
        }

        let key = self.config.require_openai_key()?;
        let provider = OpenAIProvider::new(key, &model.chat_model)
            .with_base_url(&self.config.openai_base_url);
        Ok(self.maybe_cached(provider))
    }

    fn maybe_cached<P: LlmProvider + 'static>(&self, provider: P) -> Arc<dyn LlmProvider> {
        let provider: Arc<dyn LlmProvider> = Arc::new(provider);
        if self.settings.cache {
            Arc::new(CachedProvider::new(provider, LlmCacheConfig::default()))
        } else {
            provider
        }
    }
}

impl ProviderResolver for ProviderRouter {
    fn resolve(
        &self,
        role: AgentRole,
        model: &ModelConfig,
    ) -> Result<Arc<dyn LlmProvider>, ConfigError> {
        let provider = self.build(model)?;
        debug!(
            role = role.label(),
            model = %model.chat_model,
            provider = provider.name(),
            cached = self.settings.cache,
            "Resolved provider"
        );
        Ok(provider)
    }
}

/// Fixed provider per role, with an optional fallback
#[derive(Debug, Default, Clone)]
pub struct RoleProviders {
    providers: HashMap<AgentRole, Arc<dyn LlmProvider>>,
    fallback: Option<Arc<dyn LlmProvider>>,
}

impl RoleProviders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `provider` for every role not set explicitly
    pub fn with_fallback(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.fallback = Some(provider);
        self
    }

    pub fn with(mut self, role: AgentRole, provider: Arc<dyn LlmProvider>) -> Self {
        self.providers.insert(role, provider);
        self
    }
}

impl ProviderResolver for RoleProviders {
    fn resolve(
        &self,
        role: AgentRole,
        _model: &ModelConfig,
    ) -> Result<Arc<dyn LlmProvider>, ConfigError> {
        self.providers
            .get(&role)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| ConfigError::Invalid(format!("no provider for role {}", role.label())))
    }
}
