//! Feature gate for the research branch

use rostrum_llm::{ExaSearchBackend, LlmConfig, SearchBackend};
use std::sync::Arc;

/// Whether the web-search capability exists for this session.
///
/// When `Unavailable`, the research and Doc-QA tasks are never built.
#[derive(Debug, Clone)]
pub enum CapabilityGate {
    Available(Arc<dyn SearchBackend>),
    Unavailable,
}

impl CapabilityGate {
    /// Open the gate iff a search key is configured
    pub fn from_config(config: &LlmConfig) -> Self {
        match &config.search_api_key {
            Some(key) => Self::Available(Arc::new(ExaSearchBackend::new(key))),
            None => Self::Unavailable,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    pub fn backend(&self) -> Option<Arc<dyn SearchBackend>> {
        match self {
            Self::Available(backend) => Some(backend.clone()),
            Self::Unavailable => None,
        }
    }
}
