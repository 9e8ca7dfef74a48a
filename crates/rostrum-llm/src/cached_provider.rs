//! Response cache for repeated model requests
//!
//! Enabled per session through `Settings::cache`. The key is a digest of the
//! whole serialized request (persona, history, prompt, sampling and model),
//! so two debaters only share an entry when they would send byte-identical
//! requests. Entries live in a [`moka`] future cache.

use async_trait::async_trait;
use moka::future::Cache;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{LlmError, LlmProvider, LlmRequest, LlmResponse};

/// Capacity and lifetime of cached replies
#[derive(Debug, Clone, Copy)]
pub struct LlmCacheConfig {
    pub capacity: u64,
    /// A session rarely outlives this
    pub ttl: Duration,
}

impl Default for LlmCacheConfig {
    fn default() -> Self {
        Self {
            capacity: 256,
            ttl: Duration::from_secs(30 * 60),
        }
    }
}

/// Hit and miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Digest of a request, or `None` if it cannot be serialized
fn request_digest(request: &LlmRequest) -> Option<String> {
    let bytes = serde_json::to_vec(request).ok()?;
    Some(hex::encode(Sha256::digest(&bytes)))
}

/// Serves repeated requests from memory instead of the wrapped provider
pub struct CachedProvider {
    inner: Arc<dyn LlmProvider>,
    replies: Cache<String, LlmResponse>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CachedProvider {
    pub fn new(inner: Arc<dyn LlmProvider>, config: LlmCacheConfig) -> Self {
        Self {
            inner,
            replies: Cache::builder()
                .max_capacity(config.capacity)
                .time_to_live(config.ttl)
                .build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn wrap(inner: impl LlmProvider + 'static) -> Self {
        Self::new(Arc::new(inner), LlmCacheConfig::default())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for CachedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedProvider")
            .field("inner", &self.inner.name())
            .field("stats", &self.stats())
            .finish()
    }
}

#[async_trait]
impl LlmProvider for CachedProvider {
    fn name(&self) -> &str {
        "cached"
    }

    async fn is_available(&self) -> bool {
        self.inner.is_available().await
    }

    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let Some(key) = request_digest(&request) else {
            warn!("Request not serializable; bypassing cache");
            return self.inner.complete(request).await;
        };

        if let Some(reply) = self.replies.get(&key).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = &key[..12], "Reply served from cache");
            return Ok(reply);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let reply = self.inner.complete(request).await?;
        self.replies.insert(key, reply.clone()).await;
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ChatMessage, ChatRole};
    use crate::MockProvider;

    #[tokio::test]
    async fn test_identical_request_hits() {
        let cached = CachedProvider::wrap(MockProvider::constant("Offices matter.").with_latency(0));
        let request = LlmRequest::with_role("You argue con.", "Opening statement?");

        let first = cached.complete(request.clone()).await.unwrap();
        let second = cached.complete(request).await.unwrap();

        assert_eq!(first.content, second.content);
        assert_eq!(cached.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn test_history_changes_digest() {
        let plain = LlmRequest::simple("same prompt");
        let mut with_history = plain.clone();
        with_history.history.push(ChatMessage {
            role: ChatRole::User,
            content: "Pro: earlier point".to_string(),
        });
        assert_ne!(request_digest(&plain), request_digest(&with_history));
    }

    #[tokio::test]
    async fn test_debaters_do_not_share_entries() {
        let cached = CachedProvider::wrap(MockProvider::smart().with_latency(0));

        cached.complete(LlmRequest::with_role("You argue pro.", "Go.")).await.unwrap();
        cached.complete(LlmRequest::with_role("You argue con.", "Go.")).await.unwrap();

        assert_eq!(cached.stats().hits, 0);
        assert_eq!(cached.stats().misses, 2);
    }
}
