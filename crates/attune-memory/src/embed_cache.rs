// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded text-to-vector cache in front of the embedding collaborator.
//!
//! Keys are a cheap 64-bit hash of the text. A hash collision only changes
//! which cached vector is returned for a colliding text -- embeddings feed
//! fuzzy similarity, not exact identity, so this is collision-tolerant.
//! Process-lifetime scoped; never persisted.

use std::collections::{HashMap, VecDeque};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

use attune_core::EmbeddingAdapter;
use tokio::sync::Mutex;
use tracing::{debug, warn};

struct CacheState {
    map: HashMap<u64, Vec<f32>>,
    /// Insertion order for FIFO eviction.
    order: VecDeque<u64>,
}

/// FIFO-bounded embedding cache.
#[derive(Clone)]
pub struct EmbeddingCache {
    inner: Arc<dyn EmbeddingAdapter + Send + Sync>,
    cap: usize,
    state: Arc<Mutex<CacheState>>,
}

impl EmbeddingCache {
    pub fn new(inner: Arc<dyn EmbeddingAdapter + Send + Sync>, cap: usize) -> Self {
        Self {
            inner,
            cap: cap.max(1),
            state: Arc::new(Mutex::new(CacheState {
                map: HashMap::new(),
                order: VecDeque::new(),
            })),
        }
    }

    /// Embed `text`, consulting the cache first.
    ///
    /// Returns `None` when the collaborator fails -- callers degrade to "no
    /// semantic context" rather than propagating an error.
    pub async fn get(&self, text: &str) -> Option<Vec<f32>> {
        let key = hash_text(text);

        {
            let state = self.state.lock().await;
            if let Some(vector) = state.map.get(&key) {
                return Some(vector.clone());
            }
        }

        let vector = match self.inner.embed(text).await {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "embedding failed, no vector for this text");
                return None;
            }
        };

        let mut state = self.state.lock().await;
        if state.map.insert(key, vector.clone()).is_none() {
            state.order.push_back(key);
        }
        while state.order.len() > self.cap {
            if let Some(oldest) = state.order.pop_front() {
                state.map.remove(&oldest);
                debug!(key = oldest, "evicted oldest embedding cache entry");
            }
        }

        Some(vector)
    }

    /// Current number of cached vectors.
    pub async fn len(&self) -> usize {
        self.state.lock().await.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn hash_text(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use attune_core::{AdapterType, AttuneError, HealthStatus, PluginAdapter};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Counting embedder: returns a length-derived vector and tracks calls.
    struct CountingEmbedder {
        calls: AtomicUsize,
        fail: AtomicBool,
    }

    impl CountingEmbedder {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl PluginAdapter for CountingEmbedder {
        fn name(&self) -> &str {
            "counting-embedder"
        }
        fn version(&self) -> semver::Version {
            semver::Version::new(0, 1, 0)
        }
        fn adapter_type(&self) -> AdapterType {
            AdapterType::Embedding
        }
        async fn health_check(&self) -> Result<HealthStatus, AttuneError> {
            Ok(HealthStatus::Healthy)
        }
        async fn shutdown(&self) -> Result<(), AttuneError> {
            Ok(())
        }
    }

    #[async_trait]
    impl attune_core::EmbeddingAdapter for CountingEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, AttuneError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(AttuneError::Embedding {
                    message: "injected failure".into(),
                    source: None,
                });
            }
            Ok(vec![text.len() as f32, 1.0])
        }
    }

    #[tokio::test]
    async fn cache_hit_skips_collaborator() {
        let embedder = Arc::new(CountingEmbedder::new());
        let cache = EmbeddingCache::new(embedder.clone(), 10);

        let first = cache.get("hello").await.unwrap();
        let second = cache.get("hello").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fifo_eviction_at_cap() {
        let embedder = Arc::new(CountingEmbedder::new());
        let cache = EmbeddingCache::new(embedder.clone(), 2);

        cache.get("a").await;
        cache.get("bb").await;
        cache.get("ccc").await; // evicts "a"
        assert_eq!(cache.len().await, 2);

        // "a" was evicted, so this is a fresh collaborator call.
        cache.get("a").await;
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn collaborator_failure_returns_none() {
        let embedder = Arc::new(CountingEmbedder::new());
        embedder.fail.store(true, Ordering::SeqCst);
        let cache = EmbeddingCache::new(embedder.clone(), 10);

        assert!(cache.get("anything").await.is_none());
        // Failures are not cached.
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn failure_then_recovery_is_not_poisoned() {
        let embedder = Arc::new(CountingEmbedder::new());
        embedder.fail.store(true, Ordering::SeqCst);
        let cache = EmbeddingCache::new(embedder.clone(), 10);

        assert!(cache.get("text").await.is_none());
        embedder.fail.store(false, Ordering::SeqCst);
        assert!(cache.get("text").await.is_some());
    }
}
