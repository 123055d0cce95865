// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock embedding adapter producing deterministic vectors.
//!
//! Texts sharing axis keywords get high cosine similarity; texts with no
//! axis keywords fall back to a one-hot vector derived from a text hash,
//! so unrelated texts come out (near-)orthogonal. Deterministic across
//! runs: no randomness, no network.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use attune_core::{
    AdapterType, AttuneError, EmbeddingAdapter, HealthStatus, PluginAdapter,
};

/// Keyword axes spanned by the mock embedding space.
const AXES: [&str; 8] = [
    "job", "work", "love", "food", "game", "music", "family", "school",
];

/// Dimensions: one per axis plus a hash-derived fallback block.
const DIMS: usize = AXES.len() + 8;

#[derive(Clone, Default)]
pub struct MockEmbedder {
    fail: Arc<AtomicBool>,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `embed` calls fail until cleared.
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// The deterministic vector for a text, without going through the trait.
    pub fn vector_for(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        let mut vector = vec![0.0f32; DIMS];

        let mut any_axis = false;
        for (i, axis) in AXES.iter().enumerate() {
            let count = lower.matches(axis).count();
            if count > 0 {
                vector[i] = count as f32;
                any_axis = true;
            }
        }

        if !any_axis {
            // One-hot on a hash-derived dimension in the fallback block.
            let mut hasher = DefaultHasher::new();
            lower.hash(&mut hasher);
            let dim = AXES.len() + (hasher.finish() as usize % 8);
            vector[dim] = 1.0;
        }

        vector
    }
}

#[async_trait]
impl PluginAdapter for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
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
impl EmbeddingAdapter for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AttuneError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AttuneError::Embedding {
                message: "mock embedder failure injected".to_string(),
                source: None,
            });
        }
        Ok(Self::vector_for(text))
    }
}
