// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding adapter trait for vector embedding generation.

use async_trait::async_trait;

use crate::error::AttuneError;
use crate::traits::adapter::PluginAdapter;

/// Adapter for generating vector embeddings from text.
///
/// Powers semantic memory recall. Errors are treated as "no semantic
/// context available for this turn" by callers, never as turn failures.
#[async_trait]
pub trait EmbeddingAdapter: PluginAdapter {
    /// Generates an embedding vector for the given text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AttuneError>;
}
