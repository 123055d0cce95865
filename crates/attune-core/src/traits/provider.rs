// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for reply generation.

use async_trait::async_trait;

use crate::error::AttuneError;
use crate::traits::adapter::PluginAdapter;
use crate::types::PromptMessage;

/// Adapter for a text-generation backend.
///
/// Implementations own their own retry and multi-model fallback chains;
/// an error returned here is terminal for the turn that requested it.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Generates a reply for the given ordered message list.
    async fn generate(
        &self,
        messages: &[PromptMessage],
        model: &str,
        max_tokens: u32,
    ) -> Result<String, AttuneError>;
}
