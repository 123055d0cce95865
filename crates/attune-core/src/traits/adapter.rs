// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait implemented by all adapters.

use async_trait::async_trait;

use crate::error::AttuneError;
use crate::types::{AdapterType, HealthStatus};

/// Common lifecycle surface shared by every adapter.
///
/// Concrete adapter traits ([`super::ChannelAdapter`], [`super::ProviderAdapter`],
/// [`super::EmbeddingAdapter`], [`super::StorageAdapter`]) all extend this.
#[async_trait]
pub trait PluginAdapter {
    /// Short stable name of this adapter (e.g. `"sqlite"`, `"ollama"`).
    fn name(&self) -> &str;

    /// Adapter implementation version.
    fn version(&self) -> semver::Version;

    /// Which adapter category this implementation belongs to.
    fn adapter_type(&self) -> AdapterType;

    /// Checks whether the adapter is currently operational.
    async fn health_check(&self) -> Result<HealthStatus, AttuneError>;

    /// Releases resources held by the adapter.
    async fn shutdown(&self) -> Result<(), AttuneError>;
}
