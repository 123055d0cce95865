// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for memory persistence backends.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AttuneError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{MemoryKind, SenderId};

/// Adapter for durable, sender-keyed memory storage.
///
/// Records are opaque JSON values; the memory manager owns their schema.
/// List kinds use append-with-cap semantics (appending beyond the cap
/// evicts oldest-first); singleton kinds hold one value per sender.
/// Backends must be interchangeable: flat file, embedded SQL, and
/// in-memory implementations all satisfy the same contract, enforced by a
/// shared contract test suite.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the backend (opens files/connections, runs migrations).
    async fn initialize(&self) -> Result<(), AttuneError>;

    /// Flushes pending writes and releases the backend.
    async fn close(&self) -> Result<(), AttuneError>;

    /// Appends a record to a list kind, evicting oldest entries beyond `cap`.
    async fn append_with_cap(
        &self,
        kind: MemoryKind,
        sender: &SenderId,
        record: &Value,
        cap: usize,
    ) -> Result<(), AttuneError>;

    /// Returns the most recent records of a list kind in chronological
    /// order (oldest first). `limit` restricts to the last N entries.
    async fn get_recent(
        &self,
        kind: MemoryKind,
        sender: &SenderId,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, AttuneError>;

    /// Replaces the entire list of a kind for a sender.
    ///
    /// Used when an in-place mutation (a follow-up flag flip, a
    /// post-compression trim) must be reflected durably.
    async fn replace_all(
        &self,
        kind: MemoryKind,
        sender: &SenderId,
        records: &[Value],
    ) -> Result<(), AttuneError>;

    /// Sets the value of a singleton kind for a sender, overwriting any prior value.
    async fn set_singleton(
        &self,
        kind: MemoryKind,
        sender: &SenderId,
        value: &Value,
    ) -> Result<(), AttuneError>;

    /// Returns the value of a singleton kind for a sender, if any.
    async fn get_singleton(
        &self,
        kind: MemoryKind,
        sender: &SenderId,
    ) -> Result<Option<Value>, AttuneError>;

    /// Lists every sender that has any persisted state.
    async fn senders(&self) -> Result<Vec<SenderId>, AttuneError>;
}
