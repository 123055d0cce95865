// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Debounced persistence queue.
//!
//! Every mutation enqueues a write here; a single coalesced flush timer
//! drains the queue into the storage adapter. A crash loses at most one
//! debounce interval of writes -- in-memory state stays authoritative.

use attune_core::{AttuneError, MemoryKind, SenderId, StorageAdapter};
use serde_json::Value;

/// One deferred storage operation.
#[derive(Debug, Clone)]
pub(crate) enum PendingWrite {
    Append {
        kind: MemoryKind,
        sender: SenderId,
        record: Value,
        cap: usize,
    },
    ReplaceAll {
        kind: MemoryKind,
        sender: SenderId,
        records: Vec<Value>,
    },
    SetSingleton {
        kind: MemoryKind,
        sender: SenderId,
        value: Value,
    },
}

impl PendingWrite {
    pub(crate) async fn apply(
        &self,
        storage: &(dyn StorageAdapter + Send + Sync),
    ) -> Result<(), AttuneError> {
        match self {
            PendingWrite::Append {
                kind,
                sender,
                record,
                cap,
            } => storage.append_with_cap(*kind, sender, record, *cap).await,
            PendingWrite::ReplaceAll {
                kind,
                sender,
                records,
            } => storage.replace_all(*kind, sender, records).await,
            PendingWrite::SetSingleton {
                kind,
                sender,
                value,
            } => storage.set_singleton(*kind, sender, value).await,
        }
    }
}
