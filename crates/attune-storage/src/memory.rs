// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ephemeral in-process storage backend.
//!
//! Satisfies the full storage contract without touching disk. Used by
//! tests and by deployments that explicitly opt out of durability.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use attune_core::{
    AdapterType, AttuneError, HealthStatus, MemoryKind, PluginAdapter, SenderId,
    StorageAdapter,
};

type Key = (MemoryKind, SenderId);

/// In-memory storage adapter. State is lost when the process exits.
#[derive(Default)]
pub struct MemoryStorage {
    lists: Mutex<HashMap<Key, Vec<Value>>>,
    singletons: Mutex<HashMap<Key, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PluginAdapter for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, AttuneError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), AttuneError> {
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for MemoryStorage {
    async fn initialize(&self) -> Result<(), AttuneError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), AttuneError> {
        Ok(())
    }

    async fn append_with_cap(
        &self,
        kind: MemoryKind,
        sender: &SenderId,
        record: &Value,
        cap: usize,
    ) -> Result<(), AttuneError> {
        let mut lists = self.lists.lock().await;
        let list = lists.entry((kind, sender.clone())).or_default();
        list.push(record.clone());
        while list.len() > cap {
            list.remove(0);
        }
        Ok(())
    }

    async fn get_recent(
        &self,
        kind: MemoryKind,
        sender: &SenderId,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, AttuneError> {
        let lists = self.lists.lock().await;
        let list = lists
            .get(&(kind, sender.clone()))
            .cloned()
            .unwrap_or_default();
        Ok(match limit {
            Some(n) if n < list.len() => list[list.len() - n..].to_vec(),
            _ => list,
        })
    }

    async fn replace_all(
        &self,
        kind: MemoryKind,
        sender: &SenderId,
        records: &[Value],
    ) -> Result<(), AttuneError> {
        let mut lists = self.lists.lock().await;
        if records.is_empty() {
            lists.remove(&(kind, sender.clone()));
        } else {
            lists.insert((kind, sender.clone()), records.to_vec());
        }
        Ok(())
    }

    async fn set_singleton(
        &self,
        kind: MemoryKind,
        sender: &SenderId,
        value: &Value,
    ) -> Result<(), AttuneError> {
        let mut singletons = self.singletons.lock().await;
        if value.is_null() {
            singletons.remove(&(kind, sender.clone()));
        } else {
            singletons.insert((kind, sender.clone()), value.clone());
        }
        Ok(())
    }

    async fn get_singleton(
        &self,
        kind: MemoryKind,
        sender: &SenderId,
    ) -> Result<Option<Value>, AttuneError> {
        let singletons = self.singletons.lock().await;
        Ok(singletons.get(&(kind, sender.clone())).cloned())
    }

    async fn senders(&self) -> Result<Vec<SenderId>, AttuneError> {
        let mut all: Vec<SenderId> = Vec::new();
        for (_, sender) in self.lists.lock().await.keys() {
            if !all.contains(sender) {
                all.push(sender.clone());
            }
        }
        for (_, sender) in self.singletons.lock().await.keys() {
            if !all.contains(sender) {
                all.push(sender.clone());
            }
        }
        Ok(all)
    }
}
