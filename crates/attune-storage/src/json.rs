// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON flat-file storage backend.
//!
//! The whole store lives in one file, rewritten atomically (temp file +
//! rename) on every write. The memory manager already debounces writes, so
//! write frequency stays low. A corrupted file is quarantined by renaming
//! it aside and the store restarts empty rather than failing to open.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{info, warn};

use attune_core::{
    AdapterType, AttuneError, HealthStatus, MemoryKind, PluginAdapter, SenderId,
    StorageAdapter,
};

/// On-disk shape: kind -> sender -> records/value.
#[derive(Debug, Default, Serialize, Deserialize)]
struct FileState {
    #[serde(default)]
    lists: HashMap<String, HashMap<String, Vec<Value>>>,
    #[serde(default)]
    singletons: HashMap<String, HashMap<String, Value>>,
}

/// Flat-file storage adapter.
pub struct JsonStorage {
    path: PathBuf,
    state: Mutex<Option<FileState>>,
}

impl JsonStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(None),
        }
    }

    fn storage_err(e: impl std::error::Error + Send + Sync + 'static) -> AttuneError {
        AttuneError::Storage {
            source: Box::new(e),
        }
    }

    fn not_initialized() -> AttuneError {
        AttuneError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        }
    }

    fn load_or_quarantine(path: &Path) -> FileState {
        if !path.exists() {
            info!(path = %path.display(), "no existing memory file, starting fresh");
            return FileState::default();
        }

        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read memory file, starting fresh");
                return FileState::default();
            }
        };

        match serde_json::from_str::<FileState>(&raw) {
            Ok(state) => state,
            Err(e) => {
                let backup = path.with_extension(format!(
                    "corrupted.{}",
                    chrono::Utc::now().timestamp()
                ));
                warn!(path = %path.display(), error = %e, "memory file corrupted");
                match std::fs::rename(path, &backup) {
                    Ok(()) => warn!(backup = %backup.display(), "corrupted file quarantined"),
                    Err(e) => warn!(error = %e, "failed to quarantine corrupted file"),
                }
                FileState::default()
            }
        }
    }

    /// Serialize the state to a temp file and rename it into place.
    fn persist(&self, state: &FileState) -> Result<(), AttuneError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(Self::storage_err)?;
            }
        }
        let serialized = serde_json::to_vec_pretty(state).map_err(Self::storage_err)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serialized).map_err(Self::storage_err)?;
        std::fs::rename(&tmp, &self.path).map_err(Self::storage_err)?;
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for JsonStorage {
    fn name(&self) -> &str {
        "json"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, AttuneError> {
        if self.state.lock().await.is_some() {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy("not initialized".to_string()))
        }
    }

    async fn shutdown(&self) -> Result<(), AttuneError> {
        self.close().await
    }
}

#[async_trait]
impl StorageAdapter for JsonStorage {
    async fn initialize(&self) -> Result<(), AttuneError> {
        let mut state = self.state.lock().await;
        *state = Some(Self::load_or_quarantine(&self.path));
        Ok(())
    }

    async fn close(&self) -> Result<(), AttuneError> {
        let state = self.state.lock().await;
        match state.as_ref() {
            Some(s) => self.persist(s),
            None => Ok(()),
        }
    }

    async fn append_with_cap(
        &self,
        kind: MemoryKind,
        sender: &SenderId,
        record: &Value,
        cap: usize,
    ) -> Result<(), AttuneError> {
        let mut guard = self.state.lock().await;
        let state = guard.as_mut().ok_or_else(Self::not_initialized)?;
        let list = state
            .lists
            .entry(kind.to_string())
            .or_default()
            .entry(sender.0.clone())
            .or_default();
        list.push(record.clone());
        while list.len() > cap {
            list.remove(0);
        }
        self.persist(state)
    }

    async fn get_recent(
        &self,
        kind: MemoryKind,
        sender: &SenderId,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, AttuneError> {
        let guard = self.state.lock().await;
        let state = guard.as_ref().ok_or_else(Self::not_initialized)?;
        let list = state
            .lists
            .get(&kind.to_string())
            .and_then(|m| m.get(&sender.0))
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
        let mut guard = self.state.lock().await;
        let state = guard.as_mut().ok_or_else(Self::not_initialized)?;
        let by_sender = state.lists.entry(kind.to_string()).or_default();
        if records.is_empty() {
            by_sender.remove(&sender.0);
        } else {
            by_sender.insert(sender.0.clone(), records.to_vec());
        }
        self.persist(state)
    }

    async fn set_singleton(
        &self,
        kind: MemoryKind,
        sender: &SenderId,
        value: &Value,
    ) -> Result<(), AttuneError> {
        let mut guard = self.state.lock().await;
        let state = guard.as_mut().ok_or_else(Self::not_initialized)?;
        let by_sender = state.singletons.entry(kind.to_string()).or_default();
        if value.is_null() {
            by_sender.remove(&sender.0);
        } else {
            by_sender.insert(sender.0.clone(), value.clone());
        }
        self.persist(state)
    }

    async fn get_singleton(
        &self,
        kind: MemoryKind,
        sender: &SenderId,
    ) -> Result<Option<Value>, AttuneError> {
        let guard = self.state.lock().await;
        let state = guard.as_ref().ok_or_else(Self::not_initialized)?;
        Ok(state
            .singletons
            .get(&kind.to_string())
            .and_then(|m| m.get(&sender.0))
            .cloned())
    }

    async fn senders(&self) -> Result<Vec<SenderId>, AttuneError> {
        let guard = self.state.lock().await;
        let state = guard.as_ref().ok_or_else(Self::not_initialized)?;
        let mut all: Vec<SenderId> = Vec::new();
        let names = state
            .lists
            .values()
            .flat_map(|m| m.keys())
            .chain(state.singletons.values().flat_map(|m| m.keys()));
        for name in names {
            let sender = SenderId(name.clone());
            if !all.contains(&sender) {
                all.push(sender);
            }
        }
        Ok(all)
    }
}
