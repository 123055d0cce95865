// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite storage backend.
//!
//! All access is serialized through `tokio-rusqlite`'s single background
//! thread: the wrapped connection IS the single writer, which eliminates
//! SQLITE_BUSY errors under concurrent access. Do not open additional
//! connections for writes.

use async_trait::async_trait;
use rusqlite::OptionalExtension;
use serde_json::Value;
use tokio::sync::OnceCell;
use tokio_rusqlite::Connection;
use tracing::debug;

use attune_core::{
    AdapterType, AttuneError, HealthStatus, MemoryKind, PluginAdapter, SenderId,
    StorageAdapter,
};

/// Helper to convert tokio_rusqlite errors into AttuneError::Storage.
fn storage_err(e: tokio_rusqlite::Error) -> AttuneError {
    AttuneError::Storage {
        source: Box::new(e),
    }
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS memory_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    kind TEXT NOT NULL,
    sender TEXT NOT NULL,
    record TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_memory_records_kind_sender
    ON memory_records(kind, sender);
CREATE TABLE IF NOT EXISTS memory_singletons (
    kind TEXT NOT NULL,
    sender TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (kind, sender)
);
";

/// SQLite-backed storage adapter.
///
/// The connection is lazily opened on [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    path: String,
    conn: OnceCell<Connection>,
}

impl SqliteStorage {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            conn: OnceCell::new(),
        }
    }

    fn conn(&self) -> Result<&Connection, AttuneError> {
        self.conn.get().ok_or_else(|| AttuneError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, AttuneError> {
        let conn = self.conn()?;
        conn.call(|conn| {
            conn.execute_batch("SELECT 1;")?;
            Ok(())
        })
        .await
        .map_err(storage_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), AttuneError> {
        if let Some(conn) = self.conn.get() {
            conn.call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(storage_err)?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), AttuneError> {
        if let Some(parent) = std::path::Path::new(&self.path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| AttuneError::Storage {
                    source: Box::new(e),
                })?;
            }
        }
        let conn = Connection::open(self.path.clone())
            .await
            .map_err(|e| AttuneError::Storage {
                source: Box::new(e),
            })?;
        conn.call(|conn| {
            conn.execute_batch("PRAGMA journal_mode=WAL;")?;
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(storage_err)?;
        self.conn.set(conn).map_err(|_| AttuneError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), AttuneError> {
        let conn = self.conn()?;
        conn.call(|conn| {
            conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
            Ok(())
        })
        .await
        .map_err(storage_err)
    }

    async fn append_with_cap(
        &self,
        kind: MemoryKind,
        sender: &SenderId,
        record: &Value,
        cap: usize,
    ) -> Result<(), AttuneError> {
        let kind = kind.to_string();
        let sender = sender.0.clone();
        let record = record.to_string();
        self.conn()?
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO memory_records (kind, sender, record) VALUES (?1, ?2, ?3)",
                    rusqlite::params![kind, sender, record],
                )?;
                // Evict oldest rows beyond the cap.
                conn.execute(
                    "DELETE FROM memory_records WHERE kind = ?1 AND sender = ?2 AND id NOT IN (
                         SELECT id FROM memory_records WHERE kind = ?1 AND sender = ?2
                         ORDER BY id DESC LIMIT ?3
                     )",
                    rusqlite::params![kind, sender, cap as i64],
                )?;
                Ok(())
            })
            .await
            .map_err(storage_err)
    }

    async fn get_recent(
        &self,
        kind: MemoryKind,
        sender: &SenderId,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, AttuneError> {
        let kind = kind.to_string();
        let sender = sender.0.clone();
        let raw: Vec<String> = self
            .conn()?
            .call(move |conn| {
                let rows = match limit {
                    Some(n) => {
                        let mut stmt = conn.prepare(
                            "SELECT record FROM (
                                 SELECT id, record FROM memory_records
                                 WHERE kind = ?1 AND sender = ?2
                                 ORDER BY id DESC LIMIT ?3
                             ) ORDER BY id ASC",
                        )?;
                        stmt.query_map(
                            rusqlite::params![kind, sender, n as i64],
                            |row| row.get::<_, String>(0),
                        )?
                        .collect::<Result<Vec<_>, _>>()?
                    }
                    None => {
                        let mut stmt = conn.prepare(
                            "SELECT record FROM memory_records
                             WHERE kind = ?1 AND sender = ?2 ORDER BY id ASC",
                        )?;
                        stmt.query_map(rusqlite::params![kind, sender], |row| {
                            row.get::<_, String>(0)
                        })?
                        .collect::<Result<Vec<_>, _>>()?
                    }
                };
                Ok(rows)
            })
            .await
            .map_err(storage_err)?;

        let mut records = Vec::with_capacity(raw.len());
        for text in raw {
            records.push(
                serde_json::from_str(&text).map_err(|e| AttuneError::Storage {
                    source: Box::new(e),
                })?,
            );
        }
        Ok(records)
    }

    async fn replace_all(
        &self,
        kind: MemoryKind,
        sender: &SenderId,
        records: &[Value],
    ) -> Result<(), AttuneError> {
        let kind = kind.to_string();
        let sender = sender.0.clone();
        let serialized: Vec<String> = records.iter().map(|r| r.to_string()).collect();
        self.conn()?
            .call(move |conn| {
                let tx = conn.transaction()?;
                tx.execute(
                    "DELETE FROM memory_records WHERE kind = ?1 AND sender = ?2",
                    rusqlite::params![kind, sender],
                )?;
                for record in &serialized {
                    tx.execute(
                        "INSERT INTO memory_records (kind, sender, record) VALUES (?1, ?2, ?3)",
                        rusqlite::params![kind, sender, record],
                    )?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(storage_err)
    }

    async fn set_singleton(
        &self,
        kind: MemoryKind,
        sender: &SenderId,
        value: &Value,
    ) -> Result<(), AttuneError> {
        let kind = kind.to_string();
        let sender = sender.0.clone();
        if value.is_null() {
            return self
                .conn()?
                .call(move |conn| {
                    conn.execute(
                        "DELETE FROM memory_singletons WHERE kind = ?1 AND sender = ?2",
                        rusqlite::params![kind, sender],
                    )?;
                    Ok(())
                })
                .await
                .map_err(storage_err);
        }
        let value = value.to_string();
        self.conn()?
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO memory_singletons (kind, sender, value) VALUES (?1, ?2, ?3)
                     ON CONFLICT(kind, sender) DO UPDATE SET value = excluded.value",
                    rusqlite::params![kind, sender, value],
                )?;
                Ok(())
            })
            .await
            .map_err(storage_err)
    }

    async fn get_singleton(
        &self,
        kind: MemoryKind,
        sender: &SenderId,
    ) -> Result<Option<Value>, AttuneError> {
        let kind = kind.to_string();
        let sender = sender.0.clone();
        let raw: Option<String> = self
            .conn()?
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT value FROM memory_singletons WHERE kind = ?1 AND sender = ?2",
                )?;
                let value = stmt
                    .query_row(rusqlite::params![kind, sender], |row| {
                        row.get::<_, String>(0)
                    })
                    .optional()?;
                Ok(value)
            })
            .await
            .map_err(storage_err)?;

        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text).map_err(|e| {
                AttuneError::Storage {
                    source: Box::new(e),
                }
            })?)),
            None => Ok(None),
        }
    }

    async fn senders(&self) -> Result<Vec<SenderId>, AttuneError> {
        let names: Vec<String> = self
            .conn()?
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT DISTINCT sender FROM memory_records
                     UNION SELECT DISTINCT sender FROM memory_singletons",
                )?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(storage_err)?;
        Ok(names.into_iter().map(SenderId).collect())
    }
}
