// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::Result;
use crate::models::{EntityKind, Record};
use anyhow::Context;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Fintesa", "fintesa"));

/// Environment variable overriding the database location.
pub const DB_ENV: &str = "FINTESA_DB";

/// A pending change for [`Storage::write_all`]: `Some` upserts the document,
/// `None` deletes the key.
pub type Entry = (&'static str, Option<String>);

/// Durable key/value storage for JSON documents, one key per entity kind.
pub trait Storage {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
    /// Applies every entry or none of them.
    fn write_all(&mut self, entries: &[Entry]) -> Result<()>;
}

/// Loads the collection for `T`, falling back to its defaults when nothing is
/// stored or the stored document cannot be read.
pub fn load<T: Record, S: Storage + ?Sized>(storage: &S) -> Vec<T> {
    let key = T::KIND.storage_key();
    match storage.read(key) {
        Ok(Some(raw)) => match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => items,
            Err(e) => {
                warn!(key, error = %e, "stored collection is unreadable, using defaults");
                T::defaults()
            }
        },
        Ok(None) => T::defaults(),
        Err(e) => {
            warn!(key, error = %e, "failed to read collection, using defaults");
            T::defaults()
        }
    }
}

/// Writes the whole collection for `T` under its key.
pub fn save<T: Record, S: Storage + ?Sized>(storage: &mut S, items: &[T]) -> Result<()> {
    let key = T::KIND.storage_key();
    let raw = serde_json::to_string(items)?;
    storage.write(key, &raw)?;
    debug!(key, count = items.len(), "collection saved");
    Ok(())
}

/// Encodes a whole collection as a batch entry for [`Storage::write_all`].
pub fn entry<T: Record>(items: &[T]) -> Result<Entry> {
    Ok((T::KIND.storage_key(), Some(serde_json::to_string(items)?)))
}

/// Removes every persisted collection in one batch.
pub fn clear<S: Storage + ?Sized>(storage: &mut S) -> Result<()> {
    let entries: [Entry; 5] = EntityKind::ALL.map(|kind| (kind.storage_key(), None));
    storage.write_all(&entries)?;
    debug!("all collections cleared");
    Ok(())
}

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl Storage for SqliteStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let v: Option<String> = self
            .conn
            .query_row("SELECT value FROM kv WHERE key=?1", params![key], |r| {
                r.get(0)
            })
            .optional()?;
        Ok(v)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        upsert(&self.conn, key, value)
    }

    fn write_all(&mut self, entries: &[Entry]) -> Result<()> {
        let tx = self.conn.transaction()?;
        for (key, value) in entries {
            match value {
                Some(v) => upsert(&tx, key, v)?,
                None => {
                    tx.execute("DELETE FROM kv WHERE key=?1", params![key])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }
}

fn upsert(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO kv(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=datetime('now')",
        params![key, value],
    )?;
    Ok(())
}

/// In-process storage; nothing survives the value being dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn write_all(&mut self, entries: &[Entry]) -> Result<()> {
        let mut staged = self.entries.clone();
        for (key, value) in entries {
            match value {
                Some(v) => staged.insert(key.to_string(), v.clone()),
                None => staged.remove(*key),
            };
        }
        self.entries = staged;
        Ok(())
    }
}

pub fn db_path() -> anyhow::Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("fintesa.sqlite"))
}

/// Picks the database file: explicit flag, then `FINTESA_DB`, then the platform data dir.
pub fn resolve_db_path(flag: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(p) = flag {
        return Ok(PathBuf::from(p));
    }
    match std::env::var(DB_ENV) {
        Ok(p) if !p.trim().is_empty() => Ok(PathBuf::from(p.trim())),
        _ => db_path(),
    }
}

pub fn open_or_init(path: &Path) -> anyhow::Result<SqliteStorage> {
    SqliteStorage::open(path).with_context(|| format!("Open DB at {}", path.display()))
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS kv(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}
