// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Flat key-value persistence for the three collections.
//!
//! Each collection is one JSON array stored under a fixed key. Writes
//! always replace the whole array.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::Record;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("storage quota exceeded: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded { needed: usize, limit: usize },
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Transactions,
    Shares,
    Funds,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Transactions,
        Collection::Shares,
        Collection::Funds,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Collection::Transactions => "spendsmart_transactions_v1",
            Collection::Shares => "spendsmart_shares_v1",
            Collection::Funds => "spendsmart_funds_v1",
        }
    }

    /// Where unreadable data is copied before it can be overwritten.
    pub fn backup_key(&self) -> String {
        format!("{}_unreadable", self.key())
    }
}

/// One `<key>.json` file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-memory backend. An optional byte quota mimics browser storage limits.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(limit: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(limit),
        }
    }

    fn used_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(limit) = self.quota {
            let needed = self.used_without(key) + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded { needed, limit });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Outcome of decoding one stored collection.
#[derive(Debug)]
struct Decoded<T> {
    items: Vec<T>,
    rejected: usize,
}

// Element by element, so one bad record never takes the rest down with it.
fn decode<T: DeserializeOwned + Record>(
    raw: &str,
    collection: Collection,
) -> Result<Decoded<T>, StorageError> {
    if raw.trim().is_empty() {
        return Ok(Decoded {
            items: Vec::new(),
            rejected: 0,
        });
    }
    let values: Vec<serde_json::Value> = serde_json::from_str(raw)?;
    let mut items = Vec::with_capacity(values.len());
    let mut rejected = 0;
    for (index, value) in values.into_iter().enumerate() {
        let item = match serde_json::from_value::<T>(value) {
            Ok(item) => item,
            Err(err) => {
                warn!(key = collection.key(), index, %err, "skipping unreadable record");
                rejected += 1;
                continue;
            }
        };
        if let Err(err) = item.check() {
            warn!(key = collection.key(), id = item.id(), %err, "skipping out-of-range record");
            rejected += 1;
            continue;
        }
        items.push(item);
    }
    Ok(Decoded { items, rejected })
}

/// Reads a collection. An absent key is an empty collection; unreadable
/// records are logged and left out.
pub fn load<T: DeserializeOwned + Record>(
    store: &dyn KeyValueStore,
    collection: Collection,
) -> Result<Vec<T>, StorageError> {
    match store.get(collection.key())? {
        Some(raw) => Ok(decode(&raw, collection)?.items),
        None => Ok(Vec::new()),
    }
}

pub fn save<T: Serialize>(
    store: &mut dyn KeyValueStore,
    collection: Collection,
    items: &[T],
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(items)?;
    store.set(collection.key(), &raw)?;
    debug!(key = collection.key(), count = items.len(), "collection saved");
    Ok(())
}

/// Loads a collection for editing. Whatever cannot be read (the whole
/// blob or single records) is copied to [`Collection::backup_key`] first,
/// since the next save replaces the collection with what was readable.
pub fn recover<T: DeserializeOwned + Record>(
    store: &mut dyn KeyValueStore,
    collection: Collection,
) -> Vec<T> {
    let raw = match store.get(collection.key()) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!(key = collection.key(), %err, "failed to read collection, starting empty");
            return Vec::new();
        }
    };
    let items = match decode(&raw, collection) {
        Ok(Decoded { items, rejected: 0 }) => return items,
        Ok(Decoded { items, rejected }) => {
            warn!(key = collection.key(), rejected, "some records could not be loaded");
            items
        }
        Err(err) => {
            warn!(key = collection.key(), %err, "failed to load collection, starting empty");
            Vec::new()
        }
    };
    match store.set(&collection.backup_key(), &raw) {
        Ok(()) => warn!(backup = %collection.backup_key(), "original data kept in backup"),
        Err(err) => warn!(key = collection.key(), %err, "could not back up unreadable data"),
    }
    items
}
