//! Embedded key-value store
//!
//! All records live in one sled tree as JSON values. Keys are plain
//! strings with colon-separated segments, e.g. `user:{id}`,
//! `file:{user}:{millis}`, `validation:{user}:{millis}`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store error: {0}")]
    Sled(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Handle to the backing store. Cloning shares the same database.
#[derive(Clone)]
pub struct KvStore {
    db: sled::Db,
}

impl KvStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            db: sled::open(path)?,
        })
    }

    /// In-memory store for tests, deleted on drop.
    pub fn temporary() -> Result<Self, StoreError> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.db.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_vec(value)?;
        self.db.insert(key, raw)?;
        Ok(())
    }

    pub fn del(&self, key: &str) -> Result<(), StoreError> {
        self.db.remove(key)?;
        Ok(())
    }

    /// All values whose key starts with `prefix`, in key order.
    pub fn get_by_prefix<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>, StoreError> {
        let mut values = Vec::new();
        for entry in self.db.scan_prefix(prefix) {
            let (_, raw) = entry?;
            values.push(serde_json::from_slice(&raw)?);
        }
        Ok(values)
    }
}
