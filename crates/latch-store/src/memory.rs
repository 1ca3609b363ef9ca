//! In-memory key-value store for testing and ephemeral use.
//!
//! [`InMemoryStore`] keeps every value in a `HashMap` protected by a
//! `RwLock`. It implements the full [`KvStore`] trait and is suitable for
//! unit tests, embedding, and short-lived processes.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use latch_types::RawValue;
use tracing::trace;

use crate::error::{StoreError, StoreResult};
use crate::traits::KvStore;

/// An in-memory implementation of [`KvStore`].
///
/// Raw access is serialized by the internal `RwLock`, so concurrent callers
/// never observe a torn value. Data is lost when the store is dropped.
pub struct InMemoryStore {
    values: RwLock<HashMap<String, RawValue>>,
    read_only: AtomicBool,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            read_only: AtomicBool::new(false),
        }
    }

    /// Load a store from a JSON object mapping keys to tagged raw values.
    pub fn from_json(json: &str) -> StoreResult<Self> {
        let values: HashMap<String, RawValue> =
            serde_json::from_str(json).map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(Self {
            values: RwLock::new(values),
            read_only: AtomicBool::new(false),
        })
    }

    /// Dump the store as a JSON object with keys in sorted order.
    pub fn to_json(&self) -> StoreResult<String> {
        let snapshot = self.snapshot()?;
        serde_json::to_string_pretty(&snapshot)
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Copy of every key and value, sorted by key.
    pub fn snapshot(&self) -> StoreResult<BTreeMap<String, RawValue>> {
        let values = self
            .values
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        Ok(values.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.values.read().map(|v| v.len()).unwrap_or(0)
    }

    /// Returns `true` if no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reject all subsequent writes with [`StoreError::ReadOnly`] (or accept
    /// them again when `read_only` is `false`).
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for InMemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<RawValue>> {
        let values = self
            .values
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: Option<RawValue>) -> StoreResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StoreError::ReadOnly);
        }
        let mut values = self
            .values
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        match value {
            Some(value) => {
                trace!(key, kind = %value.kind(), "store set");
                values.insert(key.to_string(), value);
            }
            None => {
                trace!(key, "store remove");
                values.remove(key);
            }
        }
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let values = self
            .values
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))?;
        let mut keys: Vec<String> = values.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("key_count", &self.len())
            .field("read_only", &self.read_only.load(Ordering::SeqCst))
            .finish()
    }
}
