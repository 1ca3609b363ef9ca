//! The [`Defaults`] facade: hands out typed entries bound to one store.

use std::sync::{Arc, Mutex, OnceLock};

use latch_entry::{
    Entry, Ensured, EnsuredEntry, EnsuredListEntry, Optional, OptionalEntry, OptionalListEntry,
    Storable, Strategy,
};
use latch_store::{InMemoryStore, KvStore};
use tracing::{trace, warn};

use crate::config::DefaultsConfig;
use crate::error::ConfigResult;

static STANDARD: OnceLock<Arc<InMemoryStore>> = OnceLock::new();

/// Factory for typed entries over one shared store.
///
/// The facade only picks the generic instantiation; all behavior lives in
/// [`Entry`]. Cloning a `Defaults` is cheap and the clone shares the store
/// (and the batch lock, if configured).
///
/// ```
/// use std::sync::Arc;
/// use latch::{Defaults, InMemoryStore};
///
/// let defaults = Defaults::new(Arc::new(InMemoryStore::new()));
/// let retries = defaults.value_or("retryCount", 0i64);
/// assert_eq!(retries.get(), 0);
/// retries.set(5);
/// assert_eq!(retries.get(), 5);
/// ```
#[derive(Clone)]
pub struct Defaults {
    store: Arc<dyn KvStore>,
    config: DefaultsConfig,
    batch_lock: Option<Arc<Mutex<()>>>,
}

impl Defaults {
    /// A facade over `store` with the default configuration.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            config: DefaultsConfig::default(),
            batch_lock: None,
        }
    }

    /// A facade over `store` with `config`, validated first.
    pub fn with_config(store: Arc<dyn KvStore>, config: DefaultsConfig) -> ConfigResult<Self> {
        config.validate()?;
        let batch_lock = config
            .serialize_batches
            .then(|| Arc::new(Mutex::new(())));
        Ok(Self {
            store,
            config,
            batch_lock,
        })
    }

    /// A facade over the process-wide in-memory store, created on first use.
    pub fn standard() -> Self {
        let store = STANDARD.get_or_init(|| Arc::new(InMemoryStore::new()));
        Self::new(Arc::clone(store) as Arc<dyn KvStore>)
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    /// The active configuration.
    pub fn config(&self) -> &DefaultsConfig {
        &self.config
    }

    /// An entry for `key` with an arbitrary strategy.
    pub fn entry<S: Strategy>(&self, key: &str, strategy: S) -> Entry<S> {
        let key = self.config.qualify(key);
        trace!(key = %key, "entry created");
        let entry = Entry::new(key, Arc::clone(&self.store), strategy);
        match &self.batch_lock {
            Some(lock) => entry.serialized_by(Arc::clone(lock)),
            None => entry,
        }
    }

    /// An optional single value.
    pub fn value<T: Storable>(&self, key: &str) -> OptionalEntry<T> {
        self.entry(key, Optional::new())
    }

    /// A single value that reads as `fallback` when missing.
    pub fn value_or<T: Storable>(&self, key: &str, fallback: T) -> EnsuredEntry<T> {
        self.value_or_else(key, move || fallback.clone())
    }

    /// A single value whose fallback is computed on each miss.
    pub fn value_or_else<T, F>(&self, key: &str, fallback: F) -> EnsuredEntry<T>
    where
        T: Storable,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.entry(key, Ensured::new(fallback))
    }

    /// An optional list.
    pub fn list<T: Storable>(&self, key: &str) -> OptionalListEntry<T> {
        self.entry(key, Optional::new())
    }

    /// A list that reads as `fallback` when missing.
    pub fn list_or<T: Storable>(&self, key: &str, fallback: Vec<T>) -> EnsuredListEntry<T> {
        self.list_or_else(key, move || fallback.clone())
    }

    /// A list whose fallback is computed on each miss.
    pub fn list_or_else<T, F>(&self, key: &str, fallback: F) -> EnsuredListEntry<T>
    where
        T: Storable,
        F: Fn() -> Vec<T> + Send + Sync + 'static,
    {
        self.entry(key, Ensured::new(fallback))
    }

    /// Remove `key` regardless of which entries refer to it.
    pub fn remove(&self, key: &str) {
        let key = self.config.qualify(key);
        if let Err(e) = self.store.remove(&key) {
            warn!(key = %key, error = %e, "store remove failed");
        }
    }
}

impl std::fmt::Debug for Defaults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Defaults")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
