//! The [`Entry`] accessor: a key, a shared store, and a strategy.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use latch_store::KvStore;
use tracing::{debug, trace, warn};

use crate::quantifier::Quantifier;
use crate::strategy::Strategy;

/// Typed read/write access to one key of a shared store.
///
/// Entries are immutable values. `ensure`, `with_transform` and
/// `with_notification` return new entries bound to the same key and store;
/// the entry they were derived from keeps its own behavior. Entries never
/// return errors: missing, undecodable, and unreadable data all resolve
/// through the strategy as absence.
pub struct Entry<S: Strategy> {
    key: String,
    store: Arc<dyn KvStore>,
    strategy: S,
    batch_lock: Option<Arc<Mutex<()>>>,
}

impl<S: Strategy> Entry<S> {
    /// Bind `key` in `store` with `strategy`. Nothing is read or written.
    pub fn new(key: impl Into<String>, store: Arc<dyn KvStore>, strategy: S) -> Self {
        Self {
            key: key.into(),
            store,
            strategy,
            batch_lock: None,
        }
    }

    /// Hold `lock` for the whole of every [`with_batched_change`](Self::with_batched_change).
    ///
    /// Entries sharing a lock cannot interleave their batched changes. A
    /// `mutate` closure that starts another batched change on an entry
    /// sharing the same lock deadlocks; change callbacks run after the lock
    /// is released and may do so freely.
    pub fn serialized_by(mut self, lock: Arc<Mutex<()>>) -> Self {
        self.batch_lock = Some(lock);
        self
    }

    /// The store key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The store this entry reads and writes.
    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    /// The resolution strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Read the current value.
    pub fn get(&self) -> S::Output {
        let stored = S::Quantifier::fetch(self.store.as_ref(), &self.key);
        trace!(key = %self.key, present = stored.is_some(), "entry read");
        self.strategy.resolve(stored)
    }

    /// Write `value` after the transform. An absent optional removes the key.
    pub fn set(&self, value: S::Output) {
        let stored = self.strategy.prepare(value);
        debug!(key = %self.key, present = stored.is_some(), "entry write");
        S::Quantifier::put(self.store.as_ref(), &self.key, stored.as_ref());
    }

    /// Remove the key, whatever the strategy.
    pub fn clear(&self) {
        debug!(key = %self.key, "entry clear");
        if let Err(e) = self.store.remove(&self.key) {
            warn!(key = %self.key, error = %e, "store remove failed");
        }
    }

    /// Whether the store currently holds anything at this key, decodable or not.
    pub fn exists(&self) -> bool {
        match self.store.contains(&self.key) {
            Ok(present) => present,
            Err(e) => {
                warn!(key = %self.key, error = %e, "store read failed, treating as absent");
                false
            }
        }
    }

    /// Derive an entry that substitutes a value whenever `when` holds after
    /// the existing transform.
    ///
    /// For ensured entries the substitute is the entry's own fallback and
    /// `replacement` is ignored.
    pub fn ensure<P>(&self, when: P, replacement: S::Output) -> Self
    where
        P: Fn(&S::Output) -> bool + Send + Sync + 'static,
    {
        self.derive(self.strategy.ensure(when, replacement))
    }

    /// Derive an entry whose transform runs `f` after the existing one.
    pub fn with_transform<F>(&self, f: F) -> Self
    where
        F: Fn(S::Output) -> S::Output + Send + Sync + 'static,
    {
        self.derive(self.strategy.with_transform(f))
    }

    /// Derive an entry whose batched changes call `on_change(new, old)`.
    pub fn with_notification<F>(&self, on_change: F) -> Self
    where
        F: Fn(&S::Output, &S::Output) + Send + Sync + 'static,
    {
        self.derive(self.strategy.with_notification(Arc::new(on_change)))
    }

    /// Run `mutate` as one logical change.
    ///
    /// With a notification attached, the value is read before and after
    /// `mutate` and the callback fires exactly once with `(new, old)`,
    /// however many reads and writes `mutate` performs. Without one, `mutate`
    /// runs alone and the store is not touched.
    ///
    /// A batch lock, if any, is released before the callback runs, so the
    /// callback may start batched changes of its own.
    pub fn with_batched_change<F: FnOnce()>(&self, mutate: F) {
        let guard = self
            .batch_lock
            .as_ref()
            .map(|lock| lock.lock().unwrap_or_else(PoisonError::into_inner));

        let Some(on_change) = self.strategy.on_change() else {
            mutate();
            return;
        };

        let old = self.get();
        mutate();
        let new = self.get();
        drop(guard);
        debug!(key = %self.key, "batched change, notifying");
        on_change(&new, &old);
    }

    fn derive(&self, strategy: S) -> Self {
        Self {
            key: self.key.clone(),
            store: Arc::clone(&self.store),
            strategy,
            batch_lock: self.batch_lock.clone(),
        }
    }
}

impl<S: Strategy> Clone for Entry<S> {
    fn clone(&self) -> Self {
        self.derive(self.strategy.clone())
    }
}

impl<S: Strategy + fmt::Debug> fmt::Debug for Entry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("strategy", &self.strategy)
            .field("serialized", &self.batch_lock.is_some())
            .finish()
    }
}
