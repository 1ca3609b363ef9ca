use latch_types::RawValue;

use crate::error::StoreResult;

/// Schema-less key-value store.
///
/// This is the only surface typed entries touch. Implementations must be
/// thread-safe (`Send + Sync`); entries hold them behind an `Arc` and any
/// number of entries may share one store and even one key.
///
/// - `get` returns `Ok(None)` when the key is absent.
/// - `set` with `None` removes the key.
/// - Values are returned exactly as written; the store never coerces.
pub trait KvStore: Send + Sync {
    /// Read the raw value stored at `key`.
    fn get(&self, key: &str) -> StoreResult<Option<RawValue>>;

    /// Write `value` at `key`, or remove the key when `value` is `None`.
    fn set(&self, key: &str, value: Option<RawValue>) -> StoreResult<()>;

    /// All keys currently present, sorted.
    fn keys(&self) -> StoreResult<Vec<String>>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()> {
        self.set(key, None)
    }

    /// Check whether `key` is present.
    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}
