//! Cardinality: one value per key, or an ordered list per key.

use std::any::type_name;
use std::marker::PhantomData;

use latch_store::KvStore;
use latch_types::RawValue;
use tracing::{debug, warn};

use crate::storable::Storable;

/// Selects the shape an entry reads and writes through the [`Storable`]
/// capability of its item type.
///
/// Implementors are zero-sized markers; they are never instantiated and hold
/// no state.
pub trait Quantifier: 'static {
    /// The element type.
    type Item: Storable;

    /// What a present value looks like to callers.
    type Value: Clone + Send + Sync + 'static;

    /// Decode a present raw value. `None` when the shape does not match.
    fn decode(raw: &RawValue) -> Option<Self::Value>;

    /// Encode a value. `None` when it has no raw representation.
    fn encode(value: &Self::Value) -> Option<RawValue>;

    /// Read and decode the value at `key`.
    ///
    /// Missing keys, undecodable data, and store failures all read as `None`.
    fn fetch(store: &dyn KvStore, key: &str) -> Option<Self::Value> {
        match store.get(key) {
            Ok(Some(raw)) => {
                let value = Self::decode(&raw);
                if value.is_none() {
                    debug!(
                        key,
                        kind = %raw.kind(),
                        item = type_name::<Self::Item>(),
                        "stored value does not decode, treating as absent"
                    );
                }
                value
            }
            Ok(None) => None,
            Err(e) => {
                warn!(key, error = %e, "store read failed, treating as absent");
                None
            }
        }
    }

    /// Encode and write `value` at `key`, or remove the key for `None`.
    ///
    /// A store failure is logged and the write is dropped.
    fn put(store: &dyn KvStore, key: &str, value: Option<&Self::Value>) {
        let raw = match value {
            Some(value) => {
                let raw = Self::encode(value);
                if raw.is_none() {
                    warn!(
                        key,
                        item = type_name::<Self::Item>(),
                        "value has no raw representation, removing key"
                    );
                }
                raw
            }
            None => None,
        };
        if let Err(e) = store.set(key, raw) {
            warn!(key, error = %e, "store write failed, value dropped");
        }
    }
}

/// Exactly one `T` under the key.
pub struct Single<T>(PhantomData<fn() -> T>);

/// An ordered sequence of `T` under the key, written and replaced as a whole.
pub struct List<T>(PhantomData<fn() -> T>);

impl<T: Storable> Quantifier for Single<T> {
    type Item = T;
    type Value = T;

    fn decode(raw: &RawValue) -> Option<T> {
        T::decode(raw)
    }

    fn encode(value: &T) -> Option<RawValue> {
        value.encode()
    }
}

impl<T: Storable> Quantifier for List<T> {
    type Item = T;
    type Value = Vec<T>;

    fn decode(raw: &RawValue) -> Option<Vec<T>> {
        T::decode_list(raw)
    }

    fn encode(value: &Vec<T>) -> Option<RawValue> {
        T::encode_list(value)
    }
}
