//! Resolution strategies: how absence is surfaced, plus the transform and
//! change notification every entry carries.
//!
//! - [`Optional`] surfaces a missing value as `None`.
//! - [`Ensured`] masks a missing value with a lazily evaluated fallback, so
//!   readers always get a value.
//!
//! Strategies are immutable. Every derivation (`with_transform`, `ensure`,
//! `with_notification`) returns a new strategy and leaves the original
//! untouched, so entries derived from the same parent stay independent.

use std::fmt;
use std::sync::Arc;

use crate::quantifier::Quantifier;

/// Transform applied to every value on read and on write.
pub type EnsureFn<T> = Arc<dyn Fn(T) -> T + Send + Sync>;

/// Change callback, invoked as `(new, old)`.
pub type ChangeFn<T> = Arc<dyn Fn(&T, &T) + Send + Sync>;

/// Lazily evaluated fallback for [`Ensured`].
pub type FallbackFn<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// The value type a strategy stores through its quantifier.
pub type StoredValue<S> = <<S as Strategy>::Quantifier as Quantifier>::Value;

fn identity<T: 'static>() -> EnsureFn<T> {
    Arc::new(|value| value)
}

fn compose<T: 'static>(
    first: &EnsureFn<T>,
    then: impl Fn(T) -> T + Send + Sync + 'static,
) -> EnsureFn<T> {
    let first = Arc::clone(first);
    Arc::new(move |value| then(first(value)))
}

/// Resolves stored values into what callers observe, and back.
pub trait Strategy: Clone + Send + Sync + 'static {
    /// Cardinality the strategy reads and writes through.
    type Quantifier: Quantifier;

    /// What callers read and write.
    type Output: Clone + Send + Sync + 'static;

    /// Turn a fetched value (or its absence) into the observed value.
    fn resolve(&self, stored: Option<StoredValue<Self>>) -> Self::Output;

    /// Turn a value being written into what gets stored; `None` removes the key.
    fn prepare(&self, value: Self::Output) -> Option<StoredValue<Self>>;

    /// The composed transform.
    fn transform(&self) -> &EnsureFn<Self::Output>;

    /// The change callback, if any.
    fn on_change(&self) -> Option<&ChangeFn<Self::Output>>;

    /// Derive a strategy whose transform runs `f` after the current one.
    fn with_transform<F>(&self, f: F) -> Self
    where
        F: Fn(Self::Output) -> Self::Output + Send + Sync + 'static;

    /// Derive a strategy with `on_change` replaced.
    fn with_notification(&self, on_change: ChangeFn<Self::Output>) -> Self;

    /// Derive a strategy that substitutes a value whenever `when` holds on
    /// the transformed value.
    fn ensure<P>(&self, when: P, replacement: Self::Output) -> Self
    where
        P: Fn(&Self::Output) -> bool + Send + Sync + 'static;

    /// Apply the transform to `value`.
    fn ensure_value(&self, value: Self::Output) -> Self::Output {
        (self.transform())(value)
    }
}

// ---------------------------------------------------------------------------
// Optional
// ---------------------------------------------------------------------------

/// Missing means `None`.
///
/// The transform sees the whole `Option`, so the default identity transform
/// keeps absence as absence, while a caller transform may turn `None` into a
/// value (for example `ensure(Option::is_none, Some(x))`).
pub struct Optional<Q: Quantifier> {
    ensure: EnsureFn<Option<Q::Value>>,
    on_change: Option<ChangeFn<Option<Q::Value>>>,
}

impl<Q: Quantifier> Optional<Q> {
    /// Identity transform, no notification.
    pub fn new() -> Self {
        Self {
            ensure: identity(),
            on_change: None,
        }
    }
}

impl<Q: Quantifier> Default for Optional<Q> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q: Quantifier> Clone for Optional<Q> {
    fn clone(&self) -> Self {
        Self {
            ensure: Arc::clone(&self.ensure),
            on_change: self.on_change.clone(),
        }
    }
}

impl<Q: Quantifier> fmt::Debug for Optional<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Optional")
            .field("notifies", &self.on_change.is_some())
            .finish_non_exhaustive()
    }
}

impl<Q: Quantifier> Strategy for Optional<Q> {
    type Quantifier = Q;
    type Output = Option<Q::Value>;

    fn resolve(&self, stored: Option<Q::Value>) -> Option<Q::Value> {
        (self.ensure)(stored)
    }

    fn prepare(&self, value: Option<Q::Value>) -> Option<Q::Value> {
        (self.ensure)(value)
    }

    fn transform(&self) -> &EnsureFn<Option<Q::Value>> {
        &self.ensure
    }

    fn on_change(&self) -> Option<&ChangeFn<Option<Q::Value>>> {
        self.on_change.as_ref()
    }

    fn with_transform<F>(&self, f: F) -> Self
    where
        F: Fn(Option<Q::Value>) -> Option<Q::Value> + Send + Sync + 'static,
    {
        Self {
            ensure: compose(&self.ensure, f),
            on_change: self.on_change.clone(),
        }
    }

    fn with_notification(&self, on_change: ChangeFn<Option<Q::Value>>) -> Self {
        Self {
            ensure: Arc::clone(&self.ensure),
            on_change: Some(on_change),
        }
    }

    fn ensure<P>(&self, when: P, replacement: Option<Q::Value>) -> Self
    where
        P: Fn(&Option<Q::Value>) -> bool + Send + Sync + 'static,
    {
        self.with_transform(move |value| {
            if when(&value) {
                replacement.clone()
            } else {
                value
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Ensured
// ---------------------------------------------------------------------------

/// Missing means "use the fallback". Readers never see absence.
pub struct Ensured<Q: Quantifier> {
    fallback: FallbackFn<Q::Value>,
    ensure: EnsureFn<Q::Value>,
    on_change: Option<ChangeFn<Q::Value>>,
}

impl<Q: Quantifier> Ensured<Q> {
    /// Identity transform, no notification. `fallback` runs on every miss.
    pub fn new<F>(fallback: F) -> Self
    where
        F: Fn() -> Q::Value + Send + Sync + 'static,
    {
        Self {
            fallback: Arc::new(fallback),
            ensure: identity(),
            on_change: None,
        }
    }

    /// Evaluate the fallback.
    pub fn fallback(&self) -> Q::Value {
        (self.fallback)()
    }
}

impl<Q: Quantifier> Clone for Ensured<Q> {
    fn clone(&self) -> Self {
        Self {
            fallback: Arc::clone(&self.fallback),
            ensure: Arc::clone(&self.ensure),
            on_change: self.on_change.clone(),
        }
    }
}

impl<Q: Quantifier> fmt::Debug for Ensured<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ensured")
            .field("notifies", &self.on_change.is_some())
            .finish_non_exhaustive()
    }
}

impl<Q: Quantifier> Strategy for Ensured<Q> {
    type Quantifier = Q;
    type Output = Q::Value;

    fn resolve(&self, stored: Option<Q::Value>) -> Q::Value {
        let value = stored.unwrap_or_else(|| self.fallback());
        (self.ensure)(value)
    }

    fn prepare(&self, value: Q::Value) -> Option<Q::Value> {
        Some((self.ensure)(value))
    }

    fn transform(&self) -> &EnsureFn<Q::Value> {
        &self.ensure
    }

    fn on_change(&self) -> Option<&ChangeFn<Q::Value>> {
        self.on_change.as_ref()
    }

    fn with_transform<F>(&self, f: F) -> Self
    where
        F: Fn(Q::Value) -> Q::Value + Send + Sync + 'static,
    {
        Self {
            fallback: Arc::clone(&self.fallback),
            ensure: compose(&self.ensure, f),
            on_change: self.on_change.clone(),
        }
    }

    fn with_notification(&self, on_change: ChangeFn<Q::Value>) -> Self {
        Self {
            fallback: Arc::clone(&self.fallback),
            ensure: Arc::clone(&self.ensure),
            on_change: Some(on_change),
        }
    }

    /// The substitute is the strategy's own fallback; `replacement` is
    /// ignored so the substituted value always agrees with what a miss reads.
    fn ensure<P>(&self, when: P, _replacement: Q::Value) -> Self
    where
        P: Fn(&Q::Value) -> bool + Send + Sync + 'static,
    {
        let fallback = Arc::clone(&self.fallback);
        self.with_transform(move |value| if when(&value) { fallback() } else { value })
    }
}
