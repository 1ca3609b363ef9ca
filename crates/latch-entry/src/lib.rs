//! Typed entries over a schema-less key-value store.
//!
//! An [`Entry`] binds a key, a shared [`KvStore`] and a [`Strategy`]. Reading
//! fetches through the strategy's [`Quantifier`], which decodes via the item
//! type's [`Storable`] impl; the strategy then resolves absence and applies
//! its transform. Writing runs the transform and encodes back.
//!
//! # Composition
//!
//! | strategy      | quantifier  | read type        | alias                  |
//! |---------------|-------------|------------------|------------------------|
//! | [`Optional`]  | [`Single`]  | `Option<T>`      | [`OptionalEntry`]      |
//! | [`Optional`]  | [`List`]    | `Option<Vec<T>>` | [`OptionalListEntry`]  |
//! | [`Ensured`]   | [`Single`]  | `T`              | [`EnsuredEntry`]       |
//! | [`Ensured`]   | [`List`]    | `Vec<T>`         | [`EnsuredListEntry`]   |
//!
//! All four are the same generic [`Entry`]; the combination is chosen at
//! compile time by its type parameter.
//!
//! # Modules
//!
//! - [`storable`] — The [`Storable`] capability and its built-in impls
//! - [`raw`] — [`RawRepresentable`] types and the [`storable_via_raw!`] macro
//! - [`archived`] — [`Archived`] serde values stored as opaque bytes
//! - [`quantifier`] — [`Single`] and [`List`] cardinality
//! - [`strategy`] — [`Optional`] and [`Ensured`] resolution
//! - [`entry`] — The [`Entry`] accessor

pub mod archived;
pub mod entry;
pub mod quantifier;
pub mod raw;
pub mod storable;
pub mod strategy;

pub use archived::Archived;
pub use entry::Entry;
pub use latch_store::KvStore;
pub use latch_types::RawValue;
pub use quantifier::{List, Quantifier, Single};
pub use raw::RawRepresentable;
pub use storable::Storable;
pub use strategy::{ChangeFn, EnsureFn, Ensured, FallbackFn, Optional, Strategy, StoredValue};

/// One optional value.
pub type OptionalEntry<T> = Entry<Optional<Single<T>>>;

/// An optional list.
pub type OptionalListEntry<T> = Entry<Optional<List<T>>>;

/// One value with a fallback.
pub type EnsuredEntry<T> = Entry<Ensured<Single<T>>>;

/// A list with a fallback.
pub type EnsuredListEntry<T> = Entry<Ensured<List<T>>>;
