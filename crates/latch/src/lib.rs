//! Latch: strongly-typed, named settings over a schema-less key-value store.
//!
//! This is the main entry point for applications. A [`Defaults`] facade
//! hands out typed entries for keys in a shared [`KvStore`]:
//!
//! ```
//! use std::sync::Arc;
//! use latch::{Defaults, InMemoryStore};
//!
//! let defaults = Defaults::new(Arc::new(InMemoryStore::new()));
//!
//! let tags = defaults.list::<String>("tags");
//! assert_eq!(tags.get(), None);
//! tags.set(Some(vec!["a".into(), "b".into()]));
//! assert_eq!(tags.get(), Some(vec!["a".to_string(), "b".to_string()]));
//!
//! let volume = defaults
//!     .value_or("volume", 5i64)
//!     .with_transform(|v| v.clamp(0, 10));
//! volume.set(42);
//! assert_eq!(volume.get(), 10);
//! ```
//!
//! Applications typically wrap the facade in their own accessors:
//!
//! ```
//! use latch::{Defaults, EnsuredEntry};
//!
//! struct Settings(Defaults);
//!
//! impl Settings {
//!     fn retry_count(&self) -> EnsuredEntry<i64> {
//!         self.0.value_or("retryCount", 0)
//!     }
//! }
//!
//! let settings = Settings(Defaults::standard());
//! assert!(settings.retry_count().get() >= 0);
//! ```

pub mod config;
pub mod defaults;
pub mod error;

pub use config::DefaultsConfig;
pub use defaults::Defaults;
pub use error::{ConfigError, ConfigResult};

// Re-export the entry machinery and store contract.
pub use latch_entry::{
    storable_via_raw, Archived, ChangeFn, EnsureFn, Ensured, EnsuredEntry, EnsuredListEntry,
    Entry, FallbackFn, List, Optional, OptionalEntry, OptionalListEntry, Quantifier,
    RawRepresentable, Single, Storable, Strategy, StoredValue,
};
pub use latch_store::{InMemoryStore, KvStore, StoreError, StoreResult};
pub use latch_types::{RawValue, TypeError, ValueKind};
