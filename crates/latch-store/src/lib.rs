//! Key-value store contract for Latch.
//!
//! Latch never implements durable storage itself. It consumes any backend
//! that can map a string key to a [`RawValue`](latch_types::RawValue) and
//! remove keys on request. This crate defines that contract and ships an
//! in-memory backend.
//!
//! # Storage Backends
//!
//! All backends implement the [`KvStore`] trait:
//!
//! - [`InMemoryStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Keys are caller-supplied strings with no enforced namespace.
//! 2. Setting `None` removes the key; there is no stored null marker.
//! 3. The store never interprets values -- typing happens above it.
//! 4. Each `get`/`set` is atomic from the caller's point of view.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use traits::KvStore;
