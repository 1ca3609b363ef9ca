//! Foundation types for Latch.
//!
//! Latch is a typed accessor layer over a schema-less key-value store. The
//! store itself only understands a small closed set of value shapes; this
//! crate defines that set. Every other Latch crate depends on `latch-types`.
//!
//! # Key Types
//!
//! - [`RawValue`] — A value in the shape the backing store holds natively
//! - [`ValueKind`] — The discriminant of a [`RawValue`], used in logs and errors
//! - [`TypeError`] — Failures converting raw values to and from JSON

pub mod error;
pub mod value;

pub use error::TypeError;
pub use value::{RawValue, ValueKind};
