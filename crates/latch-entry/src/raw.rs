//! Storage for enum-like types through a raw backing value.

use latch_types::RawValue;

use crate::storable::Storable;

/// A type with a lossless mapping onto a simpler storable "raw" value,
/// typically a fieldless enum backed by a string or integer.
///
/// Implement this, then register the type with [`storable_via_raw!`].
pub trait RawRepresentable: Sized {
    /// The storable type backing this one.
    type Raw: Storable;

    /// The raw value for `self`.
    fn to_raw(&self) -> Self::Raw;

    /// Map a raw value back, or `None` if no variant corresponds to it.
    fn from_raw(raw: Self::Raw) -> Option<Self>;
}

/// Decode through the raw backing type.
pub fn decode_raw<T: RawRepresentable>(raw: &RawValue) -> Option<T> {
    T::from_raw(T::Raw::decode(raw)?)
}

/// Decode a list through the raw backing type.
///
/// Unlike the default list decoding, elements with no corresponding variant
/// are skipped rather than discarding the whole list, so a list written by a
/// build with more variants still reads as the known subset.
pub fn decode_raw_list<T: RawRepresentable>(raw: &RawValue) -> Option<Vec<T>> {
    Some(
        raw.as_list()?
            .iter()
            .filter_map(|item| T::Raw::decode(item).and_then(T::from_raw))
            .collect(),
    )
}

/// Encode through the raw backing type.
pub fn encode_raw<T: RawRepresentable>(value: &T) -> Option<RawValue> {
    value.to_raw().encode()
}

/// Implement [`Storable`] for one or more [`RawRepresentable`] types.
///
/// ```
/// use latch_entry::{storable_via_raw, RawRepresentable, Storable};
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum Theme {
///     Light,
///     Dark,
/// }
///
/// impl RawRepresentable for Theme {
///     type Raw = String;
///
///     fn to_raw(&self) -> String {
///         match self {
///             Theme::Light => "light".into(),
///             Theme::Dark => "dark".into(),
///         }
///     }
///
///     fn from_raw(raw: String) -> Option<Self> {
///         match raw.as_str() {
///             "light" => Some(Theme::Light),
///             "dark" => Some(Theme::Dark),
///             _ => None,
///         }
///     }
/// }
///
/// storable_via_raw!(Theme);
///
/// let raw = Theme::Dark.encode().unwrap();
/// assert_eq!(Theme::decode(&raw), Some(Theme::Dark));
/// ```
#[macro_export]
macro_rules! storable_via_raw {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::Storable for $ty {
            fn decode(raw: &$crate::RawValue) -> ::core::option::Option<Self> {
                $crate::raw::decode_raw(raw)
            }

            fn encode(&self) -> ::core::option::Option<$crate::RawValue> {
                $crate::raw::encode_raw(self)
            }

            fn decode_list(
                raw: &$crate::RawValue,
            ) -> ::core::option::Option<::std::vec::Vec<Self>> {
                $crate::raw::decode_raw_list(raw)
            }
        }
    )+};
}
