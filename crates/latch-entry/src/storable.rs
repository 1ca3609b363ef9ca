//! The [`Storable`] capability: how a Rust type maps to and from a
//! [`RawValue`].
//!
//! Registering a type means implementing this trait; nothing else in the
//! entry machinery changes. Implementations here cover the primitives a
//! store holds directly plus a few common library types. Enum-like types
//! register through [`RawRepresentable`](crate::raw::RawRepresentable) and
//! serde types through [`Archived`](crate::archived::Archived).

use std::collections::BTreeMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use latch_types::RawValue;
use uuid::Uuid;

/// A type that can be written to and read back from a key-value store.
///
/// Decoders never fail loudly: a raw value of the wrong shape decodes to
/// `None`, exactly like a missing key. Encoders return `None` only when the
/// value has no raw representation, in which case the key is removed.
///
/// `T::decode(&v.encode()?) == Some(v)` must hold for every representable `v`,
/// and likewise for the list pair.
pub trait Storable: Sized + Clone + Send + Sync + 'static {
    /// Decode a single value.
    fn decode(raw: &RawValue) -> Option<Self>;

    /// Encode a single value.
    fn encode(&self) -> Option<RawValue>;

    /// Decode an ordered list stored under one key.
    ///
    /// All-or-nothing: one undecodable element makes the whole list absent.
    fn decode_list(raw: &RawValue) -> Option<Vec<Self>> {
        raw.as_list()?.iter().map(Self::decode).collect()
    }

    /// Encode an ordered list into a single raw value.
    fn encode_list(values: &[Self]) -> Option<RawValue> {
        values
            .iter()
            .map(Self::encode)
            .collect::<Option<Vec<_>>>()
            .map(RawValue::List)
    }
}

impl Storable for bool {
    fn decode(raw: &RawValue) -> Option<Self> {
        raw.as_bool()
    }

    fn encode(&self) -> Option<RawValue> {
        Some(RawValue::Bool(*self))
    }
}

impl Storable for i64 {
    fn decode(raw: &RawValue) -> Option<Self> {
        raw.as_int()
    }

    fn encode(&self) -> Option<RawValue> {
        Some(RawValue::Int(*self))
    }
}

/// Narrow integers widen into `RawValue::Int`; values outside the target
/// range decode as absent.
macro_rules! storable_narrow_int {
    ($($ty:ty),+) => {$(
        impl Storable for $ty {
            fn decode(raw: &RawValue) -> Option<Self> {
                <$ty>::try_from(raw.as_int()?).ok()
            }

            fn encode(&self) -> Option<RawValue> {
                Some(RawValue::Int(i64::from(*self)))
            }
        }
    )+};
}

storable_narrow_int!(i32, u32, i16, u16, u8);

/// Unsigned integers as wide as `i64` or wider. Values above `i64::MAX` have
/// no raw representation.
macro_rules! storable_wide_uint {
    ($($ty:ty),+) => {$(
        impl Storable for $ty {
            fn decode(raw: &RawValue) -> Option<Self> {
                <$ty>::try_from(raw.as_int()?).ok()
            }

            fn encode(&self) -> Option<RawValue> {
                i64::try_from(*self).ok().map(RawValue::Int)
            }
        }
    )+};
}

storable_wide_uint!(u64, usize);

impl Storable for f64 {
    fn decode(raw: &RawValue) -> Option<Self> {
        raw.as_float()
    }

    fn encode(&self) -> Option<RawValue> {
        Some(RawValue::Float(*self))
    }
}

impl Storable for f32 {
    fn decode(raw: &RawValue) -> Option<Self> {
        let v = raw.as_float()?;
        // Finite values beyond f32 range would otherwise become infinite.
        if v.is_finite() && !(f64::from(f32::MIN)..=f64::from(f32::MAX)).contains(&v) {
            return None;
        }
        Some(v as f32)
    }

    fn encode(&self) -> Option<RawValue> {
        Some(RawValue::Float(f64::from(*self)))
    }
}

impl Storable for String {
    fn decode(raw: &RawValue) -> Option<Self> {
        raw.as_str().map(str::to_string)
    }

    fn encode(&self) -> Option<RawValue> {
        Some(RawValue::String(self.clone()))
    }
}

impl Storable for Bytes {
    fn decode(raw: &RawValue) -> Option<Self> {
        raw.as_data().map(Bytes::copy_from_slice)
    }

    fn encode(&self) -> Option<RawValue> {
        Some(RawValue::Data(self.to_vec()))
    }
}

impl Storable for DateTime<Utc> {
    fn decode(raw: &RawValue) -> Option<Self> {
        raw.as_date()
    }

    fn encode(&self) -> Option<RawValue> {
        Some(RawValue::Date(*self))
    }
}

/// Stored in hyphenated string form.
impl Storable for Uuid {
    fn decode(raw: &RawValue) -> Option<Self> {
        Uuid::parse_str(raw.as_str()?).ok()
    }

    fn encode(&self) -> Option<RawValue> {
        Some(RawValue::String(self.hyphenated().to_string()))
    }
}

/// Passthrough for callers that want the stored shape as-is.
impl Storable for RawValue {
    fn decode(raw: &RawValue) -> Option<Self> {
        Some(raw.clone())
    }

    fn encode(&self) -> Option<RawValue> {
        Some(self.clone())
    }
}

impl<V: Storable> Storable for BTreeMap<String, V> {
    fn decode(raw: &RawValue) -> Option<Self> {
        raw.as_map()?
            .iter()
            .map(|(k, v)| V::decode(v).map(|v| (k.clone(), v)))
            .collect()
    }

    fn encode(&self) -> Option<RawValue> {
        self.iter()
            .map(|(k, v)| v.encode().map(|v| (k.clone(), v)))
            .collect::<Option<BTreeMap<_, _>>>()
            .map(RawValue::Map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn foreign_shapes_decode_as_absent() {
        assert_eq!(i64::decode(&RawValue::String("5".into())), None);
        assert_eq!(String::decode(&RawValue::Int(5)), None);
        assert_eq!(bool::decode(&RawValue::Int(1)), None);
        assert_eq!(f64::decode(&RawValue::Int(1)), None);
        assert_eq!(Uuid::decode(&RawValue::String("not-a-uuid".into())), None);
    }

    #[test]
    fn narrow_ints_reject_out_of_range() {
        assert_eq!(i32::decode(&RawValue::Int(i64::from(i32::MAX) + 1)), None);
        assert_eq!(u32::decode(&RawValue::Int(-1)), None);
        assert_eq!(u8::decode(&RawValue::Int(255)), Some(255));
        assert_eq!(u16::encode(&7), Some(RawValue::Int(7)));
    }

    #[test]
    fn wide_unsigned_ints_stay_within_i64() {
        assert_eq!(u64::encode(&42), Some(RawValue::Int(42)));
        assert_eq!(u64::decode(&RawValue::Int(i64::MAX)), Some(i64::MAX as u64));
        assert_eq!(u64::encode(&u64::MAX), None);
        assert_eq!(u64::decode(&RawValue::Int(-1)), None);
        assert_eq!(usize::decode(&RawValue::Int(3)), Some(3));
        assert_eq!(usize::decode(&RawValue::Float(3.0)), None);
    }

    #[test]
    fn f32_rejects_out_of_range_floats() {
        assert_eq!(f32::decode(&RawValue::Float(1e300)), None);
        assert_eq!(f32::decode(&RawValue::Float(-1e300)), None);
        assert_eq!(f32::decode(&RawValue::Float(f64::from(f32::MAX))), Some(f32::MAX));
        assert_eq!(f32::decode(&RawValue::Float(f64::INFINITY)), Some(f32::INFINITY));
        assert!(f32::decode(&RawValue::Float(f64::NAN)).is_some_and(f32::is_nan));
    }

    #[test]
    fn raw_values_pass_through_untouched() {
        let mut meta = BTreeMap::new();
        meta.insert("owner".to_string(), RawValue::String("ops".into()));
        meta.insert("weight".to_string(), RawValue::Float(0.5));
        let mixed = vec![RawValue::Int(1), RawValue::Bool(false), RawValue::Map(meta)];

        let raw = RawValue::encode_list(&mixed).unwrap();
        assert_eq!(RawValue::decode_list(&raw), Some(mixed.clone()));
        assert_eq!(RawValue::decode(&raw), Some(RawValue::List(mixed)));
        assert_eq!(RawValue::decode_list(&RawValue::Int(1)), None);
    }

    #[test]
    fn list_decode_is_all_or_nothing() {
        let mixed = RawValue::List(vec![RawValue::Int(1), RawValue::String("x".into())]);
        assert_eq!(i64::decode_list(&mixed), None);

        let ints = RawValue::List(vec![RawValue::Int(1), RawValue::Int(1), RawValue::Int(2)]);
        assert_eq!(i64::decode_list(&ints), Some(vec![1, 1, 2]));
    }

    #[test]
    fn list_decode_requires_list_shape() {
        assert_eq!(String::decode_list(&RawValue::String("a".into())), None);
        assert_eq!(String::decode_list(&RawValue::List(vec![])), Some(vec![]));
    }

    #[test]
    fn library_types_round_trip() {
        let when = Utc.with_ymd_and_hms(2023, 11, 5, 8, 30, 0).unwrap();
        assert_eq!(DateTime::<Utc>::decode(&when.encode().unwrap()), Some(when));

        let id = Uuid::now_v7();
        assert_eq!(id.encode(), Some(RawValue::String(id.hyphenated().to_string())));
        assert_eq!(Uuid::decode(&id.encode().unwrap()), Some(id));

        let blob = Bytes::from_static(b"\x00\x01latch");
        assert_eq!(Bytes::decode(&blob.encode().unwrap()), Some(blob));
    }

    #[test]
    fn dictionaries_decode_per_value() {
        let mut limits = BTreeMap::new();
        limits.insert("cpu".to_string(), 4i64);
        limits.insert("mem".to_string(), 512i64);
        let raw = limits.encode().unwrap();
        assert_eq!(BTreeMap::<String, i64>::decode(&raw), Some(limits));

        let mut bad = BTreeMap::new();
        bad.insert("cpu".to_string(), RawValue::Bool(true));
        assert_eq!(BTreeMap::<String, i64>::decode(&RawValue::Map(bad)), None);
    }

    proptest! {
        #[test]
        fn ints_round_trip(v in any::<i64>()) {
            prop_assert_eq!(i64::decode(&v.encode().unwrap()), Some(v));
        }

        #[test]
        fn string_lists_round_trip(items in proptest::collection::vec(".*", 0..6)) {
            let raw = String::encode_list(&items).unwrap();
            prop_assert_eq!(String::decode_list(&raw), Some(items));
        }

        #[test]
        fn f32_round_trips_through_f64(
            v in any::<f32>().prop_filter("finite", |v| v.is_finite())
        ) {
            prop_assert_eq!(f32::decode(&v.encode().unwrap()), Some(v));
        }
    }
}
