use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A value in the shape a backing store holds natively.
///
/// Stores are schema-less: a key maps to one `RawValue` and nothing records
/// which Rust type wrote it. Typed access is layered on top by decoding and
/// encoding through these variants, and a decoder that meets a variant it
/// does not expect treats the key as absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RawValue {
    /// Boolean flag.
    Bool(bool),
    /// Signed 64-bit integer. Narrower integer types are widened into this.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Opaque bytes (archived objects, binary blobs).
    Data(Vec<u8>),
    /// Point in time, always UTC.
    Date(DateTime<Utc>),
    /// Ordered sequence stored atomically under one key.
    List(Vec<RawValue>),
    /// String-keyed dictionary.
    Map(BTreeMap<String, RawValue>),
}

/// Discriminant of a [`RawValue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    String,
    Data,
    Date,
    List,
    Map,
}

impl ValueKind {
    /// Lowercase name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Data => "data",
            ValueKind::Date => "date",
            ValueKind::List => "list",
            ValueKind::Map => "map",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RawValue {
    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            RawValue::Bool(_) => ValueKind::Bool,
            RawValue::Int(_) => ValueKind::Int,
            RawValue::Float(_) => ValueKind::Float,
            RawValue::String(_) => ValueKind::String,
            RawValue::Data(_) => ValueKind::Data,
            RawValue::Date(_) => ValueKind::Date,
            RawValue::List(_) => ValueKind::List,
            RawValue::Map(_) => ValueKind::Map,
        }
    }

    /// Returns the boolean if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RawValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RawValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the float if this is a `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            RawValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string slice if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::String(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the bytes if this is `Data`.
    pub fn as_data(&self) -> Option<&[u8]> {
        match self {
            RawValue::Data(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the timestamp if this is a `Date`.
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            RawValue::Date(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the elements if this is a `List`.
    pub fn as_list(&self) -> Option<&[RawValue]> {
        match self {
            RawValue::List(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the entries if this is a `Map`.
    pub fn as_map(&self) -> Option<&BTreeMap<String, RawValue>> {
        match self {
            RawValue::Map(v) => Some(v),
            _ => None,
        }
    }

    /// Serialize to the tagged JSON representation.
    pub fn to_json(&self) -> Result<String, TypeError> {
        serde_json::to_string(self).map_err(|e| TypeError::Serialization(e.to_string()))
    }

    /// Parse from the tagged JSON representation produced by [`to_json`](Self::to_json).
    pub fn from_json(s: &str) -> Result<Self, TypeError> {
        serde_json::from_str(s).map_err(|e| TypeError::Serialization(e.to_string()))
    }
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        RawValue::Bool(v)
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Float(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::String(v.to_string())
    }
}

impl From<String> for RawValue {
    fn from(v: String) -> Self {
        RawValue::String(v)
    }
}

impl From<Vec<RawValue>> for RawValue {
    fn from(v: Vec<RawValue>) -> Self {
        RawValue::List(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn accessors_match_only_their_variant() {
        let v = RawValue::Int(7);
        assert_eq!(v.as_int(), Some(7));
        assert_eq!(v.as_bool(), None);
        assert_eq!(v.as_str(), None);
        assert_eq!(v.as_float(), None);
        assert!(v.as_list().is_none());
    }

    #[test]
    fn kind_names() {
        assert_eq!(RawValue::from("x").kind(), ValueKind::String);
        assert_eq!(RawValue::List(vec![]).kind().to_string(), "list");
        assert_eq!(RawValue::Map(BTreeMap::new()).kind().as_str(), "map");
    }

    #[test]
    fn json_representation_is_tagged() {
        let json = RawValue::Int(5).to_json().unwrap();
        assert_eq!(json, r#"{"kind":"int","value":5}"#);
    }

    #[test]
    fn nested_values_survive_json() {
        let mut map = BTreeMap::new();
        map.insert("tags".to_string(), RawValue::List(vec!["a".into(), "b".into()]));
        map.insert(
            "seen".to_string(),
            RawValue::Date(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
        );
        map.insert("blob".to_string(), RawValue::Data(vec![0, 1, 255]));
        let value = RawValue::Map(map);

        let back = RawValue::from_json(&value.to_json().unwrap()).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = RawValue::from_json("{\"kind\":\"nope\"}").unwrap_err();
        assert!(matches!(err, TypeError::Serialization(_)));
    }

    proptest! {
        #[test]
        fn string_lists_survive_json(items in proptest::collection::vec(".*", 0..8)) {
            let value = RawValue::List(items.into_iter().map(RawValue::from).collect());
            let back = RawValue::from_json(&value.to_json().unwrap()).unwrap();
            prop_assert_eq!(back, value);
        }
    }
}
