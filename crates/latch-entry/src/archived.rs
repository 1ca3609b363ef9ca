//! Storage for arbitrary serde object graphs as opaque bytes.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{trace, warn};

use latch_types::RawValue;

use crate::storable::Storable;

/// Wrapper that stores any serde type as JSON bytes in [`RawValue::Data`].
///
/// The store sees an opaque blob; only this wrapper knows how to read it.
/// A list of archived values is archived as one JSON array rather than a
/// list of blobs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Archived<T>(pub T);

impl<T> Archived<T> {
    /// Unwrap the archived value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Archived<T> {
    fn from(value: T) -> Self {
        Archived(value)
    }
}

impl<T> Storable for Archived<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    fn decode(raw: &RawValue) -> Option<Self> {
        match serde_json::from_slice(raw.as_data()?) {
            Ok(value) => Some(Archived(value)),
            Err(e) => {
                trace!(error = %e, "archived value did not deserialize");
                None
            }
        }
    }

    fn encode(&self) -> Option<RawValue> {
        match serde_json::to_vec(&self.0) {
            Ok(bytes) => Some(RawValue::Data(bytes)),
            Err(e) => {
                warn!(error = %e, "value could not be archived");
                None
            }
        }
    }

    fn decode_list(raw: &RawValue) -> Option<Vec<Self>> {
        match serde_json::from_slice::<Vec<T>>(raw.as_data()?) {
            Ok(values) => Some(values.into_iter().map(Archived).collect()),
            Err(e) => {
                trace!(error = %e, "archived list did not deserialize");
                None
            }
        }
    }

    fn encode_list(values: &[Self]) -> Option<RawValue> {
        let inner: Vec<&T> = values.iter().map(|v| &v.0).collect();
        match serde_json::to_vec(&inner) {
            Ok(bytes) => Some(RawValue::Data(bytes)),
            Err(e) => {
                warn!(error = %e, "list could not be archived");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde::Deserialize;

    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Window {
        title: String,
        width: u32,
        pinned: bool,
    }

    fn window(title: &str) -> Archived<Window> {
        Archived(Window {
            title: title.into(),
            width: 640,
            pinned: false,
        })
    }

    #[test]
    fn archives_to_opaque_data() {
        let raw = window("main").encode().unwrap();
        assert!(raw.as_data().is_some());
        assert_eq!(Archived::<Window>::decode(&raw), Some(window("main")));
    }

    #[test]
    fn list_is_one_blob() {
        let raw = Archived::encode_list(&[window("a"), window("b")]).unwrap();
        let bytes = raw.as_data().unwrap();
        assert!(bytes.starts_with(b"["));
        assert_eq!(
            Archived::<Window>::decode_list(&raw),
            Some(vec![window("a"), window("b")])
        );
    }

    #[test]
    fn foreign_bytes_are_absent() {
        assert_eq!(Archived::<Window>::decode(&RawValue::Data(b"garbage".to_vec())), None);
        assert_eq!(Archived::<Window>::decode(&RawValue::String("{}".into())), None);
    }

    #[test]
    fn unserializable_map_keys_fail_to_encode() {
        let mut bad: HashMap<(u8, u8), u8> = HashMap::new();
        bad.insert((1, 2), 3);
        assert_eq!(Archived(bad).encode(), None);
    }
}
