//! Response envelope normalization.
//!
//! The backend is inconsistent about wrapping payloads: some endpoints
//! return `{ "data": T, ... }`, others return `T` bare. Both shapes are
//! normalized here, once, at the dispatcher boundary - façades never
//! re-check.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

/// Decode a 2xx body into `T`, unwrapping a `data` envelope when present.
pub(crate) fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, ApiError> {
    let envelope: Envelope<T> = serde_json::from_value(value)?;
    Ok(envelope.into_inner())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq, Eq, serde::Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn unwraps_data_envelope() {
        let value = json!({ "success": true, "data": { "name": "tee" } });
        let named: Named = decode(value).unwrap();
        assert_eq!(named.name, "tee");
    }

    #[test]
    fn passes_bare_payloads_through() {
        let value = json!({ "name": "tee" });
        let named: Named = decode(value).unwrap();
        assert_eq!(named.name, "tee");

        let list: Vec<Named> = decode(json!([{ "name": "tee" }])).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn shape_mismatch_is_malformed() {
        let err = decode::<Named>(json!({ "nope": 1 })).unwrap_err();
        assert!(matches!(err, ApiError::Malformed(_)));
    }
}
