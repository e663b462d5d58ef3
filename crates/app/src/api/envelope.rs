//! Response envelope unwrapping.
//!
//! The storefront API is not consistent about how it wraps payloads: some
//! endpoints answer `{ "data": ... }`, some `{ "data": { "data": ... } }`,
//! paginated collections use `{ "data": { "content": [...] } }`, and a few
//! return the payload bare. Every response goes through this one
//! deserialization step, with the fallback order fixed as
//! `data` -> `data.data` -> `data.content` -> the payload itself.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::errors::ApiError;

/// Strip the response envelope from a payload.
#[must_use]
pub fn unwrap_envelope(payload: Value) -> Value {
    let Value::Object(mut body) = payload else {
        return payload;
    };

    match body.remove("data") {
        Some(Value::Object(mut inner)) => {
            if let Some(nested) = inner.remove("data") {
                nested
            } else if let Some(content) = inner.remove("content") {
                content
            } else {
                Value::Object(inner)
            }
        }
        Some(inner) => inner,
        None => Value::Object(body),
    }
}

/// Unwrap the envelope and decode the payload into `T`.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] when the unwrapped payload does not match.
pub fn decode<T: DeserializeOwned>(payload: Value) -> Result<T, ApiError> {
    serde_json::from_value(unwrap_envelope(payload)).map_err(ApiError::Decode)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn data_wrapper_is_stripped() {
        let unwrapped = unwrap_envelope(json!({ "data": { "id": 7 } }));

        assert_eq!(unwrapped, json!({ "id": 7 }));
    }

    #[test]
    fn double_data_wrapper_is_stripped() {
        let unwrapped = unwrap_envelope(json!({ "data": { "data": [1, 2, 3] } }));

        assert_eq!(unwrapped, json!([1, 2, 3]));
    }

    #[test]
    fn paginated_content_is_unwrapped() {
        let unwrapped = unwrap_envelope(json!({
            "data": { "content": [{ "id": 1 }], "page": 0, "total_pages": 4 },
        }));

        assert_eq!(unwrapped, json!([{ "id": 1 }]));
    }

    #[test]
    fn bare_payloads_pass_through() {
        assert_eq!(unwrap_envelope(json!([1, 2])), json!([1, 2]));
        assert_eq!(unwrap_envelope(json!({ "id": 9 })), json!({ "id": 9 }));
        assert_eq!(unwrap_envelope(json!(null)), json!(null));
    }

    #[test]
    fn decode_applies_the_same_fallback_order() -> TestResult {
        let ids: Vec<i64> = decode(json!({ "data": { "data": [4, 5] } }))?;

        assert_eq!(ids, vec![4, 5]);

        Ok(())
    }

    #[test]
    fn decode_mismatch_is_a_decode_error() {
        let result: Result<Vec<i64>, _> = decode(json!({ "data": "not-a-list" }));

        assert!(matches!(result, Err(ApiError::Decode(_))));
    }
}
