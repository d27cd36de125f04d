//! Single-key JSON envelopes.
//!
//! The API wraps resources under a named key on the way in
//! (`{"tracking": {...}}`) and wraps every response as
//! `{"meta": {...}, "data": {...}}`, with the resource again under its key
//! inside `data`.

use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Reasons a response body could not be unwrapped.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The body is not valid JSON.
    #[error("response body is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The expected key was absent from the payload.
    #[error("response is missing the '{key}' key")]
    MissingKey {
        /// The key that was expected.
        key: String,
    },

    /// The payload did not match the expected type.
    #[error("response payload does not match the expected shape: {0}")]
    Mismatch(#[source] serde_json::Error),
}

/// A payload wrapped under a single named key.
///
/// # Example
///
/// ```rust
/// use aftership_api::rest::Envelope;
/// use serde_json::json;
///
/// let body = serde_json::to_value(Envelope::new("tracking", &json!({"slug": "dhl"}))).unwrap();
/// assert_eq!(body, json!({"tracking": {"slug": "dhl"}}));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Envelope<'a, T> {
    key: &'a str,
    payload: &'a T,
}

impl<'a, T: Serialize> Envelope<'a, T> {
    /// Wraps `payload` under `key`.
    #[must_use]
    pub const fn new(key: &'a str, payload: &'a T) -> Self {
        Self { key, payload }
    }

    /// Serializes the envelope into a JSON value ready to send.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the payload cannot be serialized.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl<T: Serialize> Serialize for Envelope<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.key, self.payload)?;
        map.end()
    }
}

/// Unwraps a response body into `T`.
///
/// When the body carries a `meta` object, its `data` member is taken as the
/// payload; otherwise the whole body is. With `key`, the payload member
/// under that key is decoded, and its absence is an error.
///
/// An empty body decodes as JSON `null`.
///
/// # Errors
///
/// Returns [`EnvelopeError`] describing why the body could not be decoded.
pub fn decode<T: DeserializeOwned>(body: &str, key: Option<&str>) -> Result<T, EnvelopeError> {
    let value = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str::<Value>(body).map_err(EnvelopeError::Malformed)?
    };

    let payload = match value {
        Value::Object(mut map) if map.contains_key("meta") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };

    let payload = match key {
        Some(key) => match payload {
            Value::Object(mut map) => map.remove(key),
            _ => None,
        }
        .ok_or_else(|| EnvelopeError::MissingKey {
            key: key.to_string(),
        })?,
        None => payload,
    };

    serde_json::from_value(payload).map_err(EnvelopeError::Mismatch)
}
