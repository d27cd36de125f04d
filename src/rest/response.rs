//! Response wrapper for typed API calls.
//!
//! [`ResourceResponse<T>`] pairs a decoded payload with metadata from the
//! final HTTP response: the rate limit snapshot, status, and how many
//! attempts the call took. It implements `Deref<Target = T>`, so it can be
//! used like the payload directly:
//!
//! ```rust,ignore
//! let tracking = Tracking::find(&client, &ctx, &id, None).await?;
//!
//! println!("{}", tracking.tag);
//! if tracking.rate_limit().remaining == Some(0) {
//!     println!("next call will be rate limited");
//! }
//!
//! let tracking: Tracking = tracking.into_inner();
//! ```

use std::ops::Deref;

use serde::de::DeserializeOwned;

use crate::clients::{DecodeError, HttpError, HttpResponse, RateLimit};
use crate::rest::envelope;

/// A decoded payload together with response metadata.
#[derive(Debug, Clone)]
pub struct ResourceResponse<T> {
    data: T,
    status: u16,
    rate_limit: RateLimit,
    attempts: u32,
}

impl<T> ResourceResponse<T> {
    /// Creates a new `ResourceResponse`.
    #[must_use]
    pub const fn new(data: T, status: u16, rate_limit: RateLimit, attempts: u32) -> Self {
        Self {
            data,
            status,
            rate_limit,
            attempts,
        }
    }

    /// Consumes the response and returns the payload.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.data
    }

    /// Returns the HTTP status of the final response.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Returns the rate limit snapshot of the final response.
    #[must_use]
    pub const fn rate_limit(&self) -> &RateLimit {
        &self.rate_limit
    }

    /// Returns how many requests were sent for this call (1 or 2).
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }
}

impl<T: DeserializeOwned> ResourceResponse<T> {
    /// Decodes a successful HTTP response, unwrapping the payload under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Decode`] if the body does not have the expected shape.
    pub fn from_http_response(response: HttpResponse, key: Option<&str>) -> Result<Self, HttpError> {
        let data = envelope::decode(&response.body, key).map_err(|source| DecodeError {
            status: response.code,
            raw_body: response.body.clone(),
            source,
        })?;

        Ok(Self::new(
            data,
            response.code,
            response.rate_limit,
            response.attempts,
        ))
    }
}

impl<T> Deref for ResourceResponse<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: String,
    }

    fn response(code: u16, body: &str) -> HttpResponse {
        let mut headers = HashMap::new();
        headers.insert("as-ratelimit-remaining".to_string(), vec!["9".to_string()]);
        HttpResponse::new(code, headers, body.to_string())
    }

    #[test]
    fn test_from_http_response_decodes_and_keeps_metadata() {
        let mut http = response(201, r#"{"meta":{"code":201},"data":{"tracking":{"id":"abc"}}}"#);
        http.attempts = 2;

        let result: ResourceResponse<Item> =
            ResourceResponse::from_http_response(http, Some("tracking")).unwrap();

        assert_eq!(result.id, "abc");
        assert_eq!(result.status(), 201);
        assert_eq!(result.attempts(), 2);
        assert_eq!(result.rate_limit().remaining, Some(9));
    }

    #[test]
    fn test_decode_failure_carries_status_and_body() {
        let http = response(200, "<html></html>");
        let result: Result<ResourceResponse<Item>, _> =
            ResourceResponse::from_http_response(http, Some("tracking"));

        match result {
            Err(HttpError::Decode(e)) => {
                assert_eq!(e.status, 200);
                assert_eq!(e.raw_body, "<html></html>");
            }
            other => panic!("Expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn test_deref_and_into_inner() {
        let response = ResourceResponse::new(vec![1, 2, 3], 200, RateLimit::default(), 1);

        assert_eq!(response.len(), 3);
        assert_eq!(response.attempts(), 1);
        assert_eq!(response.into_inner(), vec![1, 2, 3]);
    }
}
