//! Error taxonomy for AfterShip API calls.
//!
//! Every call made through the SDK fails with exactly one [`HttpError`]
//! variant. The variants form a closed set:
//!
//! - [`HttpError::MissingIdentifier`]: a path could not be built; no request was sent
//! - [`HttpError::Validation`]: 4xx other than 401/403/404/429
//! - [`HttpError::Authentication`]: 401 or 403, never retried
//! - [`HttpError::NotFound`]: 404
//! - [`HttpError::RateLimited`]: 429, carries the [`RateLimit`] snapshot
//! - [`HttpError::Server`]: 5xx, not retried by the SDK
//! - [`HttpError::Api`]: a non-2xx response whose body is not an API error document
//! - [`HttpError::Decode`]: a 2xx response that does not match the expected shape
//! - [`HttpError::Transport`]: network failure, cancellation, or deadline
//!
//! # Example
//!
//! ```rust,ignore
//! use aftership_api::clients::HttpError;
//!
//! match Tracking::find(&client, &ctx, &id, None).await {
//!     Ok(tracking) => println!("{}", tracking.tag),
//!     Err(HttpError::NotFound(e)) => println!("no such tracking: {}", e.message),
//!     Err(HttpError::RateLimited(e)) => println!("retry after {:?}", e.rate_limit.reset_at),
//!     Err(e) => println!("failed: {e}"),
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clients::http_response::RateLimit;
use crate::rest::EnvelopeError;

/// A resource reference was missing a required field.
///
/// Raised before any network call is made.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MissingIdentifierError {
    /// The opaque tracking ID was empty.
    #[error("tracking id is empty and must be provided")]
    TrackingId,

    /// Either the courier slug or the tracking number was empty.
    #[error("slug or tracking number is empty, both of them must be provided")]
    SlugOrTrackingNumber,

    /// A tracking was created without a tracking number.
    #[error("tracking number is empty and must be provided")]
    TrackingNumber,
}

/// An error document returned by the API.
///
/// `code` is the API's own error code (e.g. `4004`), distinct from the HTTP
/// status, which is kept in `http_status_code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message} (code {code}, HTTP {http_status_code})")]
pub struct ApiError {
    /// The API error code.
    pub code: i64,
    /// The API error type (e.g. `NotFound`, `BadRequest`).
    #[serde(rename = "type")]
    pub error_type: String,
    /// Human-readable message supplied by the API.
    pub message: String,
    /// The request path the API reported, if any.
    pub path: String,
    /// The HTTP status code of the response.
    pub http_status_code: u16,
}

impl ApiError {
    /// Builds an error document for a response that carried none.
    fn from_status(status: u16, message: &str) -> Self {
        Self {
            code: i64::from(status),
            error_type: String::new(),
            message: message.to_string(),
            path: String::new(),
            http_status_code: status,
        }
    }
}

/// The API rejected the call because the rate limit was exhausted (HTTP 429).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rate limit is exceeded ({rate_limit}): {error}")]
pub struct RateLimitedError {
    /// The error document from the response.
    pub error: ApiError,
    /// The rate limit snapshot taken from the same response.
    pub rate_limit: RateLimit,
}

/// The API failed with a 5xx status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("server error: {error}")]
pub struct ServerError {
    /// The error document from the response.
    pub error: ApiError,
    /// The raw response body.
    pub raw_body: String,
}

/// A non-2xx response whose body is not a recognizable API error document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("HTTP {status}: {raw_body}")]
pub struct RawApiError {
    /// The HTTP status code of the response.
    pub status: u16,
    /// The raw response body.
    pub raw_body: String,
}

/// A successful response body did not match the expected shape.
///
/// This indicates a contract mismatch between client and server rather than
/// a business error.
#[derive(Debug, Error)]
#[error("failed to decode response (HTTP {status}): {source}")]
pub struct DecodeError {
    /// The HTTP status code of the response.
    pub status: u16,
    /// The raw response body.
    pub raw_body: String,
    /// What went wrong while unwrapping the body.
    #[source]
    pub source: EnvelopeError,
}

/// The request never produced an HTTP response.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The caller's cancellation token fired.
    #[error("request was cancelled")]
    Cancelled,

    /// The caller's deadline passed before the response arrived.
    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

/// A request descriptor failed validation before it was sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The request path is not absolute.
    #[error("Invalid request path '{path}'. Paths must start with '/'.")]
    InvalidPath {
        /// The path that was provided.
        path: String,
    },

    /// A body was attached to a method that does not carry one.
    #[error("Cannot send a body with {method}.")]
    UnexpectedBody {
        /// The HTTP method of the request.
        method: String,
    },
}

/// Unified error type for every AfterShip API call.
#[derive(Debug, Error)]
pub enum HttpError {
    /// A resource reference was missing a required field.
    #[error(transparent)]
    MissingIdentifier(#[from] MissingIdentifierError),

    /// The request was malformed or referenced an invalid resource (4xx).
    #[error("validation error: {0}")]
    Validation(ApiError),

    /// The API key was rejected (401/403).
    #[error("authentication error: {0}")]
    Authentication(ApiError),

    /// The identifier did not resolve to any tracking (404).
    #[error("not found: {0}")]
    NotFound(ApiError),

    /// The rate limit was exhausted (429).
    #[error(transparent)]
    RateLimited(#[from] RateLimitedError),

    /// The API failed upstream (5xx).
    #[error(transparent)]
    Server(#[from] ServerError),

    /// A non-2xx response without a parseable error document.
    #[error(transparent)]
    Api(#[from] RawApiError),

    /// A successful response could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request body could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    /// The request descriptor was invalid.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),
}

impl HttpError {
    /// Classifies a non-2xx response.
    ///
    /// The error document is read from the `meta` object of the response
    /// wrapper, or from the top level of the body. A 429 is always
    /// [`HttpError::RateLimited`], even without a readable body, because its
    /// retry metadata travels in headers. Any other status whose body is not an
    /// error document degrades to [`HttpError::Api`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use aftership_api::clients::{HttpError, RateLimit};
    ///
    /// let error = HttpError::from_response(
    ///     404,
    ///     r#"{"code":4004,"message":"not found"}"#,
    ///     RateLimit::default(),
    /// );
    /// assert!(matches!(error, HttpError::NotFound(ref e) if e.code == 4004));
    /// ```
    #[must_use]
    pub fn from_response(status: u16, body: &str, rate_limit: RateLimit) -> Self {
        let parsed = parse_error_document(body, status);

        if status == 429 {
            let error = parsed
                .unwrap_or_else(|| ApiError::from_status(status, "rate limit is exceeded"));
            return Self::RateLimited(RateLimitedError { error, rate_limit });
        }

        let Some(error) = parsed else {
            return Self::Api(RawApiError {
                status,
                raw_body: body.to_string(),
            });
        };

        match status {
            401 | 403 => Self::Authentication(error),
            404 => Self::NotFound(error),
            400..=499 => Self::Validation(error),
            500..=599 => Self::Server(ServerError {
                error,
                raw_body: body.to_string(),
            }),
            _ => Self::Api(RawApiError {
                status,
                raw_body: body.to_string(),
            }),
        }
    }

    /// Returns the HTTP status code behind this error, if a response was received.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Validation(e) | Self::Authentication(e) | Self::NotFound(e) => {
                Some(e.http_status_code)
            }
            Self::RateLimited(e) => Some(e.error.http_status_code),
            Self::Server(e) => Some(e.error.http_status_code),
            Self::Api(e) => Some(e.status),
            Self::Decode(e) => Some(e.status),
            Self::MissingIdentifier(_)
            | Self::Transport(_)
            | Self::Encode(_)
            | Self::InvalidRequest(_) => None,
        }
    }

    /// Returns the API error document, if the response carried one.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Validation(e) | Self::Authentication(e) | Self::NotFound(e) => Some(e),
            Self::RateLimited(e) => Some(&e.error),
            Self::Server(e) => Some(&e.error),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorFields {
    code: i64,
    // Absent and `null` both read as empty.
    #[serde(default, rename = "type")]
    error_type: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    path: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorDocument {
    Wrapped { meta: ErrorFields },
    Flat(ErrorFields),
}

/// Parses `{code, type, message, path}` from either `meta` or the top level.
fn parse_error_document(body: &str, status: u16) -> Option<ApiError> {
    let fields = match serde_json::from_str::<ErrorDocument>(body).ok()? {
        ErrorDocument::Wrapped { meta } => meta,
        ErrorDocument::Flat(fields) => fields,
    };

    Some(ApiError {
        code: fields.code,
        error_type: fields.error_type.unwrap_or_default(),
        message: fields.message.unwrap_or_default(),
        path: fields.path.unwrap_or_default(),
        http_status_code: status,
    })
}

impl fmt::Display for RateLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let limit = self.limit.map_or_else(|| "?".to_string(), |l| l.to_string());
        let remaining = self
            .remaining
            .map_or_else(|| "?".to_string(), |r| r.to_string());
        match self.reset_at {
            Some(reset_at) => write!(
                f,
                "{remaining}/{limit} remaining, please wait until {}",
                reset_at.to_rfc3339()
            ),
            None => write!(f, "{remaining}/{limit} remaining"),
        }
    }
}

// Verify HttpError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpError>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_flat_404_maps_to_not_found_with_code() {
        let error = HttpError::from_response(
            404,
            r#"{"code":4004,"message":"not found"}"#,
            RateLimit::default(),
        );

        match error {
            HttpError::NotFound(e) => {
                assert_eq!(e.code, 4004);
                assert_eq!(e.message, "not found");
                assert_eq!(e.http_status_code, 404);
            }
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_meta_wrapped_error_document_is_read() {
        let body = r#"{"meta":{"code":4003,"type":"BadRequest","message":"Tracking already exists."},"data":{}}"#;
        let error = HttpError::from_response(400, body, RateLimit::default());

        match error {
            HttpError::Validation(e) => {
                assert_eq!(e.code, 4003);
                assert_eq!(e.error_type, "BadRequest");
                assert_eq!(e.message, "Tracking already exists.");
            }
            other => panic!("Expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_401_and_403_map_to_authentication() {
        for status in [401, 403] {
            let error = HttpError::from_response(
                status,
                r#"{"code":401,"message":"Invalid API key."}"#,
                RateLimit::default(),
            );
            assert!(matches!(error, HttpError::Authentication(_)));
            assert_eq!(error.status_code(), Some(status));
        }
    }

    #[test]
    fn test_429_carries_rate_limit_even_without_body() {
        let rate_limit = RateLimit {
            limit: Some(10),
            remaining: Some(0),
            reset_at: Some(Utc.timestamp_opt(1_700_000_000, 0).unwrap()),
        };
        let error = HttpError::from_response(429, "", rate_limit);

        match error {
            HttpError::RateLimited(e) => {
                assert_eq!(e.rate_limit, rate_limit);
                assert_eq!(e.error.http_status_code, 429);
            }
            other => panic!("Expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn test_5xx_with_document_is_server_error_with_raw_body() {
        let body = r#"{"meta":{"code":500,"type":"InternalError","message":"boom"}}"#;
        let error = HttpError::from_response(503, body, RateLimit::default());

        match error {
            HttpError::Server(e) => {
                assert_eq!(e.error.http_status_code, 503);
                assert_eq!(e.raw_body, body);
            }
            other => panic!("Expected Server, got {other:?}"),
        }
    }

    #[test]
    fn test_unparseable_body_degrades_to_raw_api_error() {
        let error = HttpError::from_response(502, "<html>Bad Gateway</html>", RateLimit::default());

        match error {
            HttpError::Api(e) => {
                assert_eq!(e.status, 502);
                assert_eq!(e.raw_body, "<html>Bad Gateway</html>");
            }
            other => panic!("Expected Api, got {other:?}"),
        }
    }

    #[test]
    fn test_null_error_fields_read_as_empty() {
        let body = r#"{"meta":{"code":4004,"type":null,"message":"Tracking does not exist.","path":null},"data":{}}"#;
        let error = HttpError::from_response(404, body, RateLimit::default());

        match error {
            HttpError::NotFound(e) => {
                assert_eq!(e.code, 4004);
                assert_eq!(e.error_type, "");
                assert_eq!(e.message, "Tracking does not exist.");
                assert_eq!(e.path, "");
            }
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_null_message_in_flat_document() {
        let error = HttpError::from_response(
            400,
            r#"{"code":4003,"message":null}"#,
            RateLimit::default(),
        );
        assert!(matches!(error, HttpError::Validation(ref e) if e.code == 4003 && e.message.is_empty()));
    }

    #[test]
    fn test_body_without_code_is_not_an_error_document() {
        let error = HttpError::from_response(404, r#"{"message":"nope"}"#, RateLimit::default());
        assert!(matches!(error, HttpError::Api(_)));
        assert!(error.api_error().is_none());
    }

    #[test]
    fn test_missing_identifier_messages() {
        assert!(MissingIdentifierError::TrackingId
            .to_string()
            .contains("tracking id is empty"));
        assert!(MissingIdentifierError::SlugOrTrackingNumber
            .to_string()
            .contains("both of them must be provided"));

        let error: HttpError = MissingIdentifierError::TrackingNumber.into();
        assert!(error.status_code().is_none());
    }

    #[test]
    fn test_rate_limited_display_mentions_reset() {
        let error = RateLimitedError {
            error: ApiError::from_status(429, "Too many requests"),
            rate_limit: RateLimit {
                limit: Some(10),
                remaining: Some(0),
                reset_at: Some(Utc.timestamp_opt(0, 0).unwrap()),
            },
        };
        let message = error.to_string();
        assert!(message.contains("rate limit is exceeded"));
        assert!(message.contains("0/10 remaining"));
        assert!(message.contains("1970-01-01"));
    }

    #[test]
    fn test_api_error_serializes_type_field() {
        let error = ApiError::from_status(400, "bad");
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["type"], "");
        assert_eq!(json["http_status_code"], 400);
    }

    #[test]
    fn test_all_error_variants_implement_std_error() {
        let _: &dyn std::error::Error = &HttpError::Transport(TransportError::Cancelled);
        let _: &dyn std::error::Error = &HttpError::InvalidRequest(
            InvalidHttpRequestError::InvalidPath {
                path: "trackings".to_string(),
            },
        );
    }
}
