//! HTTP response types for the AfterShip API SDK.
//!
//! This module provides the [`HttpResponse`] type and the [`RateLimit`]
//! snapshot parsed from response headers.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

/// Header carrying the request quota for the current window.
pub const HEADER_RATE_LIMIT_LIMIT: &str = "as-ratelimit-limit";
/// Header carrying the requests left in the current window.
pub const HEADER_RATE_LIMIT_REMAINING: &str = "as-ratelimit-remaining";
/// Header carrying the unix time (seconds) at which the window resets.
pub const HEADER_RATE_LIMIT_RESET: &str = "as-ratelimit-reset";
/// Standard HTTP header used as a fallback when no reset time is sent.
pub const HEADER_RETRY_AFTER: &str = "retry-after";

/// Rate limit information parsed from the `as-ratelimit-*` headers.
///
/// Every field is optional: a response that omits a header leaves the
/// corresponding field unset rather than failing the call.
///
/// # Example
///
/// ```rust
/// use aftership_api::clients::RateLimit;
/// use std::collections::HashMap;
///
/// let mut headers = HashMap::new();
/// headers.insert("as-ratelimit-limit".to_string(), vec!["10".to_string()]);
/// headers.insert("as-ratelimit-remaining".to_string(), vec!["0".to_string()]);
/// headers.insert("as-ratelimit-reset".to_string(), vec!["1700000000".to_string()]);
///
/// let rate_limit = RateLimit::from_headers(&headers);
/// assert_eq!(rate_limit.limit, Some(10));
/// assert_eq!(rate_limit.remaining, Some(0));
/// assert_eq!(rate_limit.reset_at.unwrap().timestamp(), 1_700_000_000);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RateLimit {
    /// The request quota for the current window.
    pub limit: Option<u32>,
    /// The requests left in the current window.
    pub remaining: Option<u32>,
    /// When the window resets.
    pub reset_at: Option<DateTime<Utc>>,
}

impl RateLimit {
    /// Parses rate limit information from lowercase response headers.
    ///
    /// When `as-ratelimit-reset` is absent, a `Retry-After` value in seconds
    /// is converted into an absolute reset time.
    #[must_use]
    pub fn from_headers(headers: &HashMap<String, Vec<String>>) -> Self {
        Self::from_headers_at(headers, Utc::now())
    }

    fn from_headers_at(headers: &HashMap<String, Vec<String>>, now: DateTime<Utc>) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|values| values.first())
                .map(|value| value.trim())
        };

        let reset_at = header(HEADER_RATE_LIMIT_RESET)
            .and_then(|value| value.parse::<i64>().ok())
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .or_else(|| {
                let secs = header(HEADER_RETRY_AFTER)?.parse::<u32>().ok()?;
                Some(now + chrono::Duration::seconds(i64::from(secs)))
            });

        Self {
            limit: header(HEADER_RATE_LIMIT_LIMIT).and_then(|v| v.parse().ok()),
            remaining: header(HEADER_RATE_LIMIT_REMAINING).and_then(|v| v.parse().ok()),
            reset_at,
        }
    }

    /// Returns how long to wait from `now` until the window resets.
    ///
    /// A reset time in the past yields [`Duration::ZERO`]. Returns `None`
    /// when the reset time is unknown.
    #[must_use]
    pub fn wait_until_reset(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.reset_at
            .map(|reset_at| (reset_at - now).to_std().unwrap_or(Duration::ZERO))
    }
}

/// An HTTP response from the AfterShip API.
///
/// The body is kept as raw text so error classification and envelope
/// decoding can both report it verbatim.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// HTTP status code.
    pub code: u16,
    /// Response headers (lowercase keys, multi-value support).
    pub headers: HashMap<String, Vec<String>>,
    /// Raw response body.
    pub body: String,
    /// Rate limit snapshot parsed from the headers.
    pub rate_limit: RateLimit,
    /// How many attempts were made to obtain this response.
    pub attempts: u32,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, parsing rate limit headers.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: String) -> Self {
        let rate_limit = RateLimit::from_headers(&headers);
        Self {
            code,
            headers,
            body,
            rate_limit,
            attempts: 1,
        }
    }

    /// Returns `true` if the response has a 2xx status code.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }
}
