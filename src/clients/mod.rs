//! HTTP client types for AfterShip API communication.
//!
//! This module provides the request dispatch layer: it authenticates
//! requests, classifies failures, and applies the rate-limit retry policy.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: The async HTTP client for API communication
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A response from the API, with its [`RateLimit`] snapshot
//! - [`RequestContext`]: Per-call cancellation and deadline
//! - [`HttpError`]: The error taxonomy for every call
//! - [`rest::RestClient`]: Typed client that decodes enveloped payloads
//!
//! # Retry Behavior
//!
//! - **429 (Rate Limited)**: retried once, after waiting until the
//!   `as-ratelimit-reset` time (or 1 second if unknown). The wait is skipped
//!   if the context is cancelled or its deadline would pass first.
//! - **Everything else**: returned immediately.
//!
//! Disable the retry with
//! [`AfterShipConfigBuilder::rate_limit_retry`](crate::config::AfterShipConfigBuilder::rate_limit_retry).

mod context;
mod errors;
mod http_client;
mod http_request;
mod http_response;
pub mod rest;
mod retry;

pub use context::RequestContext;
pub use errors::{
    ApiError, DecodeError, HttpError, InvalidHttpRequestError, MissingIdentifierError,
    RateLimitedError, RawApiError, ServerError, TransportError,
};
pub use http_client::{HttpClient, HEADER_API_KEY, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{
    HttpResponse, RateLimit, HEADER_RATE_LIMIT_LIMIT, HEADER_RATE_LIMIT_REMAINING,
    HEADER_RATE_LIMIT_RESET, HEADER_RETRY_AFTER,
};
pub use retry::{RateLimitRetry, RetryDecision, RetryState, DEFAULT_RATE_LIMIT_WAIT};

pub use rest::RestClient;
