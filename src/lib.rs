//! # AfterShip API Rust SDK
//!
//! A Rust SDK for the AfterShip Tracking API, providing type-safe
//! configuration, typed tracking resources, and an async HTTP client with
//! rate limit handling.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Type-safe configuration via [`AfterShipConfig`] and [`AfterShipConfigBuilder`]
//! - Validated newtypes for the API key and endpoint
//! - Tracking and notification operations via [`rest::resources`]
//! - Per-call cancellation and deadlines via [`RequestContext`]
//! - A single wait-and-retry when the API answers 429
//! - A classified error taxonomy via [`HttpError`]
//!
//! ## Quick Start
//!
//! ```rust
//! use aftership_api::{AfterShipConfig, ApiKey};
//!
//! let config = AfterShipConfig::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .user_agent_prefix("my-shop")
//!     .build()
//!     .unwrap();
//!
//! assert!(config.rate_limit_retry());
//! ```
//!
//! ## Making API Calls
//!
//! ```rust,ignore
//! use aftership_api::{AfterShipConfig, ApiKey, RequestContext, RestClient};
//! use aftership_api::rest::TrackingIdentifier;
//! use aftership_api::rest::resources::{CreateTrackingParams, Tracking};
//! use std::time::Duration;
//!
//! let client = RestClient::new(&config)?;
//! let ctx = RequestContext::new().with_timeout(Duration::from_secs(30));
//!
//! let params = CreateTrackingParams {
//!     tracking_number: "1234567890".to_string(),
//!     slug: Some("dhl".to_string()),
//!     ..Default::default()
//! };
//! let created = Tracking::create(&client, &ctx, &params).await?;
//!
//! let id = TrackingIdentifier::by_slug_and_number("dhl", "1234567890");
//! let tracking = Tracking::find(&client, &ctx, &id, None).await?;
//! println!("{:?}, {} remaining", tracking.tag, tracking.rate_limit());
//! ```
//!
//! ## Error Handling
//!
//! ```rust,ignore
//! use aftership_api::HttpError;
//!
//! match Tracking::find(&client, &ctx, &id, None).await {
//!     Ok(tracking) => println!("{:?}", tracking.tag),
//!     Err(HttpError::NotFound(e)) => println!("no such tracking: {}", e.message),
//!     Err(HttpError::RateLimited(e)) => println!("slow down until {:?}", e.rate_limit.reset_at),
//!     Err(e) => return Err(e.into()),
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration is passed explicitly
//! - **Fail-fast validation**: newtypes and identifiers validate before any request
//! - **Thread-safe**: all public types are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime

pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use config::{AfterShipConfig, AfterShipConfigBuilder, ApiKey, Endpoint};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    ApiError, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    InvalidHttpRequestError, MissingIdentifierError, RateLimit, RateLimitedError, RequestContext,
    RestClient, TransportError,
};

// Re-export resource layer types
pub use rest::{ResourceResponse, TrackingIdentifier};
