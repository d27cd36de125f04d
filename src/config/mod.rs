//! Configuration types for the AfterShip API SDK.
//!
//! This module provides the configuration used to build a
//! [`RestClient`](crate::clients::RestClient).
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`AfterShipConfig`]: The main configuration struct holding all SDK settings
//! - [`AfterShipConfigBuilder`]: A builder for constructing [`AfterShipConfig`] instances
//! - [`ApiKey`]: A validated API key newtype with masked debug output
//! - [`Endpoint`]: A validated API base URL
//!
//! # Example
//!
//! ```rust
//! use aftership_api::{AfterShipConfig, ApiKey};
//!
//! let config = AfterShipConfig::builder()
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

pub use newtypes::{ApiKey, Endpoint};

use std::time::Duration;

use crate::error::ConfigError;

/// Configuration for the AfterShip API SDK.
///
/// The configuration is immutable once built. The API key it carries is the
/// only credential the client ever sends.
///
/// # Thread Safety
///
/// `AfterShipConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
///
/// # Example
///
/// ```rust
/// use aftership_api::{AfterShipConfig, ApiKey, Endpoint};
/// use std::time::Duration;
///
/// let config = AfterShipConfig::builder()
///     .api_key(ApiKey::new("your-api-key").unwrap())
///     .endpoint(Endpoint::new("https://api.aftership.com/v4").unwrap())
///     .request_timeout(Duration::from_secs(10))
///     .build()
///     .unwrap();
///
/// assert!(config.rate_limit_retry());
/// ```
#[derive(Clone, Debug)]
pub struct AfterShipConfig {
    api_key: ApiKey,
    endpoint: Endpoint,
    user_agent_prefix: Option<String>,
    request_timeout: Option<Duration>,
    rate_limit_retry: bool,
    http_client: Option<reqwest::Client>,
}

impl AfterShipConfig {
    /// Creates a new builder for constructing an `AfterShipConfig`.
    #[must_use]
    pub fn builder() -> AfterShipConfigBuilder {
        AfterShipConfigBuilder::new()
    }

    /// Returns the API key.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the per-request timeout applied to the built transport.
    #[must_use]
    pub const fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    /// Returns whether a rate-limited call is retried once after the reset time.
    #[must_use]
    pub const fn rate_limit_retry(&self) -> bool {
        self.rate_limit_retry
    }

    /// Returns the caller-supplied transport, if any.
    #[must_use]
    pub const fn http_client(&self) -> Option<&reqwest::Client> {
        self.http_client.as_ref()
    }
}

// Verify AfterShipConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AfterShipConfig>();
};

/// Builder for constructing [`AfterShipConfig`] instances.
///
/// `api_key` is required. All other fields have sensible defaults.
///
/// # Defaults
///
/// - `endpoint`: `https://api.aftership.com/v4`
/// - `rate_limit_retry`: `true`
/// - `request_timeout`: `None` (no transport-level timeout)
/// - `user_agent_prefix`: `None`
/// - `http_client`: `None` (a rustls-backed client is built)
#[derive(Debug, Default)]
pub struct AfterShipConfigBuilder {
    api_key: Option<ApiKey>,
    endpoint: Option<Endpoint>,
    user_agent_prefix: Option<String>,
    request_timeout: Option<Duration>,
    rate_limit_retry: Option<bool>,
    http_client: Option<reqwest::Client>,
}

impl AfterShipConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the API base URL.
    ///
    /// Useful for pointing the client at a sandbox or a local mock server.
    #[must_use]
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets a timeout for every HTTP request issued by the built transport.
    ///
    /// Ignored when a transport is supplied via [`http_client`](Self::http_client).
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Enables or disables the single automatic retry after a 429 response.
    #[must_use]
    pub const fn rate_limit_retry(mut self, enabled: bool) -> Self {
        self.rate_limit_retry = Some(enabled);
        self
    }

    /// Supplies the transport to issue requests with.
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Builds the [`AfterShipConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_key` is not set.
    pub fn build(self) -> Result<AfterShipConfig, ConfigError> {
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;

        Ok(AfterShipConfig {
            api_key,
            endpoint: self.endpoint.unwrap_or_default(),
            user_agent_prefix: self.user_agent_prefix,
            request_timeout: self.request_timeout,
            rate_limit_retry: self.rate_limit_retry.unwrap_or(true),
            http_client: self.http_client,
        })
    }
}
