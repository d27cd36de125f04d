//! Error types for the AfterShip API SDK.
//!
//! This module contains error types used throughout the SDK for configuration
//! and validation errors.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. A client can never be built without a usable
//! credential, so a missing API key is reported here rather than on every call.
//!
//! # Example
//!
//! ```rust
//! use aftership_api::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors that can occur during SDK configuration.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key cannot be empty.
    #[error("invalid credentials: API key must not be empty")]
    EmptyApiKey,

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// API endpoint is invalid.
    #[error("Invalid API endpoint '{url}'. Please provide a valid URL with scheme (e.g., 'https://api.aftership.com/v4').")]
    InvalidEndpoint {
        /// The invalid URL that was provided.
        url: String,
    },

    /// The underlying HTTP transport could not be created.
    #[error("Failed to create HTTP client: {reason}")]
    HttpClientBuild {
        /// Why the transport could not be built.
        reason: String,
    },
}
