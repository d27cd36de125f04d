//! REST client implementation for the AfterShip Tracking API.
//!
//! This module provides the [`RestClient`] type, which resolves an
//! operation's path, sends it through the [`HttpClient`], and decodes the
//! enveloped response into a typed payload.

use serde::de::DeserializeOwned;

use crate::clients::{HttpClient, HttpError, HttpRequest, RequestContext};
use crate::config::AfterShipConfig;
use crate::error::ConfigError;
use crate::rest::{ResourcePath, ResourceResponse, TrackingIdentifier};

/// REST API client for the AfterShip Tracking API.
///
/// Build one per API key and share it by reference; it holds no per-call
/// state.
///
/// # Thread Safety
///
/// `RestClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use aftership_api::{AfterShipConfig, ApiKey, RestClient};
/// use aftership_api::clients::RequestContext;
/// use aftership_api::rest::{resources::Tracking, TrackingIdentifier};
///
/// let config = AfterShipConfig::builder()
///     .api_key(ApiKey::new("your-api-key")?)
///     .build()?;
/// let client = RestClient::new(&config)?;
///
/// let id = TrackingIdentifier::by_slug_and_number("dhl", "RA123456789CN");
/// let tracking = Tracking::find(&client, &RequestContext::new(), &id, None).await?;
/// ```
#[derive(Debug)]
pub struct RestClient {
    http_client: HttpClient,
}

// Verify RestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};

impl RestClient {
    /// Creates a new REST client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClientBuild`] if the transport cannot be created.
    pub fn new(config: &AfterShipConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            http_client: HttpClient::new(config)?,
        })
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Executes one API operation and decodes its payload.
    ///
    /// The path is resolved before anything is sent, so a blank identifier
    /// fails without a network call. `body` is sent as-is; callers wrap it in
    /// an [`Envelope`](crate::rest::Envelope) where the API expects one.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] for path resolution, transport, API, or decoding
    /// failures.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        path: &ResourcePath,
        identifier: Option<&TrackingIdentifier>,
        query: Option<Vec<(String, String)>>,
        body: Option<serde_json::Value>,
    ) -> Result<ResourceResponse<T>, HttpError> {
        let uri_path = path.build(identifier)?;

        let mut builder = HttpRequest::builder(path.http_method, uri_path);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }
        let request = builder.build()?;

        let response = self.http_client.request(ctx, request).await?;
        let decoded = ResourceResponse::from_http_response(response, path.response_key);

        if let Err(error) = &decoded {
            tracing::debug!(
                operation = path.operation.as_str(),
                error = %error,
                "failed to decode AfterShip API response"
            );
        }

        decoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::MissingIdentifierError;
    use crate::config::{ApiKey, Endpoint};
    use crate::rest::{get_path, ResourceOperation};

    fn create_client() -> RestClient {
        let config = AfterShipConfig::builder()
            .api_key(ApiKey::new("test-key").unwrap())
            .endpoint(Endpoint::new("http://127.0.0.1:9").unwrap())
            .build()
            .unwrap();
        RestClient::new(&config).unwrap()
    }

    #[test]
    fn test_rest_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RestClient>();
    }

    #[tokio::test]
    async fn test_blank_identifier_fails_before_sending() {
        let client = create_client();
        let id = TrackingIdentifier::by_id("");

        let result: Result<ResourceResponse<serde_json::Value>, _> = client
            .execute(
                &RequestContext::new(),
                get_path(ResourceOperation::Find),
                Some(&id),
                None,
                None,
            )
            .await;

        assert!(matches!(
            result,
            Err(HttpError::MissingIdentifier(
                MissingIdentifierError::TrackingId
            ))
        ));
    }
}
