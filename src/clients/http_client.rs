//! HTTP client for AfterShip API communication.
//!
//! This module provides the [`HttpClient`] type, which sends authenticated
//! requests, classifies failures into [`HttpError`], and retries a
//! rate-limited call once after the window resets.

use std::collections::HashMap;

use crate::clients::context::RequestContext;
use crate::clients::errors::HttpError;
use crate::clients::http_request::HttpRequest;
use crate::clients::http_response::HttpResponse;
use crate::clients::retry::{RateLimitRetry, RetryDecision};
use crate::config::{AfterShipConfig, Endpoint};
use crate::error::ConfigError;

/// Header carrying the API key on every request.
pub const HEADER_API_KEY: &str = "aftership-api-key";

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the AfterShip API.
///
/// The client handles:
/// - URL construction from the configured [`Endpoint`]
/// - Default headers including User-Agent and the API key
/// - Cancellation and deadlines via [`RequestContext`]
/// - Error classification for non-2xx responses
/// - A single retry after a 429, when enabled
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use aftership_api::clients::{HttpClient, HttpMethod, HttpRequest, RequestContext};
///
/// let client = HttpClient::new(&config)?;
/// let request = HttpRequest::builder(HttpMethod::Get, "/trackings").build()?;
/// let response = client.request(&RequestContext::new(), request).await?;
/// println!("{}", response.body);
/// ```
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    endpoint: Endpoint,
    default_headers: HashMap<String, String>,
    rate_limit_retry: bool,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from configuration.
    ///
    /// Uses the transport supplied in the configuration when present;
    /// otherwise builds a rustls-backed one honoring the configured
    /// request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClientBuild`] if the transport cannot be
    /// created (e.g. TLS initialization failure).
    pub fn new(config: &AfterShipConfig) -> Result<Self, ConfigError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}AfterShip API Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert(
            HEADER_API_KEY.to_string(),
            config.api_key().as_ref().to_string(),
        );

        let client = match config.http_client() {
            Some(client) => client.clone(),
            None => {
                let mut builder = reqwest::Client::builder().use_rustls_tls();
                if let Some(timeout) = config.request_timeout() {
                    builder = builder.timeout(timeout);
                }
                builder.build().map_err(|e| ConfigError::HttpClientBuild {
                    reason: e.to_string(),
                })?
            }
        };

        Ok(Self {
            client,
            endpoint: config.endpoint().clone(),
            default_headers,
            rate_limit_retry: config.rate_limit_retry(),
        })
    }

    /// Returns the endpoint requests are sent to.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends an HTTP request to the AfterShip API.
    ///
    /// A 429 response is retried once after waiting until the rate limit
    /// resets, unless rate-limit retry is disabled, the context is
    /// cancelled, or the deadline would pass first. No other status is
    /// retried.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - The request is cancelled, times out, or hits a network error (`Transport`)
    /// - A non-2xx response is received (classified by status)
    pub async fn request(
        &self,
        ctx: &RequestContext,
        request: HttpRequest,
    ) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = self.endpoint.join(&request.path);
        let mut headers = self.default_headers.clone();
        if request.body.is_some() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }

        let mut policy = RateLimitRetry::new(self.rate_limit_retry);
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;

            match self.dispatch(ctx, &request, &url, &headers, attempt).await {
                Ok(mut response) => {
                    response.attempts = attempt;
                    return Ok(response);
                }
                Err(HttpError::RateLimited(error)) => {
                    tracing::warn!(
                        method = %request.http_method,
                        path = %request.path,
                        attempt,
                        "rate limited by AfterShip API"
                    );
                    if policy.on_rate_limited(ctx, &error).await == RetryDecision::GiveUp {
                        return Err(HttpError::RateLimited(error));
                    }
                }
                Err(error) => return Err(error),
            }
        }
    }

    /// Performs one round trip and classifies the outcome.
    async fn dispatch(
        &self,
        ctx: &RequestContext,
        request: &HttpRequest,
        url: &str,
        headers: &HashMap<String, String>,
        attempt: u32,
    ) -> Result<HttpResponse, HttpError> {
        let mut req_builder = self
            .client
            .request(request.http_method.as_reqwest(), url);

        for (key, value) in headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(query) = request.query.as_ref().filter(|q| !q.is_empty()) {
            req_builder = req_builder.query(query);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        tracing::debug!(
            method = %request.http_method,
            path = %request.path,
            attempt,
            "sending request to AfterShip API"
        );

        let (code, res_headers, body) = ctx
            .run(async move {
                let res = req_builder.send().await?;
                let code = res.status().as_u16();
                let res_headers = Self::parse_response_headers(res.headers());
                let body = res.text().await?;
                Ok::<_, reqwest::Error>((code, res_headers, body))
            })
            .await?;

        let response = HttpResponse::new(code, res_headers, body);

        tracing::debug!(
            method = %request.http_method,
            path = %request.path,
            status = code,
            remaining = ?response.rate_limit.remaining,
            "received response from AfterShip API"
        );

        if response.is_ok() {
            return Ok(response);
        }

        Err(HttpError::from_response(
            code,
            &response.body,
            response.rate_limit,
        ))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}
