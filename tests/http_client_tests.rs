//! Integration tests for the request dispatcher.
//!
//! These tests run the client against a wiremock server and verify
//! authentication headers, error classification, and the rate-limit retry.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use aftership_api::clients::{HttpClient, HttpMethod, HttpRequest, HEADER_API_KEY};
use aftership_api::{
    AfterShipConfig, ApiKey, Endpoint, HttpError, RequestContext, TransportError,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer, retry: bool) -> AfterShipConfig {
    AfterShipConfig::builder()
        .api_key(ApiKey::new("test-api-key").unwrap())
        .endpoint(Endpoint::new(server.uri()).unwrap())
        .rate_limit_retry(retry)
        .build()
        .unwrap()
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn rate_limited(reset: u64) -> ResponseTemplate {
    let reset = reset.to_string();
    ResponseTemplate::new(429)
        .insert_header("as-ratelimit-limit", "10")
        .insert_header("as-ratelimit-remaining", "0")
        .insert_header("as-ratelimit-reset", reset.as_str())
        .set_body_json(json!({
            "meta": {"code": 429, "type": "TooManyRequests", "message": "You have exceeded the API call rate limit."},
            "data": {}
        }))
}

fn ok_tracking() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("as-ratelimit-limit", "10")
        .insert_header("as-ratelimit-remaining", "9")
        .set_body_json(json!({
            "meta": {"code": 200},
            "data": {"tracking": {"id": "abc"}}
        }))
}

fn get(path: &str) -> HttpRequest {
    HttpRequest::builder(HttpMethod::Get, path).build().unwrap()
}

// ============================================================================
// Headers
// ============================================================================

#[tokio::test]
async fn test_api_key_and_user_agent_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/trackings/abc"))
        .and(header(HEADER_API_KEY, "test-api-key"))
        .and(header_exists("user-agent"))
        .respond_with(ok_tracking())
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&config_for(&server, true)).unwrap();
    let response = client
        .request(&RequestContext::new(), get("/trackings/abc"))
        .await
        .unwrap();

    assert_eq!(response.code, 200);
    assert_eq!(response.attempts, 1);
    assert_eq!(response.rate_limit.remaining, Some(9));
}

#[tokio::test]
async fn test_body_is_sent_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/trackings"))
        .and(header("content-type", "application/json"))
        .respond_with(ok_tracking())
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&config_for(&server, true)).unwrap();
    let request = HttpRequest::builder(HttpMethod::Post, "/trackings")
        .body(json!({"tracking": {"tracking_number": "123"}}))
        .build()
        .unwrap();

    client.request(&RequestContext::new(), request).await.unwrap();
}

// ============================================================================
// Error Classification
// ============================================================================

#[tokio::test]
async fn test_401_is_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "meta": {"code": 401, "type": "Unauthorized", "message": "Invalid API key."},
            "data": {}
        })))
        .mount(&server)
        .await;

    let client = HttpClient::new(&config_for(&server, true)).unwrap();
    let error = client
        .request(&RequestContext::new(), get("/trackings/abc"))
        .await
        .unwrap_err();

    match error {
        HttpError::Authentication(api) => {
            assert_eq!(api.code, 401);
            assert_eq!(api.message, "Invalid API key.");
            assert_eq!(api.http_status_code, 401);
        }
        other => panic!("expected Authentication, got {other:?}"),
    }
}

#[tokio::test]
async fn test_404_is_not_found_with_api_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "meta": {"code": 4004, "type": "NotFound", "message": "Tracking does not exist."},
            "data": {}
        })))
        .mount(&server)
        .await;

    let client = HttpClient::new(&config_for(&server, true)).unwrap();
    let error = client
        .request(&RequestContext::new(), get("/trackings/missing"))
        .await
        .unwrap_err();

    assert_eq!(error.status_code(), Some(404));
    match error {
        HttpError::NotFound(api) => {
            assert_eq!(api.code, 4004);
            assert_eq!(api.error_type, "NotFound");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_400_is_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "meta": {"code": 4003, "type": "BadRequest", "message": "Tracking already exists."}
        })))
        .mount(&server)
        .await;

    let client = HttpClient::new(&config_for(&server, true)).unwrap();
    let error = client
        .request(&RequestContext::new(), get("/trackings"))
        .await
        .unwrap_err();

    assert!(matches!(error, HttpError::Validation(ref api) if api.code == 4003));
}

#[tokio::test]
async fn test_500_is_server_error_and_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "meta": {"code": 500, "type": "InternalError", "message": "Something went wrong."}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&config_for(&server, true)).unwrap();
    let error = client
        .request(&RequestContext::new(), get("/trackings"))
        .await
        .unwrap_err();

    match error {
        HttpError::Server(server_error) => {
            assert_eq!(server_error.error.http_status_code, 500);
            assert!(server_error.raw_body.contains("InternalError"));
        }
        other => panic!("expected Server, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unparseable_error_body_is_raw_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let client = HttpClient::new(&config_for(&server, true)).unwrap();
    let error = client
        .request(&RequestContext::new(), get("/trackings"))
        .await
        .unwrap_err();

    match error {
        HttpError::Api(raw) => {
            assert_eq!(raw.status, 502);
            assert_eq!(raw.raw_body, "<html>Bad Gateway</html>");
        }
        other => panic!("expected Api, got {other:?}"),
    }
}

// ============================================================================
// Rate Limit Retry
// ============================================================================

#[tokio::test]
async fn test_429_then_success_waits_for_reset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(rate_limited(unix_now() + 3))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ok_tracking())
        .mount(&server)
        .await;

    let client = HttpClient::new(&config_for(&server, true)).unwrap();
    let started = tokio::time::Instant::now();
    let response = client
        .request(&RequestContext::new(), get("/trackings/abc"))
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_secs(2));
    assert_eq!(response.code, 200);
    assert_eq!(response.attempts, 2);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_429_twice_returns_rate_limited_after_two_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(rate_limited(unix_now()))
        .expect(2)
        .mount(&server)
        .await;

    let client = HttpClient::new(&config_for(&server, true)).unwrap();
    let error = client
        .request(&RequestContext::new(), get("/trackings/abc"))
        .await
        .unwrap_err();

    match error {
        HttpError::RateLimited(e) => {
            assert_eq!(e.error.code, 429);
            assert_eq!(e.rate_limit.limit, Some(10));
            assert_eq!(e.rate_limit.remaining, Some(0));
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn test_retry_disabled_sends_single_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(rate_limited(unix_now() + 60))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&config_for(&server, false)).unwrap();
    let error = client
        .request(&RequestContext::new(), get("/trackings/abc"))
        .await
        .unwrap_err();

    assert!(matches!(error, HttpError::RateLimited(_)));
}

#[tokio::test]
async fn test_429_without_body_is_still_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&config_for(&server, false)).unwrap();
    let error = client
        .request(&RequestContext::new(), get("/trackings/abc"))
        .await
        .unwrap_err();

    assert!(matches!(error, HttpError::RateLimited(ref e) if e.error.http_status_code == 429));
}

#[tokio::test]
async fn test_cancellation_during_backoff_returns_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(rate_limited(unix_now() + 30))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&config_for(&server, true)).unwrap();
    let token = CancellationToken::new();
    let ctx = RequestContext::new().with_cancellation(token.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        token.cancel();
    });

    let started = tokio::time::Instant::now();
    let error = client.request(&ctx, get("/trackings/abc")).await.unwrap_err();
    canceller.await.unwrap();

    assert!(matches!(error, HttpError::RateLimited(_)));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_deadline_shorter_than_wait_gives_up_immediately() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(rate_limited(unix_now() + 30))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&config_for(&server, true)).unwrap();
    let ctx = RequestContext::new().with_timeout(Duration::from_secs(5));

    let started = tokio::time::Instant::now();
    let error = client.request(&ctx, get("/trackings/abc")).await.unwrap_err();

    assert!(matches!(error, HttpError::RateLimited(_)));
    assert!(started.elapsed() < Duration::from_secs(2));
}

// ============================================================================
// Cancellation and Deadlines
// ============================================================================

#[tokio::test]
async fn test_cancelled_context_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ok_tracking())
        .expect(0)
        .mount(&server)
        .await;

    let client = HttpClient::new(&config_for(&server, true)).unwrap();
    let token = CancellationToken::new();
    token.cancel();
    let ctx = RequestContext::new().with_cancellation(token);

    let error = client.request(&ctx, get("/trackings/abc")).await.unwrap_err();
    assert!(matches!(error, HttpError::Transport(TransportError::Cancelled)));
}

#[tokio::test]
async fn test_slow_response_exceeds_deadline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ok_tracking().set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let client = HttpClient::new(&config_for(&server, true)).unwrap();
    let ctx = RequestContext::new().with_timeout(Duration::from_millis(200));

    let error = client.request(&ctx, get("/trackings/abc")).await.unwrap_err();
    assert!(matches!(
        error,
        HttpError::Transport(TransportError::DeadlineExceeded)
    ));
}
