//! Single-retry backoff for rate-limited calls.
//!
//! A call that receives a 429 may be retried exactly once, after waiting
//! until the rate limit window resets. The wait is abandoned, and the
//! original [`RateLimitedError`] surfaced, if the caller's context is
//! cancelled or its deadline would pass first.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::clients::context::RequestContext;
use crate::clients::errors::RateLimitedError;
use crate::clients::http_response::RateLimit;

/// Wait used when a 429 carries no reset information.
pub const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(1);

/// Where a call is in its rate-limit handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryState {
    /// Not waiting on a rate limit.
    Idle,
    /// Sleeping until the rate limit window resets.
    Waiting,
}

/// What the dispatcher should do after a 429.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryDecision {
    /// Re-send the request.
    Retry,
    /// Surface the rate-limited error.
    GiveUp,
}

/// Per-call retry policy for 429 responses.
///
/// One instance lives for the duration of one logical call, so at most two
/// requests are ever sent for it.
#[derive(Debug)]
pub struct RateLimitRetry {
    enabled: bool,
    retried: bool,
    state: RetryState,
}

impl RateLimitRetry {
    /// Creates a policy; a disabled policy always gives up.
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled,
            retried: false,
            state: RetryState::Idle,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> RetryState {
        self.state
    }

    /// Computes how long to wait before retrying, as seen from `now`.
    ///
    /// The wait runs until the reset time, floored at zero, or
    /// [`DEFAULT_RATE_LIMIT_WAIT`] when the reset time is unknown.
    #[must_use]
    pub fn wait_duration(rate_limit: &RateLimit, now: DateTime<Utc>) -> Duration {
        rate_limit
            .wait_until_reset(now)
            .unwrap_or(DEFAULT_RATE_LIMIT_WAIT)
    }

    /// Handles a 429, sleeping until reset when a retry is allowed.
    pub async fn on_rate_limited(
        &mut self,
        ctx: &RequestContext,
        error: &RateLimitedError,
    ) -> RetryDecision {
        if !self.enabled || self.retried {
            return RetryDecision::GiveUp;
        }

        let wait = Self::wait_duration(&error.rate_limit, Utc::now());

        if ctx.is_cancelled() {
            tracing::info!("request cancelled, not retrying rate-limited call");
            return RetryDecision::GiveUp;
        }
        if !ctx.allows_wait(wait) {
            tracing::info!(
                wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                "deadline would pass before rate limit reset, not retrying"
            );
            return RetryDecision::GiveUp;
        }

        self.retried = true;
        self.state = RetryState::Waiting;
        tracing::warn!(
            wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
            reset_at = ?error.rate_limit.reset_at,
            "rate limit exceeded, waiting for reset before retrying"
        );

        let completed = ctx.sleep(wait).await;
        self.state = RetryState::Idle;

        if completed {
            RetryDecision::Retry
        } else {
            tracing::info!("rate limit backoff interrupted, not retrying");
            RetryDecision::GiveUp
        }
    }
}
