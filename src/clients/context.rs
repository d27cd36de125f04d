//! Per-call cancellation and deadline.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::clients::errors::TransportError;

/// Caller-controlled limits for a single API call.
///
/// A context may carry a [`CancellationToken`], a deadline, both, or
/// neither. Every network round trip and every rate-limit backoff made on
/// behalf of the call observes it.
///
/// # Example
///
/// ```rust
/// use aftership_api::clients::RequestContext;
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
///
/// let token = CancellationToken::new();
/// let ctx = RequestContext::new()
///     .with_cancellation(token.clone())
///     .with_timeout(Duration::from_secs(30));
///
/// assert!(!ctx.is_cancelled());
/// token.cancel();
/// assert!(ctx.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    cancellation: Option<CancellationToken>,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Creates a context with no cancellation and no deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Sets an absolute deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets a deadline `timeout` from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns whether the cancellation token has fired.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Returns the time left before the deadline, if one is set.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Returns whether waiting `wait` would still finish before the deadline.
    pub(crate) fn allows_wait(&self, wait: Duration) -> bool {
        self.remaining().map_or(true, |remaining| wait < remaining)
    }

    /// Sleeps for `duration`, returning `false` if interrupted by
    /// cancellation or the deadline.
    pub(crate) async fn sleep(&self, duration: Duration) -> bool {
        tokio::select! {
            biased;
            () = self.cancelled() => false,
            () = self.deadline_elapsed() => false,
            () = tokio::time::sleep(duration) => true,
        }
    }

    /// Drives a transport future, aborting it on cancellation or deadline.
    ///
    /// An already-cancelled context never polls `fut`, so no request leaves
    /// the process.
    pub(crate) async fn run<F, T>(&self, fut: F) -> Result<T, TransportError>
    where
        F: Future<Output = Result<T, reqwest::Error>>,
    {
        tokio::select! {
            biased;
            () = self.cancelled() => Err(TransportError::Cancelled),
            () = self.deadline_elapsed() => Err(TransportError::DeadlineExceeded),
            result = fut => result.map_err(TransportError::Network),
        }
    }

    async fn cancelled(&self) {
        match &self.cancellation {
            Some(token) => token.cancelled().await,
            None => std::future::pending().await,
        }
    }

    async fn deadline_elapsed(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_empty_context_runs_future_to_completion() {
        let ctx = RequestContext::new();
        let result = ctx.run(async { Ok::<_, reqwest::Error>(42) }).await;

        assert_eq!(result.unwrap(), 42);
        assert!(ctx.remaining().is_none());
        assert!(ctx.allows_wait(Duration::from_secs(3600)));
    }

    #[tokio::test]
    async fn test_cancelled_context_never_polls_future() {
        let token = CancellationToken::new();
        token.cancel();
        let ctx = RequestContext::new().with_cancellation(token);

        let polled = AtomicBool::new(false);
        let result = ctx
            .run(async {
                polled.store(true, Ordering::SeqCst);
                Ok::<(), reqwest::Error>(())
            })
            .await;

        assert!(matches!(result, Err(TransportError::Cancelled)));
        assert!(!polled.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_deadline_aborts_slow_future() {
        let ctx = RequestContext::new().with_timeout(Duration::from_millis(20));

        let result = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<(), reqwest::Error>(())
            })
            .await;

        assert!(matches!(result, Err(TransportError::DeadlineExceeded)));
    }

    #[tokio::test]
    async fn test_sleep_is_interrupted_by_cancellation() {
        let token = CancellationToken::new();
        let ctx = RequestContext::new().with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let started = Instant::now();
        assert!(!ctx.sleep(Duration::from_secs(5)).await);
        assert!(started.elapsed() < Duration::from_secs(2));
        canceller.await.unwrap();
    }

    #[tokio::test]
    async fn test_sleep_completes_without_limits() {
        let ctx = RequestContext::new();
        assert!(ctx.sleep(Duration::from_millis(5)).await);
    }

    #[test]
    fn test_allows_wait_respects_deadline() {
        let ctx = RequestContext::new().with_deadline(Instant::now() + Duration::from_secs(10));

        assert!(ctx.allows_wait(Duration::from_secs(1)));
        assert!(!ctx.allows_wait(Duration::from_secs(60)));
    }
}
