//! Resending a directions request that never reached the service.
//!
//! Any answer from the service is final: a non-`OK` status or an HTTP error
//! status is reported to the user with the raw status and never retried.
//! Only transport failures (timeouts, refused or dropped connections) are
//! resent, and only when a retry budget is configured.

use std::future::Future;
use std::time::Duration;

use crate::error::DirectionsError;

const MAX_DELAY: Duration = Duration::from_secs(10);

/// Retry budget for transport failures. The default sends each request once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    max_retries: u32,
    backoff_base: Duration,
}

/// `true` when the request failed before any HTTP response arrived.
fn is_transport_failure(err: &DirectionsError) -> bool {
    match err {
        DirectionsError::Http(e) => e.status().is_none() && (e.is_timeout() || e.is_connect()),
        DirectionsError::Upstream { .. }
        | DirectionsError::Deserialize { .. }
        | DirectionsError::InvalidRequest(_) => false,
    }
}

impl RetryPolicy {
    pub(crate) fn new(max_retries: u32, backoff_base_ms: u64) -> Self {
        Self {
            max_retries,
            backoff_base: Duration::from_millis(backoff_base_ms),
        }
    }

    pub(crate) fn max_retries(self) -> u32 {
        self.max_retries
    }

    /// Delay before resend number `retry` (1-based): the base doubled per
    /// earlier resend, capped at 10 s, then scaled by a random factor in
    /// `[0.75, 1.25)`.
    fn delay(self, retry: u32) -> Duration {
        let doubled = self
            .backoff_base
            .saturating_mul(1u32 << retry.saturating_sub(1).min(8));
        doubled.min(MAX_DELAY).mul_f64(0.75 + rand::random::<f64>() * 0.5)
    }

    /// Runs `send` once, then again after each transport failure while the
    /// budget lasts.
    pub(crate) async fn run<T, F, Fut>(self, mut send: F) -> Result<T, DirectionsError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DirectionsError>>,
    {
        let mut retry = 0u32;
        loop {
            match send().await {
                Err(err) if retry < self.max_retries && is_transport_failure(&err) => {
                    retry += 1;
                    let delay = self.delay(retry);
                    tracing::warn!(
                        retry,
                        max_retries = self.max_retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "directions service unreachable, resending"
                    );
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn upstream(status: &str) -> DirectionsError {
        DirectionsError::Upstream {
            status: status.to_owned(),
            message: None,
        }
    }

    /// Error from connecting to a local port with no listener.
    async fn refused_connection() -> DirectionsError {
        reqwest::Client::new()
            .get("http://127.0.0.1:9/")
            .send()
            .await
            .expect_err("nothing listens on the discard port")
            .into()
    }

    async fn count_calls(
        policy: RetryPolicy,
        make_err: impl Fn() -> DirectionsError,
    ) -> (u32, Result<u32, DirectionsError>) {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = policy
            .run(|| {
                c.fetch_add(1, Ordering::SeqCst);
                let err = make_err();
                async move { Err::<u32, _>(err) }
            })
            .await;
        (calls.load(Ordering::SeqCst), result)
    }

    #[tokio::test]
    async fn service_statuses_are_never_resent() {
        for status in ["ZERO_RESULTS", "NOT_FOUND", "UNKNOWN_ERROR"] {
            let (calls, result) = count_calls(RetryPolicy::new(3, 0), || upstream(status)).await;
            assert_eq!(calls, 1, "status {status}");
            assert!(matches!(result, Err(DirectionsError::Upstream { .. })));
        }
    }

    #[tokio::test]
    async fn unreadable_body_is_not_resent() {
        let (calls, _) = count_calls(RetryPolicy::new(3, 0), || DirectionsError::Deserialize {
            context: "test".to_owned(),
            source: serde_json::from_str::<()>("invalid").unwrap_err(),
        })
        .await;
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn refused_connection_is_resent_within_budget() {
        let err = refused_connection().await;
        assert!(is_transport_failure(&err), "got: {err:?}");

        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = RetryPolicy::new(2, 0)
            .run(|| {
                c.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(refused_connection().await) }
            })
            .await;
        assert!(matches!(result, Err(DirectionsError::Http(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn default_policy_sends_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = RetryPolicy::default()
            .run(|| {
                c.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(refused_connection().await) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn success_is_returned_immediately() {
        let result = RetryPolicy::new(3, 0)
            .run(|| async { Ok::<u32, DirectionsError>(42) })
            .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn delay_doubles_and_is_capped() {
        let policy = RetryPolicy::new(5, 400);
        let first = policy.delay(1);
        assert!(first >= Duration::from_millis(300) && first < Duration::from_millis(500));
        let third = policy.delay(3);
        assert!(third >= Duration::from_millis(1200) && third < Duration::from_millis(2000));

        let slow = RetryPolicy::new(5, 60_000);
        assert!(slow.delay(4) < Duration::from_millis(12_500));
    }
}
