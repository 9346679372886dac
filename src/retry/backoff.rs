//! `backoff` crate integration
//!
//! Exposes [`BackoffPolicy`] through the `backoff::backoff::Backoff` trait so
//! closure-style retries can run on `backoff::future::retry_notify`.

use backoff::backoff::Backoff;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use super::policy::{BackoffPolicy, RetryableCodes, millis};
use crate::error::{ClientError, Result};

/// Attempt-budgeted backoff driven by a [`BackoffPolicy`].
///
/// Each `next_backoff` call accounts for one failed attempt and yields
/// `None` once `max_attempts` attempts have been made.
#[derive(Debug, Clone)]
pub struct PolicyBackoff {
    policy: BackoffPolicy,
    attempts_made: u32,
}

impl PolicyBackoff {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            policy,
            attempts_made: 0,
        }
    }

    pub fn attempts_made(&self) -> u32 {
        self.attempts_made
    }
}

impl Backoff for PolicyBackoff {
    fn reset(&mut self) {
        self.attempts_made = 0;
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        self.attempts_made = self.attempts_made.saturating_add(1);
        if self.attempts_made >= self.policy.max_attempts {
            None
        } else {
            Some(self.policy.next_delay(self.attempts_made))
        }
    }
}

fn classify(retryable: &RetryableCodes, error: ClientError) -> backoff::Error<ClientError> {
    match error.status_code() {
        Some(code) if retryable.contains(code) => backoff::Error::transient(error),
        _ => backoff::Error::permanent(error),
    }
}

/// Run `operation` until it succeeds, fails terminally, or the policy's
/// attempt budget is spent.
pub async fn retry_with_backoff<F, Fut, T>(policy: &BackoffPolicy, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let retryable = &policy.retryable_codes;
    backoff::future::retry_notify(
        PolicyBackoff::new(policy.clone()),
        move || {
            let call = operation();
            async move { call.await.map_err(|error| classify(retryable, error)) }
        },
        |error: ClientError, delay: Duration| {
            warn!(
                error = %error,
                delay_ms = millis(delay),
                "Transient failure, retrying"
            );
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusCode;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn budget_yields_delays_then_stops() {
        let mut backoff = PolicyBackoff::new(BackoffPolicy::new());
        let first = backoff.next_backoff().unwrap();
        assert!(first >= Duration::from_secs(2) && first <= Duration::from_secs(3));
        let second = backoff.next_backoff().unwrap();
        assert!(second >= Duration::from_secs(4) && second <= Duration::from_secs(5));
        assert_eq!(backoff.next_backoff(), None);

        backoff.reset();
        assert_eq!(backoff.attempts_made(), 0);
        assert!(backoff.next_backoff().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn transient_errors_are_retried_within_budget() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result: Result<()> = retry_with_backoff(&BackoffPolicy::new(), || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(ClientError::rpc(StatusCode::Unavailable, "down"))
            }
        })
        .await;
        assert_eq!(
            result.unwrap_err().status_code(),
            Some(StatusCode::Unavailable)
        );
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_errors_stop_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result: Result<()> = retry_with_backoff(&BackoffPolicy::new(), || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(ClientError::rpc(StatusCode::NotFound, "no table"))
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn success_after_transient_failure() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result = retry_with_backoff(&BackoffPolicy::new(), || {
            let counter = counter.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(ClientError::rpc(StatusCode::Aborted, "conflict"))
                } else {
                    Ok(7)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
