//! Retry executor
//!
//! Wraps a single-shot operation and spaces out successive attempts according
//! to a [`BackoffPolicy`]. One executor instance serves one logical call; its
//! attempt count is never reset.

use std::future::Future;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::policy::{BackoffPolicy, millis};
use crate::error::{ClientError, Result};

/// A single remote operation with no retry behavior of its own.
///
/// Implemented for any `Fn(A) -> impl Future<Output = Result<T>>`, so call
/// sites usually pass a closure that forwards to the transport.
pub trait Invocable<A> {
    type Output;
    type Future: Future<Output = Result<Self::Output>>;

    fn call(&self, args: A) -> Self::Future;
}

impl<A, F, Fut, T> Invocable<A> for F
where
    F: Fn(A) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    type Output = T;
    type Future = Fut;

    fn call(&self, args: A) -> Self::Future {
        self(args)
    }
}

/// Executes one attempt per [`execute_once`](Self::execute_once) call, waiting
/// out the backoff delay first when a previous attempt was already made.
///
/// The executor does not refuse attempts past the budget. Whoever owns the
/// retry loop must consult [`should_retry`](Self::should_retry) before calling
/// again; [`execute`](Self::execute) is the loop that does so.
pub struct RetryExecutor<I> {
    operation: I,
    policy: BackoffPolicy,
    attempts_made: u32,
}

impl<I> RetryExecutor<I> {
    pub fn new(operation: I, policy: BackoffPolicy) -> Self {
        Self {
            operation,
            policy,
            attempts_made: 0,
        }
    }

    pub fn attempts_made(&self) -> u32 {
        self.attempts_made
    }

    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Whether `error` from the latest attempt allows another one.
    ///
    /// Failures without a remote status (partial batch failures, protocol
    /// violations, local validation) are never retried.
    pub fn should_retry(&self, error: &ClientError) -> bool {
        match error.status_code() {
            Some(code) => self.policy.is_retry_eligible(code, self.attempts_made),
            None => false,
        }
    }

    /// Make exactly one attempt. Failures propagate untouched.
    pub async fn execute_once<A>(&mut self, args: A) -> Result<I::Output>
    where
        I: Invocable<A>,
    {
        if self.attempts_made > 0 {
            let delay = self.policy.next_delay(self.attempts_made);
            debug!(
                attempt = self.attempts_made + 1,
                delay_ms = millis(delay),
                "Backing off before next attempt"
            );
            sleep(delay).await;
        }
        self.attempts_made = self.attempts_made.saturating_add(1);
        self.operation.call(args).await
    }

    /// Attempt until success, a terminal failure, or an exhausted budget.
    /// Returns the first success or the last failure.
    pub async fn execute<A>(&mut self, args: A) -> Result<I::Output>
    where
        I: Invocable<A>,
        A: Clone,
    {
        loop {
            match self.execute_once(args.clone()).await {
                Ok(output) => return Ok(output),
                Err(error) => {
                    if !self.should_retry(&error) {
                        debug!(
                            attempts = self.attempts_made,
                            error = %error,
                            "Giving up on call"
                        );
                        return Err(error);
                    }
                    warn!(
                        attempt = self.attempts_made,
                        max_attempts = self.policy.max_attempts,
                        error = %error,
                        "Transient failure, retrying"
                    );
                }
            }
        }
    }
}
