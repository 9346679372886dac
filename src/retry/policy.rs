//! Backoff policy
//!
//! Pure delay computation and retry eligibility. The policy never sleeps and
//! keeps no per-call state; attempt counting belongs to the caller.

use rand::Rng;
use std::collections::BTreeSet;
use std::time::Duration;

use crate::defaults;
use crate::status::StatusCode;

/// Status codes considered transient.
///
/// Owned by a [`BackoffPolicy`] value rather than living in a global table so
/// that tests and callers can substitute their own classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryableCodes(BTreeSet<StatusCode>);

impl RetryableCodes {
    pub fn new(codes: impl IntoIterator<Item = StatusCode>) -> Self {
        Self(codes.into_iter().collect())
    }

    /// Classification under which every failure is terminal.
    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    pub fn contains(&self, code: StatusCode) -> bool {
        self.0.contains(&code)
    }

    pub fn iter(&self) -> impl Iterator<Item = StatusCode> + '_ {
        self.0.iter().copied()
    }
}

impl Default for RetryableCodes {
    fn default() -> Self {
        Self::new(defaults::retry::RETRYABLE_CODES)
    }
}

impl FromIterator<StatusCode> for RetryableCodes {
    fn from_iter<T: IntoIterator<Item = StatusCode>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// Bounded exponential backoff with additive jitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Attempts allowed for one logical call, the first one included
    pub max_attempts: u32,
    /// Unit of the exponential term
    pub base_delay: Duration,
    /// Upper bound of the uniform jitter term
    pub max_jitter: Duration,
    /// Ceiling for any single delay
    pub max_delay: Duration,
    /// Transient status codes
    pub retryable_codes: RetryableCodes,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: defaults::retry::MAX_ATTEMPTS,
            base_delay: defaults::retry::BASE_DELAY,
            max_jitter: defaults::retry::MAX_JITTER,
            max_delay: defaults::retry::MAX_DELAY,
            retryable_codes: RetryableCodes::default(),
        }
    }
}

impl BackoffPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_jitter(mut self, jitter: Duration) -> Self {
        self.max_jitter = jitter;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_retryable_codes(mut self, codes: RetryableCodes) -> Self {
        self.retryable_codes = codes;
        self
    }

    /// Delay to wait before the next attempt, given the number of attempts
    /// already made (so the first retry passes `1`).
    ///
    /// `min(uniform(0, max_jitter) + 2^attempts_made * base_delay, max_delay)`
    pub fn next_delay(&self, attempts_made: u32) -> Duration {
        let jitter_us = micros(self.max_jitter);
        let jitter = if jitter_us == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=jitter_us)
        };
        self.delay_with_jitter(attempts_made, Duration::from_micros(jitter))
    }

    /// Deterministic form of [`next_delay`](Self::next_delay) with the jitter supplied.
    pub fn delay_with_jitter(&self, attempts_made: u32, jitter: Duration) -> Duration {
        let exponential = 1u64
            .checked_shl(attempts_made)
            .and_then(|factor| micros(self.base_delay).checked_mul(factor))
            .unwrap_or(u64::MAX);
        let total = exponential.saturating_add(micros(jitter));
        Duration::from_micros(total).min(self.max_delay)
    }

    pub fn is_retryable(&self, code: StatusCode) -> bool {
        self.retryable_codes.contains(code)
    }

    /// Whether another attempt may be made.
    ///
    /// The first attempt is always allowed since there is no prior status yet.
    /// After that, `code` must be transient and the budget not yet spent.
    pub fn is_retry_eligible(&self, code: StatusCode, attempts_made: u32) -> bool {
        attempts_made == 0 || (self.is_retryable(code) && attempts_made < self.max_attempts)
    }
}

fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

/// Whole milliseconds for log fields, saturating at `u64::MAX`.
pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL_CODES: [StatusCode; 17] = [
        StatusCode::Ok,
        StatusCode::Cancelled,
        StatusCode::Unknown,
        StatusCode::InvalidArgument,
        StatusCode::DeadlineExceeded,
        StatusCode::NotFound,
        StatusCode::AlreadyExists,
        StatusCode::PermissionDenied,
        StatusCode::ResourceExhausted,
        StatusCode::FailedPrecondition,
        StatusCode::Aborted,
        StatusCode::OutOfRange,
        StatusCode::Unimplemented,
        StatusCode::Internal,
        StatusCode::Unavailable,
        StatusCode::DataLoss,
        StatusCode::Unauthenticated,
    ];

    fn any_code() -> impl Strategy<Value = StatusCode> {
        prop::sample::select(ALL_CODES.to_vec())
    }

    #[test]
    fn first_retries_follow_the_exponential_schedule() {
        let policy = BackoffPolicy::new();
        assert_eq!(
            policy.delay_with_jitter(1, Duration::ZERO),
            Duration::from_secs(2)
        );
        assert_eq!(
            policy.delay_with_jitter(2, Duration::from_millis(500)),
            Duration::from_millis(4_500)
        );
        assert_eq!(
            policy.delay_with_jitter(3, Duration::from_secs(1)),
            Duration::from_secs(9)
        );
    }

    #[test]
    fn delay_is_clipped_to_ceiling() {
        let policy = BackoffPolicy::new();
        assert_eq!(policy.delay_with_jitter(6, Duration::ZERO), Duration::from_secs(60));
        assert_eq!(policy.delay_with_jitter(200, Duration::ZERO), Duration::from_secs(60));
    }

    #[test]
    fn sampled_delay_stays_within_jitter_window() {
        let policy = BackoffPolicy::new();
        for _ in 0..64 {
            let delay = policy.next_delay(1);
            assert!(delay >= Duration::from_secs(2));
            assert!(delay <= Duration::from_secs(3));
        }
    }

    #[test]
    fn millis_saturates_for_huge_durations() {
        assert_eq!(millis(Duration::from_millis(2_500)), 2_500);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn zero_jitter_is_deterministic() {
        let policy = BackoffPolicy::new().with_max_jitter(Duration::ZERO);
        assert_eq!(policy.next_delay(2), Duration::from_secs(4));
    }

    #[test]
    fn default_classification() {
        let policy = BackoffPolicy::new();
        assert!(policy.is_retryable(StatusCode::DeadlineExceeded));
        assert!(policy.is_retryable(StatusCode::Aborted));
        assert!(policy.is_retryable(StatusCode::Unavailable));
        assert!(!policy.is_retryable(StatusCode::Internal));
        assert!(!policy.is_retryable(StatusCode::Ok));
    }

    #[test]
    fn substituted_classification() {
        let policy = BackoffPolicy::new()
            .with_retryable_codes(RetryableCodes::new([StatusCode::Internal]));
        assert!(policy.is_retry_eligible(StatusCode::Internal, 1));
        assert!(!policy.is_retry_eligible(StatusCode::Unavailable, 1));

        let never = BackoffPolicy::new().with_retryable_codes(RetryableCodes::none());
        assert!(!never.is_retry_eligible(StatusCode::Unavailable, 1));
        assert!(never.is_retry_eligible(StatusCode::Unavailable, 0));
    }

    #[test]
    fn retryable_code_stops_at_budget() {
        let policy = BackoffPolicy::new();
        assert!(policy.is_retry_eligible(StatusCode::Unavailable, 1));
        assert!(policy.is_retry_eligible(StatusCode::Unavailable, 2));
        assert!(!policy.is_retry_eligible(StatusCode::Unavailable, 3));
        assert!(!policy.is_retry_eligible(StatusCode::Unavailable, 4));
    }

    proptest! {
        #[test]
        fn prop_delay_never_exceeds_ceiling(attempt in 1u32..=512) {
            let policy = BackoffPolicy::new();
            prop_assert!(policy.next_delay(attempt) <= Duration::from_micros(60_000_000));
        }

        #[test]
        fn prop_delay_floor_is_non_decreasing(attempt in 1u32..128) {
            let policy = BackoffPolicy::new();
            let current = policy.delay_with_jitter(attempt, Duration::ZERO);
            let next = policy.delay_with_jitter(attempt + 1, Duration::ZERO);
            prop_assert!(next >= current);
        }

        #[test]
        fn prop_first_attempt_always_eligible(code in any_code(), max in 0u32..10) {
            let policy = BackoffPolicy::new().with_max_attempts(max);
            prop_assert!(policy.is_retry_eligible(code, 0));
        }

        #[test]
        fn prop_terminal_codes_never_retried(code in any_code(), attempts in 1u32..10) {
            let policy = BackoffPolicy::new();
            prop_assume!(!policy.is_retryable(code));
            prop_assert!(!policy.is_retry_eligible(code, attempts));
        }

        #[test]
        fn prop_budget_is_enforced(max in 1u32..10, extra in 0u32..10) {
            let policy = BackoffPolicy::new().with_max_attempts(max);
            prop_assert!(!policy.is_retry_eligible(StatusCode::Unavailable, max + extra));
        }
    }
}
