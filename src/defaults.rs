//! Default constants
//!
//! Retry budget and request limits shared by the policy, the builders and the
//! configuration layer.

/// Retry defaults.
pub mod retry {
    use crate::status::StatusCode;
    use std::time::Duration;

    /// Attempts allowed for one logical call, the first one included.
    pub const MAX_ATTEMPTS: u32 = 3;
    /// Unit of the exponential term: the n-th retry waits `2^n * BASE_DELAY` plus jitter.
    pub const BASE_DELAY: Duration = Duration::from_micros(1_000_000);
    /// Upper bound of the uniform jitter added to every delay.
    pub const MAX_JITTER: Duration = Duration::from_micros(1_000_000);
    /// Ceiling applied to any single computed delay.
    pub const MAX_DELAY: Duration = Duration::from_micros(60_000_000);
    /// Codes treated as transient.
    pub const RETRYABLE_CODES: [StatusCode; 3] = [
        StatusCode::DeadlineExceeded,
        StatusCode::Aborted,
        StatusCode::Unavailable,
    ];
}

/// Request limits.
pub mod limits {
    /// Maximum number of mutations a single row (or conditional branch, or
    /// read-modify-write rule list) may carry.
    pub const MAX_MUTATIONS: usize = 100_000;
}

/// Server-assigned timestamp marker for set-cell mutations.
pub const SERVER_TIMESTAMP: i64 = -1;
