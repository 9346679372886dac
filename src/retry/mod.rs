//! Retry module (ergonomic namespace)
//! - policy.rs: delay computation and retry eligibility
//! - executor.rs: single-attempt executor and the caller-level retry loop
//! - backoff.rs: backoff crate-based retries

pub mod backoff;
pub mod executor;
pub mod policy;

pub use self::backoff::{PolicyBackoff, retry_with_backoff};
pub use executor::{Invocable, RetryExecutor};
pub use policy::{BackoffPolicy, RetryableCodes};
