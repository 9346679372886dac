//! Core error types

use bytes::Bytes;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::status::{Status, StatusCode};

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors surfaced by the client layer.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The remote call itself failed.
    #[error("RPC failed with {code}: {message}")]
    Rpc { code: StatusCode, message: String },

    /// The batch call succeeded but one or more entries were rejected.
    #[error(transparent)]
    PartialBatchFailure(PartialBatchFailure),

    /// The service answered with something that cannot be correlated to the request.
    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    /// Request rejected before it was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("JSON error: {0}")]
    JsonError(String),
}

impl ClientError {
    pub fn rpc(code: StatusCode, message: impl Into<String>) -> Self {
        Self::Rpc {
            code,
            message: message.into(),
        }
    }

    /// Remote status of a failed call. Only `Rpc` failures carry one; partial
    /// batch failures and protocol violations are not call-level statuses.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether the failure belongs to the default transient set
    /// (deadline exceeded, aborted, unavailable).
    pub fn is_transient(&self) -> bool {
        matches!(
            self.status_code(),
            Some(StatusCode::DeadlineExceeded | StatusCode::Aborted | StatusCode::Unavailable)
        )
    }

    pub fn as_partial_batch_failure(&self) -> Option<&PartialBatchFailure> {
        match self {
            Self::PartialBatchFailure(failure) => Some(failure),
            _ => None,
        }
    }
}

/// One rejected batch entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedMutation {
    pub row_key: Bytes,
    pub status: Status,
}

/// Aggregated outcome of a batch write in which some entries were rejected.
///
/// `failures` is keyed by the entry's position in the submitted batch. `code`
/// and `message` hold the representative failure, which is the last failing
/// acknowledgment in delivery order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} batch entries failed; last error {code}: {message}", .failures.len())]
pub struct PartialBatchFailure {
    pub code: StatusCode,
    pub message: String,
    pub failures: BTreeMap<usize, FailedMutation>,
}

impl PartialBatchFailure {
    pub fn representative(&self) -> Status {
        Status::new(self.code, self.message.clone())
    }

    pub fn failed_indices(&self) -> Vec<usize> {
        self.failures.keys().copied().collect()
    }

    pub fn failed_row_keys(&self) -> Vec<Bytes> {
        self.failures.values().map(|f| f.row_key.clone()).collect()
    }

    pub fn get(&self, index: usize) -> Option<&FailedMutation> {
        self.failures.get(&index)
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}
