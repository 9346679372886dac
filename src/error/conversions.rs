//! Type Conversions for ClientError
//!
//! This module contains From trait implementations for converting
//! common error types into ClientError.

use super::types::{ClientError, PartialBatchFailure};

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<PartialBatchFailure> for ClientError {
    fn from(err: PartialBatchFailure) -> Self {
        Self::PartialBatchFailure(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ClientError = json_err.into();
        assert!(matches!(err, ClientError::JsonError(_)));
    }
}
