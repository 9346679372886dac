//! Error Handling Module
//!
//! This module provides the error types shared by every layer of the client:
//! - Core error type (`ClientError`) and the aggregated `PartialBatchFailure`
//! - Type conversions from common error types
//!
//! # Example
//!
//! ```rust
//! use widecolumn_client::error::ClientError;
//! use widecolumn_client::status::StatusCode;
//!
//! let error = ClientError::rpc(StatusCode::Unavailable, "backend restarting");
//! assert!(error.is_transient());
//! assert_eq!(error.status_code(), Some(StatusCode::Unavailable));
//! ```

mod conversions;
pub mod types;

pub use types::*;
