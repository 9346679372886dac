//! widecolumn-client
//!
//! Client-side resilience and request construction for a remote wide-column
//! store: bounded exponential-backoff retries, batched mutations with
//! aggregated partial-failure reporting, and builders for conditional and
//! read-modify-write requests.
//!
//! The network stub itself is supplied by the caller through
//! [`transport::DataClient`].
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use widecolumn_client::prelude::*;
//!
//! # async fn example(client: Arc<dyn DataClient>) -> Result<()> {
//! let config = ClientConfig::new("my-project", "my-instance");
//! let table = Table::from_config(client, &config, "events")?;
//!
//! let rows = vec![
//!     RowMutation::new("user#1", MutationSet::new().set_cell("stats", "visits", "1")),
//!     RowMutation::new("user#2", MutationSet::new().delete_row()),
//! ];
//! match table.mutate_rows(&rows).await {
//!     Ok(()) => {}
//!     Err(ClientError::PartialBatchFailure(failure)) => {
//!         for (index, failed) in &failure.failures {
//!             eprintln!("row {index} ({:?}) failed: {}", failed.row_key, failed.status);
//!         }
//!     }
//!     Err(other) => return Err(other),
//! }
//! # Ok(())
//! # }
//! ```
#![deny(unsafe_code)]

pub mod batch;
pub mod builders;
pub mod config;
pub mod defaults;
pub mod error;
pub mod filters;
pub mod observability;
pub mod retry;
pub mod status;
pub mod table;
pub mod transport;
pub mod types;

pub use error::{ClientError, PartialBatchFailure};

/// Commonly used types.
pub mod prelude {
    pub use crate::batch::BatchMutationCoordinator;
    pub use crate::builders::{ConditionalMutation, MutationSet, ReadModifyWrite, RowMutation};
    pub use crate::config::{ClientConfig, RetrySettings};
    pub use crate::error::{ClientError, FailedMutation, PartialBatchFailure, Result};
    pub use crate::filters::{CompileFilter, RowFilter};
    pub use crate::retry::{BackoffPolicy, RetryExecutor, RetryableCodes};
    pub use crate::status::{Status, StatusCode};
    pub use crate::table::Table;
    pub use crate::transport::{AckStream, DataClient, RowStream};
}
