//! Transport abstraction
//!
//! The generated RPC stub lives outside this crate. Anything that can perform
//! the remote calls below can back a [`crate::table::Table`]; tests plug in
//! in-memory fakes.

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::error::{ClientError, Result};
use crate::status::StatusCode;
use crate::types::{
    CheckAndMutateRowRequest, CheckAndMutateRowResponse, MutateRowRequest, MutateRowsRequest,
    MutateRowsResponse, ReadModifyWriteRowRequest, ReadRowsRequest, Row,
};

/// Lazy, finite, non-restartable stream of acknowledgment batches.
pub type AckStream = Pin<Box<dyn Stream<Item = Result<MutateRowsResponse>> + Send>>;

/// Lazy stream of fully assembled rows.
pub type RowStream = Pin<Box<dyn Stream<Item = Result<Row>> + Send>>;

fn unimplemented(method: &str) -> ClientError {
    ClientError::rpc(
        StatusCode::Unimplemented,
        format!("{method} is not supported by this transport"),
    )
}

/// Remote data-plane calls.
///
/// Only the batch write is mandatory; the remaining calls default to an
/// `UNIMPLEMENTED` failure.
#[async_trait]
pub trait DataClient: Send + Sync {
    /// Start a batch write. Returning `Ok` means the call was established;
    /// per-entry outcomes arrive on the stream.
    async fn mutate_rows(&self, request: MutateRowsRequest) -> Result<AckStream>;

    async fn mutate_row(&self, _request: MutateRowRequest) -> Result<()> {
        Err(unimplemented("MutateRow"))
    }

    async fn check_and_mutate_row(
        &self,
        _request: CheckAndMutateRowRequest,
    ) -> Result<CheckAndMutateRowResponse> {
        Err(unimplemented("CheckAndMutateRow"))
    }

    async fn read_modify_write_row(&self, _request: ReadModifyWriteRowRequest) -> Result<Row> {
        Err(unimplemented("ReadModifyWriteRow"))
    }

    async fn read_rows(&self, _request: ReadRowsRequest) -> Result<RowStream> {
        Err(unimplemented("ReadRows"))
    }
}
