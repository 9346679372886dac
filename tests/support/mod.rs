//! Shared fixtures for integration tests: an in-memory `DataClient` whose
//! responses are scripted per call.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use widecolumn_client::builders::{MutationSet, RowMutation};
use widecolumn_client::error::Result;
use widecolumn_client::status::{Status, StatusCode};
use widecolumn_client::transport::{AckStream, DataClient, RowStream};
use widecolumn_client::types::{
    CheckAndMutateRowRequest, CheckAndMutateRowResponse, EntryAck, MutateRowRequest,
    MutateRowsRequest, MutateRowsResponse, ReadModifyWriteRowRequest, ReadRowsRequest, Row,
};

/// Outcome of one streaming call: either establishment fails, or the stream
/// yields the listed items in order.
pub type Scripted<T> = Result<Vec<Result<T>>>;

fn next_outcome<T>(queue: &Mutex<VecDeque<T>>, method: &str) -> T {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| panic!("unexpected {method} call"))
}

#[derive(Default)]
pub struct FakeDataClient {
    mutate_rows_script: Mutex<VecDeque<Scripted<MutateRowsResponse>>>,
    mutate_row_script: Mutex<VecDeque<Result<()>>>,
    check_and_mutate_script: Mutex<VecDeque<Result<CheckAndMutateRowResponse>>>,
    read_modify_write_script: Mutex<VecDeque<Result<Row>>>,
    read_rows_script: Mutex<VecDeque<Scripted<Row>>>,

    pub mutate_rows_requests: Mutex<Vec<MutateRowsRequest>>,
    pub mutate_row_requests: Mutex<Vec<MutateRowRequest>>,
    pub check_and_mutate_requests: Mutex<Vec<CheckAndMutateRowRequest>>,
    pub read_modify_write_requests: Mutex<Vec<ReadModifyWriteRowRequest>>,
    pub read_rows_requests: Mutex<Vec<ReadRowsRequest>>,
}

impl FakeDataClient {
    pub fn push_mutate_rows(&self, outcome: Scripted<MutateRowsResponse>) {
        self.mutate_rows_script.lock().unwrap().push_back(outcome);
    }

    pub fn push_mutate_row(&self, outcome: Result<()>) {
        self.mutate_row_script.lock().unwrap().push_back(outcome);
    }

    pub fn push_check_and_mutate(&self, outcome: Result<CheckAndMutateRowResponse>) {
        self.check_and_mutate_script.lock().unwrap().push_back(outcome);
    }

    pub fn push_read_modify_write(&self, outcome: Result<Row>) {
        self.read_modify_write_script.lock().unwrap().push_back(outcome);
    }

    pub fn push_read_rows(&self, outcome: Scripted<Row>) {
        self.read_rows_script.lock().unwrap().push_back(outcome);
    }

    pub fn mutate_rows_calls(&self) -> usize {
        self.mutate_rows_requests.lock().unwrap().len()
    }
}

#[async_trait]
impl DataClient for FakeDataClient {
    async fn mutate_rows(&self, request: MutateRowsRequest) -> Result<AckStream> {
        self.mutate_rows_requests.lock().unwrap().push(request);
        let items = next_outcome(&self.mutate_rows_script, "MutateRows")?;
        Ok(Box::pin(async_stream::stream! {
            for item in items {
                yield item;
            }
        }))
    }

    async fn mutate_row(&self, request: MutateRowRequest) -> Result<()> {
        self.mutate_row_requests.lock().unwrap().push(request);
        next_outcome(&self.mutate_row_script, "MutateRow")
    }

    async fn check_and_mutate_row(
        &self,
        request: CheckAndMutateRowRequest,
    ) -> Result<CheckAndMutateRowResponse> {
        self.check_and_mutate_requests.lock().unwrap().push(request);
        next_outcome(&self.check_and_mutate_script, "CheckAndMutateRow")
    }

    async fn read_modify_write_row(&self, request: ReadModifyWriteRowRequest) -> Result<Row> {
        self.read_modify_write_requests.lock().unwrap().push(request);
        next_outcome(&self.read_modify_write_script, "ReadModifyWriteRow")
    }

    async fn read_rows(&self, request: ReadRowsRequest) -> Result<RowStream> {
        self.read_rows_requests.lock().unwrap().push(request);
        let items = next_outcome(&self.read_rows_script, "ReadRows")?;
        Ok(Box::pin(futures::stream::iter(items)))
    }
}

/// Transport that only supports the mandatory batch write, acknowledging
/// every entry as successful.
pub struct BatchOnlyClient;

#[async_trait]
impl DataClient for BatchOnlyClient {
    async fn mutate_rows(&self, request: MutateRowsRequest) -> Result<AckStream> {
        let entries = (0..request.entries.len())
            .map(|index| ok(index as i64))
            .collect();
        Ok(Box::pin(futures::stream::iter([acks(entries)])))
    }
}

pub fn rows(n: usize) -> Vec<RowMutation> {
    (0..n)
        .map(|i| RowMutation::new(format!("row-{i}"), MutationSet::new().set_cell("cf", "q", "v")))
        .collect()
}

pub fn ok(index: i64) -> EntryAck {
    EntryAck::new(index, Status::ok())
}

pub fn failed(index: i64, code: StatusCode, message: &str) -> EntryAck {
    EntryAck::new(index, Status::new(code, message))
}

pub fn acks(entries: Vec<EntryAck>) -> Result<MutateRowsResponse> {
    Ok(MutateRowsResponse::new(entries))
}
