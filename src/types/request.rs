//! Request and response payloads

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::filter::WireRowFilter;
use super::mutation::{Mutation, ReadModifyWriteRule};
use crate::status::Status;

/// One row's mutations inside a batch write, addressed by its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutateRowsEntry {
    pub row_key: Bytes,
    pub mutations: Vec<Mutation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutateRowsRequest {
    pub table_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_profile_id: Option<String>,
    pub entries: Vec<MutateRowsEntry>,
}

/// Outcome for one entry, correlated to the request solely by `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryAck {
    pub index: i64,
    pub status: Status,
}

impl EntryAck {
    pub fn new(index: i64, status: Status) -> Self {
        Self { index, status }
    }
}

/// One chunk of the streamed batch-write response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutateRowsResponse {
    pub entries: Vec<EntryAck>,
}

impl MutateRowsResponse {
    pub fn new(entries: Vec<EntryAck>) -> Self {
        Self { entries }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutateRowRequest {
    pub table_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_profile_id: Option<String>,
    pub row_key: Bytes,
    pub mutations: Vec<Mutation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckAndMutateRowRequest {
    pub table_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_profile_id: Option<String>,
    pub row_key: Bytes,
    pub predicate_filter: WireRowFilter,
    pub true_mutations: Vec<Mutation>,
    pub false_mutations: Vec<Mutation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckAndMutateRowResponse {
    pub predicate_matched: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadModifyWriteRowRequest {
    pub table_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_profile_id: Option<String>,
    pub row_key: Bytes,
    pub rules: Vec<ReadModifyWriteRule>,
}

/// Read by explicit row keys. An empty key list reads the whole table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadRowsRequest {
    pub table_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_profile_id: Option<String>,
    pub row_keys: Vec<Bytes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<WireRowFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows_limit: Option<u64>,
}
