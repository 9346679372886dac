//! Wire data types
//!
//! Plain request/response payloads exchanged with the transport. They carry no
//! behavior beyond small accessors; builders in [`crate::builders`] and
//! [`crate::filters`] produce them.

pub mod filter;
pub mod mutation;
pub mod request;
pub mod row;

pub use filter::{ValueBound, WireRowFilter};
pub use mutation::{Mutation, ReadModifyWriteRule, TimestampRange};
pub use request::{
    CheckAndMutateRowRequest, CheckAndMutateRowResponse, EntryAck, MutateRowRequest,
    MutateRowsEntry, MutateRowsRequest, MutateRowsResponse, ReadModifyWriteRowRequest,
    ReadRowsRequest,
};
pub use row::{Cell, Row};
