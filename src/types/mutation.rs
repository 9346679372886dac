//! Cell-level mutations and read-modify-write rules

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Half-open `[start, end)` range of cell timestamps in microseconds.
/// A missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_timestamp_micros: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_timestamp_micros: Option<i64>,
}

impl TimestampRange {
    pub const fn new(start: Option<i64>, end: Option<i64>) -> Self {
        Self {
            start_timestamp_micros: start,
            end_timestamp_micros: end,
        }
    }

    /// Truncate to the service's millisecond granularity: the start is rounded
    /// down and the end rounded up, so the range never shrinks.
    pub fn to_millisecond_granularity(self) -> Self {
        Self {
            start_timestamp_micros: self
                .start_timestamp_micros
                .map(|s| s.saturating_sub(s.rem_euclid(1000))),
            end_timestamp_micros: self.end_timestamp_micros.map(|e| match e.rem_euclid(1000) {
                0 => e,
                rem => e.saturating_add(1000 - rem),
            }),
        }
    }
}

/// One change applied to a single row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Mutation {
    /// Write a cell. A timestamp of `-1` asks the service to assign one.
    SetCell {
        family_name: String,
        column_qualifier: Bytes,
        timestamp_micros: i64,
        value: Bytes,
    },
    DeleteFromColumn {
        family_name: String,
        column_qualifier: Bytes,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time_range: Option<TimestampRange>,
    },
    DeleteFromFamily {
        family_name: String,
    },
    DeleteFromRow,
}

/// One read-modify-write step on a single column. A rule either appends or
/// increments, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReadModifyWriteRule {
    AppendValue {
        family_name: String,
        column_qualifier: Bytes,
        append_value: Bytes,
    },
    IncrementAmount {
        family_name: String,
        column_qualifier: Bytes,
        increment_amount: i64,
    },
}

impl ReadModifyWriteRule {
    pub fn family_name(&self) -> &str {
        match self {
            Self::AppendValue { family_name, .. } | Self::IncrementAmount { family_name, .. } => {
                family_name
            }
        }
    }

    pub fn column_qualifier(&self) -> &Bytes {
        match self {
            Self::AppendValue {
                column_qualifier, ..
            }
            | Self::IncrementAmount {
                column_qualifier, ..
            } => column_qualifier,
        }
    }
}
