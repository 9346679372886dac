//! Wire form of row filters

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::mutation::TimestampRange;

/// Inclusive (`Closed`) or exclusive (`Open`) end of a qualifier or value range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueBound {
    Closed(Bytes),
    Open(Bytes),
}

/// Compiled filter as sent to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireRowFilter {
    Chain(Vec<WireRowFilter>),
    Interleave(Vec<WireRowFilter>),
    Condition {
        predicate_filter: Box<WireRowFilter>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        true_filter: Option<Box<WireRowFilter>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        false_filter: Option<Box<WireRowFilter>>,
    },
    Sink,
    PassAllFilter,
    BlockAllFilter,
    StripValueTransformer,
    RowKeyRegexFilter(Bytes),
    RowSampleFilter(f64),
    FamilyNameRegexFilter(String),
    ColumnQualifierRegexFilter(Bytes),
    ColumnRangeFilter {
        family_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_qualifier: Option<ValueBound>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end_qualifier: Option<ValueBound>,
    },
    TimestampRangeFilter(TimestampRange),
    ValueRegexFilter(Bytes),
    ValueRangeFilter {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_value: Option<ValueBound>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end_value: Option<ValueBound>,
    },
    CellsPerRowOffsetFilter(i32),
    CellsPerRowLimitFilter(i32),
    CellsPerColumnLimitFilter(i32),
    ApplyLabelTransformer(String),
}
