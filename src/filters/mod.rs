//! Row filters
//!
//! [`RowFilter`] is the caller-facing filter expression. It is turned into the
//! wire form through [`CompileFilter::compile`], which is pure and stateless.
//!
//! ```rust
//! use widecolumn_client::filters::{CompileFilter, RowFilter};
//!
//! let filter = RowFilter::chain([
//!     RowFilter::family_name_regex("stats"),
//!     RowFilter::cells_per_column_limit(1),
//! ]);
//! let wire = filter.compile();
//! ```

use bytes::Bytes;
use std::ops::Bound;

use crate::error::{ClientError, Result};
use crate::types::{TimestampRange, ValueBound, WireRowFilter};

/// Anything that compiles to a wire filter.
pub trait CompileFilter: Send + Sync {
    fn compile(&self) -> WireRowFilter;
}

impl CompileFilter for WireRowFilter {
    fn compile(&self) -> WireRowFilter {
        self.clone()
    }
}

/// Filter expression over rows, columns and cells.
#[derive(Debug, Clone, PartialEq)]
pub enum RowFilter {
    PassAll,
    BlockAll,
    /// Output the cells matched so far and stop evaluating the chain
    Sink,
    StripValue,
    RowKeyRegex(Bytes),
    RowSample(f64),
    FamilyNameRegex(String),
    ColumnQualifierRegex(Bytes),
    ValueRegex(Bytes),
    ColumnRange {
        family: String,
        start: Bound<Bytes>,
        end: Bound<Bytes>,
    },
    ValueRange {
        start: Bound<Bytes>,
        end: Bound<Bytes>,
    },
    TimestampRange(TimestampRange),
    CellsPerRowOffset(u32),
    CellsPerRowLimit(u32),
    CellsPerColumnLimit(u32),
    ApplyLabel(String),
    Chain(Vec<RowFilter>),
    Interleave(Vec<RowFilter>),
    Condition {
        predicate: Box<RowFilter>,
        true_filter: Option<Box<RowFilter>>,
        false_filter: Option<Box<RowFilter>>,
    },
}

impl RowFilter {
    pub fn row_key_regex(regex: impl Into<Bytes>) -> Self {
        Self::RowKeyRegex(regex.into())
    }

    /// Keep each row with the given probability, which must lie strictly
    /// between 0 and 1.
    pub fn row_sample(probability: f64) -> Result<Self> {
        if probability > 0.0 && probability < 1.0 {
            Ok(Self::RowSample(probability))
        } else {
            Err(ClientError::InvalidInput(format!(
                "row sample probability must be in (0, 1), got {probability}"
            )))
        }
    }

    pub fn family_name_regex(regex: impl Into<String>) -> Self {
        Self::FamilyNameRegex(regex.into())
    }

    pub fn column_qualifier_regex(regex: impl Into<Bytes>) -> Self {
        Self::ColumnQualifierRegex(regex.into())
    }

    pub fn value_regex(regex: impl Into<Bytes>) -> Self {
        Self::ValueRegex(regex.into())
    }

    pub fn column_range(family: impl Into<String>, start: Bound<Bytes>, end: Bound<Bytes>) -> Self {
        Self::ColumnRange {
            family: family.into(),
            start,
            end,
        }
    }

    pub fn value_range(start: Bound<Bytes>, end: Bound<Bytes>) -> Self {
        Self::ValueRange { start, end }
    }

    /// Cells with timestamps in `[start, end)`, widened to millisecond granularity.
    pub fn timestamp_range(start_micros: Option<i64>, end_micros: Option<i64>) -> Self {
        Self::TimestampRange(TimestampRange::new(start_micros, end_micros))
    }

    pub fn cells_per_row_offset(offset: u32) -> Self {
        Self::CellsPerRowOffset(offset)
    }

    pub fn cells_per_row_limit(limit: u32) -> Self {
        Self::CellsPerRowLimit(limit)
    }

    pub fn cells_per_column_limit(limit: u32) -> Self {
        Self::CellsPerColumnLimit(limit)
    }

    pub fn apply_label(label: impl Into<String>) -> Self {
        Self::ApplyLabel(label.into())
    }

    pub fn chain(filters: impl IntoIterator<Item = RowFilter>) -> Self {
        Self::Chain(filters.into_iter().collect())
    }

    pub fn interleave(filters: impl IntoIterator<Item = RowFilter>) -> Self {
        Self::Interleave(filters.into_iter().collect())
    }

    /// Apply `true_filter` to rows matching `predicate` and `false_filter`
    /// to the rest. A missing branch emits nothing for those rows.
    pub fn condition(
        predicate: RowFilter,
        true_filter: Option<RowFilter>,
        false_filter: Option<RowFilter>,
    ) -> Self {
        Self::Condition {
            predicate: Box::new(predicate),
            true_filter: true_filter.map(Box::new),
            false_filter: false_filter.map(Box::new),
        }
    }
}

fn wire_bound(bound: &Bound<Bytes>) -> Option<ValueBound> {
    match bound {
        Bound::Included(value) => Some(ValueBound::Closed(value.clone())),
        Bound::Excluded(value) => Some(ValueBound::Open(value.clone())),
        Bound::Unbounded => None,
    }
}

fn wire_count(count: u32) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

impl CompileFilter for RowFilter {
    fn compile(&self) -> WireRowFilter {
        match self {
            Self::PassAll => WireRowFilter::PassAllFilter,
            Self::BlockAll => WireRowFilter::BlockAllFilter,
            Self::Sink => WireRowFilter::Sink,
            Self::StripValue => WireRowFilter::StripValueTransformer,
            Self::RowKeyRegex(regex) => WireRowFilter::RowKeyRegexFilter(regex.clone()),
            Self::RowSample(probability) => WireRowFilter::RowSampleFilter(*probability),
            Self::FamilyNameRegex(regex) => WireRowFilter::FamilyNameRegexFilter(regex.clone()),
            Self::ColumnQualifierRegex(regex) => {
                WireRowFilter::ColumnQualifierRegexFilter(regex.clone())
            }
            Self::ValueRegex(regex) => WireRowFilter::ValueRegexFilter(regex.clone()),
            Self::ColumnRange { family, start, end } => WireRowFilter::ColumnRangeFilter {
                family_name: family.clone(),
                start_qualifier: wire_bound(start),
                end_qualifier: wire_bound(end),
            },
            Self::ValueRange { start, end } => WireRowFilter::ValueRangeFilter {
                start_value: wire_bound(start),
                end_value: wire_bound(end),
            },
            Self::TimestampRange(range) => {
                WireRowFilter::TimestampRangeFilter(range.to_millisecond_granularity())
            }
            Self::CellsPerRowOffset(n) => WireRowFilter::CellsPerRowOffsetFilter(wire_count(*n)),
            Self::CellsPerRowLimit(n) => WireRowFilter::CellsPerRowLimitFilter(wire_count(*n)),
            Self::CellsPerColumnLimit(n) => {
                WireRowFilter::CellsPerColumnLimitFilter(wire_count(*n))
            }
            Self::ApplyLabel(label) => WireRowFilter::ApplyLabelTransformer(label.clone()),
            Self::Chain(filters) => {
                WireRowFilter::Chain(filters.iter().map(CompileFilter::compile).collect())
            }
            Self::Interleave(filters) => {
                WireRowFilter::Interleave(filters.iter().map(CompileFilter::compile).collect())
            }
            Self::Condition {
                predicate,
                true_filter,
                false_filter,
            } => WireRowFilter::Condition {
                predicate_filter: Box::new(predicate.compile()),
                true_filter: true_filter.as_ref().map(|f| Box::new(f.compile())),
                false_filter: false_filter.as_ref().map(|f| Box::new(f.compile())),
            },
        }
    }
}
