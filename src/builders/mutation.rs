//! Mutation sets and per-row mutations

use bytes::Bytes;

use super::check_mutation_count;
use crate::defaults::SERVER_TIMESTAMP;
use crate::error::Result;
use crate::types::{MutateRowsEntry, Mutation, TimestampRange};

/// Anything that compiles to an ordered list of wire mutations.
pub trait CompileMutations: Send + Sync {
    fn compile(&self) -> Vec<Mutation>;
}

/// Ordered list of changes for one row.
///
/// ```rust
/// use widecolumn_client::builders::MutationSet;
///
/// let set = MutationSet::new()
///     .set_cell("cf", "greeting", "hello")
///     .delete_cells("cf", ["stale"]);
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationSet {
    mutations: Vec<Mutation>,
}

impl MutationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a cell with a service-assigned timestamp.
    pub fn set_cell(
        self,
        family: impl Into<String>,
        qualifier: impl Into<Bytes>,
        value: impl Into<Bytes>,
    ) -> Self {
        self.push_set_cell(family.into(), qualifier.into(), value.into(), SERVER_TIMESTAMP)
    }

    /// Write a cell at an explicit timestamp, truncated to milliseconds.
    pub fn set_cell_at(
        self,
        family: impl Into<String>,
        qualifier: impl Into<Bytes>,
        value: impl Into<Bytes>,
        timestamp_micros: i64,
    ) -> Self {
        let truncated = timestamp_micros.saturating_sub(timestamp_micros.rem_euclid(1000));
        self.push_set_cell(family.into(), qualifier.into(), value.into(), truncated)
    }

    /// Write an integer as an 8-byte big-endian value, the encoding
    /// read-modify-write increments operate on.
    pub fn set_cell_i64(
        self,
        family: impl Into<String>,
        qualifier: impl Into<Bytes>,
        value: i64,
    ) -> Self {
        let encoded = Bytes::copy_from_slice(&value.to_be_bytes());
        self.push_set_cell(family.into(), qualifier.into(), encoded, SERVER_TIMESTAMP)
    }

    fn push_set_cell(
        mut self,
        family_name: String,
        column_qualifier: Bytes,
        value: Bytes,
        timestamp_micros: i64,
    ) -> Self {
        self.mutations.push(Mutation::SetCell {
            family_name,
            column_qualifier,
            timestamp_micros,
            value,
        });
        self
    }

    /// Delete every version of one column.
    pub fn delete_cell(self, family: impl Into<String>, qualifier: impl Into<Bytes>) -> Self {
        self.push_delete_column(family.into(), qualifier.into(), None)
    }

    /// Delete the versions of one column within a timestamp range.
    pub fn delete_cell_in_range(
        self,
        family: impl Into<String>,
        qualifier: impl Into<Bytes>,
        range: TimestampRange,
    ) -> Self {
        self.push_delete_column(
            family.into(),
            qualifier.into(),
            Some(range.to_millisecond_granularity()),
        )
    }

    fn push_delete_column(
        mut self,
        family_name: String,
        column_qualifier: Bytes,
        time_range: Option<TimestampRange>,
    ) -> Self {
        self.mutations.push(Mutation::DeleteFromColumn {
            family_name,
            column_qualifier,
            time_range,
        });
        self
    }

    /// Delete several columns of one family, one mutation per column.
    pub fn delete_cells<Q>(self, family: impl Into<String>, qualifiers: impl IntoIterator<Item = Q>) -> Self
    where
        Q: Into<Bytes>,
    {
        let family = family.into();
        qualifiers.into_iter().fold(self, |set, qualifier| {
            set.push_delete_column(family.clone(), qualifier.into(), None)
        })
    }

    /// Delete every column of a family.
    pub fn delete_family(mut self, family: impl Into<String>) -> Self {
        self.mutations.push(Mutation::DeleteFromFamily {
            family_name: family.into(),
        });
        self
    }

    /// Delete the whole row.
    pub fn delete_row(mut self) -> Self {
        self.mutations.push(Mutation::DeleteFromRow);
        self
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn as_slice(&self) -> &[Mutation] {
        &self.mutations
    }
}

impl CompileMutations for MutationSet {
    fn compile(&self) -> Vec<Mutation> {
        self.mutations.clone()
    }
}

impl FromIterator<Mutation> for MutationSet {
    fn from_iter<T: IntoIterator<Item = Mutation>>(iter: T) -> Self {
        Self {
            mutations: iter.into_iter().collect(),
        }
    }
}

/// The mutations destined for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMutation {
    row_key: Bytes,
    mutations: MutationSet,
}

impl RowMutation {
    pub fn new(row_key: impl Into<Bytes>, mutations: MutationSet) -> Self {
        Self {
            row_key: row_key.into(),
            mutations,
        }
    }

    pub fn row_key(&self) -> &Bytes {
        &self.row_key
    }

    pub fn mutations(&self) -> &MutationSet {
        &self.mutations
    }

    /// Wire entry for a batch write. Fails when the row carries more
    /// mutations than a single request may hold.
    pub fn to_entry(&self) -> Result<MutateRowsEntry> {
        check_mutation_count("row mutation", self.mutations.len())?;
        Ok(MutateRowsEntry {
            row_key: self.row_key.clone(),
            mutations: self.mutations.compile(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::limits::MAX_MUTATIONS;
    use crate::error::ClientError;

    #[test]
    fn set_cell_uses_server_timestamp() {
        let set = MutationSet::new().set_cell("cf", "q", "v");
        assert_eq!(
            set.as_slice(),
            &[Mutation::SetCell {
                family_name: "cf".into(),
                column_qualifier: Bytes::from_static(b"q"),
                timestamp_micros: -1,
                value: Bytes::from_static(b"v"),
            }]
        );
    }

    #[test]
    fn explicit_timestamp_is_truncated_to_milliseconds() {
        let set = MutationSet::new().set_cell_at("cf", "q", "v", 1_700_000_123_456);
        match &set.as_slice()[0] {
            Mutation::SetCell {
                timestamp_micros, ..
            } => assert_eq!(*timestamp_micros, 1_700_000_123_000),
            other => panic!("unexpected mutation: {other:?}"),
        }
    }

    #[test]
    fn negative_extreme_timestamp_saturates() {
        let set = MutationSet::new()
            .set_cell_at("cf", "q", "v", i64::MIN)
            .set_cell_at("cf", "q", "v", -1_500);
        let timestamps: Vec<i64> = set
            .as_slice()
            .iter()
            .map(|m| match m {
                Mutation::SetCell {
                    timestamp_micros, ..
                } => *timestamp_micros,
                other => panic!("unexpected mutation: {other:?}"),
            })
            .collect();
        assert_eq!(timestamps, vec![i64::MIN, -2_000]);
    }

    #[test]
    fn integer_values_are_big_endian() {
        let set = MutationSet::new().set_cell_i64("cf", "counter", 258);
        match &set.as_slice()[0] {
            Mutation::SetCell { value, .. } => {
                assert_eq!(value.as_ref(), &[0, 0, 0, 0, 0, 0, 1, 2])
            }
            other => panic!("unexpected mutation: {other:?}"),
        }
    }

    #[test]
    fn delete_cells_emits_one_mutation_per_column_in_order() {
        let set = MutationSet::new()
            .delete_cells("cf", ["a", "b"])
            .delete_family("old")
            .delete_row();
        assert_eq!(set.len(), 4);
        assert!(matches!(
            &set.as_slice()[1],
            Mutation::DeleteFromColumn { column_qualifier, time_range: None, .. }
                if column_qualifier.as_ref() == b"b"
        ));
        assert_eq!(set.as_slice()[3], Mutation::DeleteFromRow);
    }

    #[test]
    fn ranged_delete_is_widened_to_milliseconds() {
        let set = MutationSet::new().delete_cell_in_range(
            "cf",
            "q",
            TimestampRange::new(Some(10_500), Some(20_500)),
        );
        assert!(matches!(
            &set.as_slice()[0],
            Mutation::DeleteFromColumn { time_range: Some(range), .. }
                if *range == TimestampRange::new(Some(10_000), Some(21_000))
        ));
    }

    #[test]
    fn entry_preserves_key_and_mutations() {
        let row = RowMutation::new("row-1", MutationSet::new().set_cell("cf", "q", "v"));
        let entry = row.to_entry().unwrap();
        assert_eq!(entry.row_key, Bytes::from_static(b"row-1"));
        assert_eq!(entry.mutations, row.mutations().compile());
    }

    #[test]
    fn oversized_row_is_rejected() {
        let set: MutationSet = std::iter::repeat_n(Mutation::DeleteFromRow, MAX_MUTATIONS + 1).collect();
        let err = RowMutation::new("big", set).to_entry().unwrap_err();
        assert!(matches!(err, ClientError::InvalidInput(_)));
    }
}
