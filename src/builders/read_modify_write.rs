//! Read-modify-write requests

use bytes::Bytes;

use super::check_mutation_count;
use crate::error::Result;
use crate::types::ReadModifyWriteRule;

/// Ordered rules applied atomically to one row.
///
/// Rules are kept exactly as added. Two rules on the same column stay two
/// rules; the service applies them in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadModifyWrite {
    row_key: Bytes,
    rules: Vec<ReadModifyWriteRule>,
}

impl ReadModifyWrite {
    pub fn new(row_key: impl Into<Bytes>) -> Self {
        Self {
            row_key: row_key.into(),
            rules: Vec::new(),
        }
    }

    /// Append bytes to the latest cell of the column (an absent cell counts as empty).
    pub fn append_value(
        mut self,
        family: impl Into<String>,
        qualifier: impl Into<Bytes>,
        value: impl Into<Bytes>,
    ) -> Self {
        self.rules.push(ReadModifyWriteRule::AppendValue {
            family_name: family.into(),
            column_qualifier: qualifier.into(),
            append_value: value.into(),
        });
        self
    }

    /// Add to the 8-byte big-endian integer in the latest cell (absent counts as zero).
    pub fn increment_value(
        mut self,
        family: impl Into<String>,
        qualifier: impl Into<Bytes>,
        amount: i64,
    ) -> Self {
        self.rules.push(ReadModifyWriteRule::IncrementAmount {
            family_name: family.into(),
            column_qualifier: qualifier.into(),
            increment_amount: amount,
        });
        self
    }

    pub fn row_key(&self) -> &Bytes {
        &self.row_key
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn compile_rules(&self) -> Vec<ReadModifyWriteRule> {
        self.rules.clone()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        check_mutation_count("read-modify-write", self.rules.len())
    }
}
