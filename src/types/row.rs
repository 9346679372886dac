//! Assembled rows returned by reads and read-modify-write calls

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub value: Bytes,
    pub timestamp_micros: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

impl Cell {
    pub fn new(value: impl Into<Bytes>, timestamp_micros: i64) -> Self {
        Self {
            value: value.into(),
            timestamp_micros,
            labels: Vec::new(),
        }
    }
}

/// A whole row: family -> qualifier -> cells, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub key: Bytes,
    pub families: BTreeMap<String, BTreeMap<Bytes, Vec<Cell>>>,
}

impl Row {
    pub fn new(key: impl Into<Bytes>) -> Self {
        Self {
            key: key.into(),
            families: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.families.values().all(|columns| columns.is_empty())
    }

    pub fn push_cell(&mut self, family: impl Into<String>, qualifier: impl Into<Bytes>, cell: Cell) {
        self.families
            .entry(family.into())
            .or_default()
            .entry(qualifier.into())
            .or_default()
            .push(cell);
    }

    pub fn cells(&self, family: &str, qualifier: &[u8]) -> &[Cell] {
        self.families
            .get(family)
            .and_then(|columns| columns.get(qualifier))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The first cell stored for the column, which is the newest.
    pub fn latest(&self, family: &str, qualifier: &[u8]) -> Option<&Cell> {
        self.cells(family, qualifier).first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_lookup() {
        let mut row = Row::new("r1");
        assert!(row.is_empty());
        row.push_cell("cf", "q", Cell::new("new", 2_000));
        row.push_cell("cf", "q", Cell::new("old", 1_000));

        assert!(!row.is_empty());
        assert_eq!(row.cells("cf", b"q").len(), 2);
        assert_eq!(row.latest("cf", b"q").unwrap().value, Bytes::from_static(b"new"));
        assert!(row.cells("cf", b"missing").is_empty());
        assert!(row.latest("other", b"q").is_none());
    }
}
