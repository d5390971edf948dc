//! Cell-level data model: the store's atomic unit and the write shapes
//! built from it.

/// One (row, family, qualifier) -> value datum as returned by the store.
///
/// The timestamp is assigned by the store at write time; the mapper never
/// surfaces it to records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub row_key: String,
    pub family: String,
    pub qualifier: String,
    pub value: Vec<u8>,
    pub timestamp: u64,
}

impl Cell {
    /// Cell value decoded as text. Invalid UTF-8 decodes lossily, matching
    /// the text-serialized write path.
    pub fn value_str(&self) -> String {
        String::from_utf8_lossy(&self.value).into_owned()
    }
}

/// A single pending cell write within one row mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellWrite {
    pub family: String,
    pub qualifier: String,
    pub value: Vec<u8>,
}

impl CellWrite {
    pub fn new(
        family: impl Into<String>,
        qualifier: impl Into<String>,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            family: family.into(),
            qualifier: qualifier.into(),
            value: value.into(),
        }
    }
}

/// All cell writes for one row, applied as a single atomic mutation.
#[derive(Debug, Clone, Default)]
pub struct RowMutation {
    pub row_key: String,
    pub writes: Vec<CellWrite>,
}

impl RowMutation {
    pub fn new(row_key: impl Into<String>) -> Self {
        Self {
            row_key: row_key.into(),
            writes: Vec::new(),
        }
    }

    pub fn push(&mut self, write: CellWrite) {
        self.writes.push(write);
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// The cells of one row as produced by a scan.
#[derive(Debug, Clone)]
pub struct RowCells {
    pub row_key: String,
    pub cells: Vec<Cell>,
}
