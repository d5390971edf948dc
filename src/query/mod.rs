//! Typed query operations.
//!
//! Every operation validates its identifiers before touching the store,
//! pulls the connection's client, and hands cell/record translation to the
//! mapper. Point lookups on absent rows return `Ok(None)`; scans skip rows
//! that fail to decode instead of aborting.

use crate::connection::Connection;
use crate::core::cell::{Cell, RowMutation};
use crate::core::error::{MappingError, QueryError, QueryResult, ValidationError};
use crate::core::filter::FilterList;
use crate::mapper::{self, Entity};
use crate::store::scan::{RowScan, ScanSpec, RANGE_SCAN_CACHING};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// Typed point and scan operations over a connection.
pub struct QueryEngine<'a> {
    connection: &'a Connection,
}

impl<'a> QueryEngine<'a> {
    pub fn new(connection: &'a Connection) -> Self {
        Self { connection }
    }

    /// Encode `record` under `family` and apply it as one atomic row
    /// mutation. Blank fields are not written; a record with no non-blank
    /// fields is rejected before the store is called.
    pub fn create<T: Entity + 'static>(
        &self,
        record: &T,
        table: &str,
        family: &str,
        row_key: &str,
    ) -> QueryResult<()> {
        require("table name", table)?;
        require("column family", family)?;
        require("row key", row_key)?;

        let writes = mapper::encode(record, family);
        if writes.is_empty() {
            return Err(ValidationError::EmptyRecord.into());
        }
        let mutation = RowMutation {
            row_key: row_key.to_string(),
            writes,
        };
        self.connection.client().mutate_row(table, mutation)?;
        Ok(())
    }

    /// Point lookup through the strict decode path. An absent row is
    /// `Ok(None)`, not an error.
    pub fn get_by_key<T>(&self, table: &str, row_key: &str) -> QueryResult<Option<T>>
    where
        T: Entity + DeserializeOwned + 'static,
    {
        require("table name", table)?;
        require("row key", row_key)?;

        let cells = self.connection.client().get_row(table, row_key)?;
        Ok(mapper::decode_strict(&cells)?)
    }

    /// Single-cell lookup; `Ok(None)` when the cell is absent.
    pub fn get_column(
        &self,
        table: &str,
        row_key: &str,
        family: &str,
        qualifier: &str,
    ) -> QueryResult<Option<String>> {
        require("table name", table)?;
        require("row key", row_key)?;
        require("column family", family)?;
        require("qualifier", qualifier)?;

        let cell = self
            .connection
            .client()
            .get_cell(table, row_key, family, qualifier)?;
        Ok(cell.map(|c| c.value_str()))
    }

    /// Every cell of a row keyed as `"{family}_{qualifier}"`; empty map
    /// when the row is absent.
    pub fn get_row_map(
        &self,
        table: &str,
        row_key: &str,
    ) -> QueryResult<BTreeMap<String, String>> {
        require("table name", table)?;
        require("row key", row_key)?;

        let cells = self.connection.client().get_row(table, row_key)?;
        Ok(cells
            .into_iter()
            .map(|c| (format!("{}_{}", c.family, c.qualifier), c.value_str()))
            .collect())
    }

    /// Unfiltered full-table scan through the flat decode path.
    pub fn scan_all<T: Entity + 'static>(&self, table: &str) -> QueryResult<RecordScan<T>> {
        require("table name", table)?;
        let rows = self.connection.client().scan(table, ScanSpec::default())?;
        Ok(RecordScan::flat(rows))
    }

    /// Scan with `filter` evaluated by the store before rows come back;
    /// rows decode through the strict path.
    pub fn scan_filtered<T>(&self, table: &str, filter: FilterList) -> QueryResult<RecordScan<T>>
    where
        T: Entity + DeserializeOwned + 'static,
    {
        require("table name", table)?;
        let spec = ScanSpec::default().with_filter(filter);
        let rows = self.connection.client().scan(table, spec)?;
        Ok(RecordScan::strict(rows))
    }

    /// Row-range scan over `[start_row, stop_row)`. Skips block-cache
    /// population and requests a larger per-round-trip batch, both tuned
    /// for large sequential reads.
    pub fn scan_range<T: Entity + 'static>(
        &self,
        table: &str,
        start_row: &str,
        stop_row: &str,
    ) -> QueryResult<RecordScan<T>> {
        require("table name", table)?;
        require("start row", start_row)?;
        require("stop row", stop_row)?;

        let spec = ScanSpec::range(start_row, stop_row)
            .with_cache_blocks(false)
            .with_caching(RANGE_SCAN_CACHING);
        let rows = self.connection.client().scan(table, spec)?;
        Ok(RecordScan::flat(rows))
    }
}

fn require(what: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Blank(what))
    } else {
        Ok(())
    }
}

/// Lazily decoded record sequence over a row scan.
///
/// Zero-cell rows are omitted; rows that fail to decode are skipped with a
/// warning. Finite and non-restartable, like the underlying scan.
pub struct RecordScan<T> {
    rows: RowScan,
    decode_row: fn(&[Cell]) -> Result<Option<T>, MappingError>,
}

impl<T: Entity + 'static> RecordScan<T> {
    fn flat(rows: RowScan) -> Self {
        Self {
            rows,
            decode_row: mapper::decode::<T>,
        }
    }
}

impl<T: Entity + DeserializeOwned + 'static> RecordScan<T> {
    fn strict(rows: RowScan) -> Self {
        Self {
            rows,
            decode_row: mapper::decode_strict::<T>,
        }
    }
}

impl<T> Iterator for RecordScan<T> {
    type Item = QueryResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let row = match self.rows.next()? {
                Ok(row) => row,
                Err(e) => return Some(Err(QueryError::from(e))),
            };
            match (self.decode_row)(&row.cells) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(e) => {
                    log::warn!("skipping row {}: {}", row.row_key, e);
                    continue;
                }
            }
        }
    }
}
