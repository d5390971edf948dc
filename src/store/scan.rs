//! Lazy batched row scans.

use crate::core::cell::{Cell, RowCells};
use crate::core::error::{StoreError, StoreResult};
use crate::core::filter::FilterList;
use crate::engine::Engine;
use crate::store::codec;
use crate::store::wide_store::RowCache;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Rows fetched per store round trip for plain scans.
pub const DEFAULT_SCAN_CACHING: usize = 100;

/// Batch hint for large sequential range reads.
pub const RANGE_SCAN_CACHING: usize = 2000;

/// Parameters of one scan request.
#[derive(Debug, Clone)]
pub struct ScanSpec {
    /// First row returned (inclusive); table start when absent.
    pub start_row: Option<String>,
    /// Row the scan stops before (exclusive); table end when absent.
    pub stop_row: Option<String>,
    /// Evaluated by the store before rows are returned.
    pub filter: Option<FilterList>,
    /// Populate the store's row cache with scanned rows.
    pub cache_blocks: bool,
    /// Row batch fetched per store round trip.
    pub caching: usize,
}

impl Default for ScanSpec {
    fn default() -> Self {
        Self {
            start_row: None,
            stop_row: None,
            filter: None,
            cache_blocks: true,
            caching: DEFAULT_SCAN_CACHING,
        }
    }
}

impl ScanSpec {
    pub fn range(start_row: &str, stop_row: &str) -> Self {
        Self {
            start_row: Some(start_row.to_string()),
            stop_row: Some(stop_row.to_string()),
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, filter: FilterList) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_cache_blocks(mut self, cache_blocks: bool) -> Self {
        self.cache_blocks = cache_blocks;
        self
    }

    pub fn with_caching(mut self, caching: usize) -> Self {
        self.caching = caching;
        self
    }
}

/// Lazy, finite, non-restartable sequence of rows.
///
/// Consuming it drives engine round trips of roughly `caching` rows each.
/// A row is never split across round trips: the last, possibly incomplete
/// row of a batch is held back and re-read at the next refill. Dropping the
/// scan abandons whatever range remains.
pub struct RowScan {
    engine: Arc<Mutex<dyn Engine>>,
    table: String,
    prefix_len: usize,
    /// Engine key where the next refill starts; `None` once exhausted.
    next_start: Option<Vec<u8>>,
    stop: Vec<u8>,
    filter: Option<FilterList>,
    caching: usize,
    buffered: VecDeque<RowCells>,
    row_cache: Option<RowCache>,
    failed: bool,
}

impl RowScan {
    pub(crate) fn new(
        engine: Arc<Mutex<dyn Engine>>,
        table: &str,
        spec: ScanSpec,
        cache: RowCache,
    ) -> Self {
        let start = match &spec.start_row {
            Some(row) => codec::row_start(table, row),
            None => codec::table_prefix(table),
        };
        let stop = match &spec.stop_row {
            Some(row) => codec::row_stop(table, row),
            None => codec::table_end(table),
        };
        Self {
            engine,
            table: table.to_string(),
            prefix_len: codec::table_prefix(table).len(),
            next_start: Some(start),
            stop,
            filter: spec.filter,
            caching: spec.caching.max(1),
            buffered: VecDeque::new(),
            row_cache: if spec.cache_blocks { Some(cache) } else { None },
            failed: false,
        }
    }

    /// Complete rows currently fetched: distinct rows minus the last one,
    /// which the next chunk may still be extending.
    fn complete_rows(&self, pairs: &[(Vec<u8>, Vec<u8>)]) -> usize {
        let mut distinct = 0usize;
        let mut last: Option<&[u8]> = None;
        for (key, _) in pairs {
            let row = codec::row_slice(self.prefix_len, key);
            if row != last {
                distinct += 1;
                last = row;
            }
        }
        distinct.saturating_sub(1)
    }

    fn refill(&mut self) -> StoreResult<()> {
        let Some(start) = self.next_start.take() else {
            return Ok(());
        };

        let mut pairs: Vec<(Vec<u8>, Vec<u8>)> = Vec::new();
        let mut cursor = start;
        let mut exhausted = false;
        let fetch = self.caching;

        loop {
            let chunk = {
                let engine = self
                    .engine
                    .lock()
                    .map_err(|e| StoreError::DbError(e.to_string()))?;
                engine.scan_range(&cursor, Some(&self.stop), fetch)?
            };
            if chunk.len() < fetch {
                exhausted = true;
            }
            if let Some((last_key, _)) = chunk.last() {
                // Smallest key strictly greater than the last one fetched.
                cursor = last_key.clone();
                cursor.push(0x00);
            }
            pairs.extend(chunk);
            if exhausted || self.complete_rows(&pairs) >= self.caching {
                break;
            }
        }

        let mut rows: Vec<RowCells> = Vec::new();
        for (key, raw) in pairs {
            let (row_key, family, qualifier) = codec::parse_cell_key(&self.table, &key)?;
            let (timestamp, value) = codec::decode_cell_value(&raw)?;
            let cell = Cell {
                row_key: row_key.clone(),
                family,
                qualifier,
                value,
                timestamp,
            };
            match rows.last_mut() {
                Some(current) if current.row_key == row_key => current.cells.push(cell),
                _ => rows.push(RowCells {
                    row_key,
                    cells: vec![cell],
                }),
            }
        }

        if exhausted {
            self.next_start = None;
        } else if let Some(held_back) = rows.pop() {
            // Re-read the boundary row in full on the next round trip.
            self.next_start = Some(codec::row_prefix(&self.table, &held_back.row_key));
        } else {
            self.next_start = None;
        }

        for row in rows {
            if let Some(cache) = &self.row_cache {
                if let Ok(mut cache) = cache.lock() {
                    cache.put(
                        (self.table.clone(), row.row_key.clone()),
                        row.cells.clone(),
                    );
                }
            }
            if let Some(filter) = &self.filter {
                if !filter.accepts(&row.cells) {
                    continue;
                }
            }
            self.buffered.push_back(row);
        }
        Ok(())
    }
}

impl Iterator for RowScan {
    type Item = StoreResult<RowCells>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(row) = self.buffered.pop_front() {
                return Some(Ok(row));
            }
            self.next_start.as_ref()?;
            if let Err(e) = self.refill() {
                self.failed = true;
                return Some(Err(e));
            }
        }
    }
}
