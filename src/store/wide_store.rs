use crate::core::cell::{Cell, RowMutation};
use crate::core::error::{StoreError, StoreResult};
use crate::engine::{Engine, MemoryEngine, Operation};
#[cfg(feature = "redb")]
use crate::engine::RedbEngine;
use crate::store::codec;
use crate::store::scan::{RowScan, ScanSpec};
use crate::store::{StoreClient, TableDescriptor};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

/// Rows kept in the in-process row cache.
const ROW_CACHE_CAPACITY: usize = 4096;

/// Shared (table, row) -> cells cache; the "block cache" the scan knobs
/// control.
pub(crate) type RowCache = Arc<Mutex<LruCache<(String, String), Vec<Cell>>>>;

/// Wide-column store over a storage engine.
pub struct WideStore<E: Engine + 'static> {
    engine: Arc<Mutex<E>>,
    row_cache: RowCache,
}

impl WideStore<MemoryEngine> {
    /// Store keeping all data in memory; lost when dropped.
    pub fn in_memory() -> Self {
        Self::new(MemoryEngine::new())
    }
}

#[cfg(feature = "redb")]
impl WideStore<RedbEngine> {
    /// Open or create a durable store at `path`.
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> StoreResult<Self> {
        Ok(Self::new(RedbEngine::new(path)?))
    }
}

impl<E: Engine + 'static> WideStore<E> {
    pub fn new(engine: E) -> Self {
        let capacity = NonZeroUsize::new(ROW_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            engine: Arc::new(Mutex::new(engine)),
            row_cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    fn now_millis() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    fn descriptor(&self, table: &str) -> StoreResult<Option<TableDescriptor>> {
        let engine = self
            .engine
            .lock()
            .map_err(|e| StoreError::DbError(e.to_string()))?;
        match engine.get(&codec::meta_key(table))? {
            Some(raw) => serde_json::from_slice(&raw)
                .map(Some)
                .map_err(|e| StoreError::DeserializeError(e.to_string())),
            None => Ok(None),
        }
    }

    fn require_table(&self, table: &str) -> StoreResult<TableDescriptor> {
        self.descriptor(table)?
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))
    }

    #[cfg(test)]
    fn cached_rows(&self) -> usize {
        self.row_cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }
}

impl<E: Engine + 'static> StoreClient for WideStore<E> {
    fn create_table(&self, descriptor: &TableDescriptor) -> StoreResult<()> {
        let key = codec::meta_key(&descriptor.name);
        let mut engine = self
            .engine
            .lock()
            .map_err(|e| StoreError::DbError(e.to_string()))?;
        if engine.get(&key)?.is_some() {
            return Err(StoreError::TableAlreadyExists(descriptor.name.clone()));
        }
        let raw = serde_json::to_vec(descriptor)
            .map_err(|e| StoreError::SerializeError(e.to_string()))?;
        engine.put(&key, &raw)
    }

    fn table_exists(&self, name: &str) -> StoreResult<bool> {
        let engine = self
            .engine
            .lock()
            .map_err(|e| StoreError::DbError(e.to_string()))?;
        Ok(engine.get(&codec::meta_key(name))?.is_some())
    }

    fn mutate_row(&self, table: &str, mutation: RowMutation) -> StoreResult<()> {
        let descriptor = self.require_table(table)?;
        for write in &mutation.writes {
            if !descriptor.has_family(&write.family) {
                return Err(StoreError::FamilyNotFound {
                    table: table.to_string(),
                    family: write.family.clone(),
                });
            }
        }

        let timestamp = Self::now_millis();
        let ops = mutation
            .writes
            .iter()
            .map(|write| Operation::Put {
                key: codec::cell_key(table, &mutation.row_key, &write.family, &write.qualifier),
                value: codec::encode_cell_value(timestamp, &write.value),
            })
            .collect();

        self.engine
            .lock()
            .map_err(|e| StoreError::DbError(e.to_string()))?
            .batch(ops)?;

        if let Ok(mut cache) = self.row_cache.lock() {
            cache.pop(&(table.to_string(), mutation.row_key.clone()));
        }
        Ok(())
    }

    fn get_row(&self, table: &str, row_key: &str) -> StoreResult<Vec<Cell>> {
        self.require_table(table)?;

        let cache_key = (table.to_string(), row_key.to_string());
        if let Ok(mut cache) = self.row_cache.lock() {
            if let Some(cells) = cache.get(&cache_key) {
                return Ok(cells.clone());
            }
        }

        let start = codec::row_prefix(table, row_key);
        let stop = codec::row_end(table, row_key);
        let pairs = self
            .engine
            .lock()
            .map_err(|e| StoreError::DbError(e.to_string()))?
            .scan_range(&start, Some(&stop), usize::MAX)?;

        let mut cells = Vec::with_capacity(pairs.len());
        for (key, raw) in pairs {
            let (row, family, qualifier) = codec::parse_cell_key(table, &key)?;
            let (timestamp, value) = codec::decode_cell_value(&raw)?;
            cells.push(Cell {
                row_key: row,
                family,
                qualifier,
                value,
                timestamp,
            });
        }

        if !cells.is_empty() {
            if let Ok(mut cache) = self.row_cache.lock() {
                cache.put(cache_key, cells.clone());
            }
        }
        Ok(cells)
    }

    fn get_cell(
        &self,
        table: &str,
        row_key: &str,
        family: &str,
        qualifier: &str,
    ) -> StoreResult<Option<Cell>> {
        self.require_table(table)?;

        let key = codec::cell_key(table, row_key, family, qualifier);
        let raw = self
            .engine
            .lock()
            .map_err(|e| StoreError::DbError(e.to_string()))?
            .get(&key)?;
        match raw {
            Some(raw) => {
                let (timestamp, value) = codec::decode_cell_value(&raw)?;
                Ok(Some(Cell {
                    row_key: row_key.to_string(),
                    family: family.to_string(),
                    qualifier: qualifier.to_string(),
                    value,
                    timestamp,
                }))
            }
            None => Ok(None),
        }
    }

    fn scan(&self, table: &str, spec: ScanSpec) -> StoreResult<RowScan> {
        self.require_table(table)?;
        Ok(RowScan::new(
            self.engine.clone(),
            table,
            spec,
            self.row_cache.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cell::CellWrite;

    fn store_with_table() -> WideStore<MemoryEngine> {
        let store = WideStore::in_memory();
        store
            .create_table(&TableDescriptor::new("t", &["info", "extra"]))
            .expect("Failed to create table");
        store
    }

    fn put_row(store: &WideStore<MemoryEngine>, row: &str, pairs: &[(&str, &str)]) {
        let mut mutation = RowMutation::new(row);
        for (qualifier, value) in pairs {
            mutation.push(CellWrite::new("info", *qualifier, *value));
        }
        store.mutate_row("t", mutation).expect("Failed to mutate row");
    }

    #[test]
    fn test_create_table_not_idempotent() {
        let store = store_with_table();
        let err = store
            .create_table(&TableDescriptor::new("t", &["info"]))
            .expect_err("duplicate create must fail");
        assert!(matches!(err, StoreError::TableAlreadyExists(_)));
        assert!(store.table_exists("t").expect("Failed to check table"));
        assert!(!store.table_exists("u").expect("Failed to check table"));
    }

    #[test]
    fn test_mutate_row_unknown_table_and_family() {
        let store = store_with_table();

        let err = store
            .mutate_row("missing", RowMutation::new("r"))
            .expect_err("unknown table must fail");
        assert!(matches!(err, StoreError::TableNotFound(_)));

        let mut mutation = RowMutation::new("r");
        mutation.push(CellWrite::new("nope", "q", "v"));
        let err = store
            .mutate_row("t", mutation)
            .expect_err("unknown family must fail");
        assert!(matches!(err, StoreError::FamilyNotFound { .. }));
    }

    #[test]
    fn test_get_row_and_cell() {
        let store = store_with_table();
        put_row(&store, "r1", &[("name", "alice"), ("age", "30")]);

        let cells = store.get_row("t", "r1").expect("Failed to get row");
        assert_eq!(cells.len(), 2);
        assert!(cells.iter().all(|c| c.row_key == "r1" && c.family == "info"));

        let cell = store
            .get_cell("t", "r1", "info", "name")
            .expect("Failed to get cell")
            .expect("cell must exist");
        assert_eq!(cell.value_str(), "alice");

        assert!(store
            .get_cell("t", "r1", "info", "nope")
            .expect("Failed to get cell")
            .is_none());
        assert!(store.get_row("t", "absent").expect("Failed to get row").is_empty());
    }

    #[test]
    fn test_scan_batches_never_split_rows() {
        let store = store_with_table();
        for row in ["r1", "r2", "r3", "r4", "r5"] {
            put_row(
                &store,
                row,
                &[("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")],
            );
        }

        // One-row round trips force every row through the hold-back path.
        let scan = store
            .scan("t", ScanSpec::default().with_caching(1))
            .expect("Failed to start scan");
        let rows: Vec<_> = scan
            .collect::<StoreResult<Vec<_>>>()
            .expect("Failed to drain scan");
        assert_eq!(rows.len(), 5);
        for row in &rows {
            assert_eq!(row.cells.len(), 4, "row {} was split", row.row_key);
        }
        let keys: Vec<_> = rows.iter().map(|r| r.row_key.as_str()).collect();
        assert_eq!(keys, vec!["r1", "r2", "r3", "r4", "r5"]);
    }

    #[test]
    fn test_scan_range_bounds() {
        let store = store_with_table();
        for row in ["a", "b", "c", "d"] {
            put_row(&store, row, &[("q", "v")]);
        }

        let scan = store
            .scan("t", ScanSpec::range("a", "c"))
            .expect("Failed to start scan");
        let keys: Vec<_> = scan
            .collect::<StoreResult<Vec<_>>>()
            .expect("Failed to drain scan")
            .into_iter()
            .map(|r| r.row_key)
            .collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_cache_blocks_toggle() {
        let store = store_with_table();
        put_row(&store, "r1", &[("q", "v")]);
        put_row(&store, "r2", &[("q", "v")]);

        let scan = store
            .scan("t", ScanSpec::default().with_cache_blocks(false))
            .expect("Failed to start scan");
        scan.for_each(drop);
        assert_eq!(store.cached_rows(), 0);

        let scan = store
            .scan("t", ScanSpec::default())
            .expect("Failed to start scan");
        scan.for_each(drop);
        assert_eq!(store.cached_rows(), 2);
    }

    #[test]
    fn test_mutation_invalidates_cached_row() {
        let store = store_with_table();
        put_row(&store, "r1", &[("q", "old")]);

        // Prime the cache, overwrite, then read back.
        let _ = store.get_row("t", "r1").expect("Failed to get row");
        put_row(&store, "r1", &[("q", "new")]);
        let cells = store.get_row("t", "r1").expect("Failed to get row");
        assert_eq!(cells[0].value_str(), "new");
    }
}
