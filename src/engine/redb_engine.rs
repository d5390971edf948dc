use super::{Engine, Operation};
use crate::core::error::{StoreError, StoreResult};
use redb::{Database, ReadableTable, TableDefinition, TypeName};
use std::cmp::Ordering;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ByteKey(pub Vec<u8>);

impl redb::Key for ByteKey {
    fn compare(data1: &[u8], data2: &[u8]) -> Ordering {
        data1.cmp(data2)
    }
}

impl redb::Value for ByteKey {
    type SelfType<'a> = ByteKey where Self: 'a;
    type AsBytes<'a> = Vec<u8> where Self: 'a;

    fn fixed_width() -> Option<usize> {
        None
    }

    fn from_bytes<'a>(data: &'a [u8]) -> ByteKey
    where
        Self: 'a,
    {
        ByteKey(data.to_vec())
    }

    fn as_bytes<'a, 'b: 'a>(value: &'a Self::SelfType<'b>) -> Vec<u8>
    where
        Self: 'b,
    {
        value.0.clone()
    }

    fn type_name() -> TypeName {
        TypeName::new("coldb::ByteKey")
    }
}

const DATA_TABLE: TableDefinition<ByteKey, ByteKey> = TableDefinition::new("cells");

/// Durable engine over a single redb database file.
pub struct RedbEngine {
    db: Database,
}

impl RedbEngine {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> StoreResult<Self> {
        let db = Database::create(path.as_ref())
            .map_err(|e| StoreError::DbError(e.to_string()))?;

        let write_txn = db
            .begin_write()
            .map_err(|e| StoreError::DbError(e.to_string()))?;
        {
            write_txn
                .open_table(DATA_TABLE)
                .map_err(|e| StoreError::DbError(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::DbError(e.to_string()))?;

        Ok(Self { db })
    }
}

impl Engine for RedbEngine {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StoreError::DbError(e.to_string()))?;
        let table = read_txn
            .open_table(DATA_TABLE)
            .map_err(|e| StoreError::DbError(e.to_string()))?;

        match table
            .get(ByteKey(key.to_vec()))
            .map_err(|e| StoreError::DbError(e.to_string()))?
        {
            Some(value) => Ok(Some(value.value().0.clone())),
            None => Ok(None),
        }
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::DbError(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(DATA_TABLE)
                .map_err(|e| StoreError::DbError(e.to_string()))?;
            table
                .insert(ByteKey(key.to_vec()), ByteKey(value.to_vec()))
                .map_err(|e| StoreError::DbError(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::DbError(e.to_string()))?;
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> StoreResult<()> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::DbError(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(DATA_TABLE)
                .map_err(|e| StoreError::DbError(e.to_string()))?;
            table
                .remove(ByteKey(key.to_vec()))
                .map_err(|e| StoreError::DbError(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::DbError(e.to_string()))?;
        Ok(())
    }

    fn scan_range(
        &self,
        start: &[u8],
        stop: Option<&[u8]>,
        limit: usize,
    ) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>> {
        if let Some(stop) = stop {
            if stop <= start {
                return Ok(Vec::new());
            }
        }

        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StoreError::DbError(e.to_string()))?;
        let table = read_txn
            .open_table(DATA_TABLE)
            .map_err(|e| StoreError::DbError(e.to_string()))?;

        let range = match stop {
            Some(stop) => table.range(ByteKey(start.to_vec())..ByteKey(stop.to_vec())),
            None => table.range(ByteKey(start.to_vec())..),
        }
        .map_err(|e| StoreError::DbError(e.to_string()))?;

        let mut pairs = Vec::new();
        for item in range.take(limit) {
            let (key, value) = item.map_err(|e| StoreError::DbError(e.to_string()))?;
            pairs.push((key.value().0, value.value().0));
        }
        Ok(pairs)
    }

    fn batch(&mut self, ops: Vec<Operation>) -> StoreResult<()> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::DbError(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(DATA_TABLE)
                .map_err(|e| StoreError::DbError(e.to_string()))?;

            for op in ops {
                match op {
                    Operation::Put { key, value } => {
                        table
                            .insert(ByteKey(key), ByteKey(value))
                            .map_err(|e| StoreError::DbError(e.to_string()))?;
                    }
                    Operation::Delete { key } => {
                        table
                            .remove(ByteKey(key))
                            .map_err(|e| StoreError::DbError(e.to_string()))?;
                    }
                }
            }
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::DbError(e.to_string()))?;
        Ok(())
    }
}
