use super::{Engine, Operation};
use crate::core::error::StoreResult;
use std::collections::BTreeMap;
use std::ops::Bound;

/// BTreeMap-backed engine for memory mode and tests.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Engine for MemoryEngine {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> StoreResult<()> {
        self.data.remove(key);
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
        let upper = match stop {
            Some(stop) => Bound::Excluded(stop.to_vec()),
            None => Bound::Unbounded,
        };
        Ok(self
            .data
            .range((Bound::Included(start.to_vec()), upper))
            .take(limit)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn batch(&mut self, ops: Vec<Operation>) -> StoreResult<()> {
        for op in ops {
            match op {
                Operation::Put { key, value } => {
                    self.data.insert(key, value);
                }
                Operation::Delete { key } => {
                    self.data.remove(&key);
                }
            }
        }
        Ok(())
    }
}
