//! Storage engine seam.
//!
//! The wide-column store is written against this trait. `RedbEngine`
//! provides durable file-backed storage; `MemoryEngine` backs memory mode
//! and tests.

use crate::core::error::StoreResult;

pub mod memory_engine;
#[cfg(feature = "redb")]
pub mod redb_engine;

pub use memory_engine::MemoryEngine;
#[cfg(feature = "redb")]
pub use redb_engine::RedbEngine;

/// Ordered byte-keyed key-value engine.
pub trait Engine: Send + Sync {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;
    fn put(&mut self, key: &[u8], value: &[u8]) -> StoreResult<()>;
    fn delete(&mut self, key: &[u8]) -> StoreResult<()>;

    /// Ascending scan over `[start, stop)`, returning at most `limit`
    /// key-value pairs. `stop = None` leaves the range open-ended.
    fn scan_range(
        &self,
        start: &[u8],
        stop: Option<&[u8]>,
        limit: usize,
    ) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>>;

    /// Apply all operations in one storage transaction.
    fn batch(&mut self, ops: Vec<Operation>) -> StoreResult<()>;
}

pub enum Operation {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}
