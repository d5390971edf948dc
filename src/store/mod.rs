//! Wide-column store layer.
//!
//! The accessor components talk to `StoreClient`; `WideStore` implements it
//! over any `Engine`. Contract: tables own column families, rows own cells,
//! mutations are atomic per row, scans are lazy and batched with the filter
//! evaluated on the store side of the seam.

pub mod codec;
pub mod scan;
pub mod wide_store;

pub use scan::{RowScan, ScanSpec, DEFAULT_SCAN_CACHING, RANGE_SCAN_CACHING};
pub use wide_store::WideStore;

use crate::core::cell::{Cell, RowMutation};
use crate::core::error::StoreResult;
use serde::{Deserialize, Serialize};

/// A named table owning a fixed set of column families.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub name: String,
    pub families: Vec<String>,
}

impl TableDescriptor {
    pub fn new(name: impl Into<String>, families: &[&str]) -> Self {
        Self {
            name: name.into(),
            families: families.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn has_family(&self, family: &str) -> bool {
        self.families.iter().any(|f| f == family)
    }
}

/// Client-facing surface of the store cluster.
///
/// The accessor layer is written against this trait; whatever protocol sits
/// behind it is opaque.
pub trait StoreClient: Send + Sync {
    /// Create a table. Errors with `StoreError::TableAlreadyExists` when the
    /// name is taken; creation is not idempotent.
    fn create_table(&self, descriptor: &TableDescriptor) -> StoreResult<()>;

    fn table_exists(&self, name: &str) -> StoreResult<bool>;

    /// Apply all cell writes of `mutation` as one atomic row mutation.
    fn mutate_row(&self, table: &str, mutation: RowMutation) -> StoreResult<()>;

    /// All cells of one row, empty when the row is absent.
    fn get_row(&self, table: &str, row_key: &str) -> StoreResult<Vec<Cell>>;

    fn get_cell(
        &self,
        table: &str,
        row_key: &str,
        family: &str,
        qualifier: &str,
    ) -> StoreResult<Option<Cell>>;

    /// Start a lazy scan; rows stream back in row-key order.
    fn scan(&self, table: &str, spec: ScanSpec) -> StoreResult<RowScan>;
}
