//! ColDB - typed record access over an embedded wide-column store.
//!
//! Tables own column families, rows own qualifier/value cells, and typed
//! records move in and out of rows through a static per-type field registry.
//! Point gets, full scans, filtered scans and row-range scans are exposed by
//! `QueryEngine`; table administration by `SchemaAdmin`; connection
//! lifecycle by `ConnectionManager`.

pub mod admin;
pub mod common;
pub mod config;
pub mod connection;
pub mod core;
pub mod engine;
pub mod mapper;
pub mod query;
pub mod store;

pub use crate::admin::SchemaAdmin;
pub use crate::config::StoreConfig;
pub use crate::connection::{Connection, ConnectionManager, StoreContext};
pub use crate::core::error::{
    AdminError, ConnectionError, MappingError, QueryError, StoreError, ValidationError,
};
pub use crate::core::filter::{ColumnValueFilter, CompareOp, FilterList, FilterOperator};
pub use crate::mapper::{Entity, FieldDef, FieldKind};
pub use crate::query::{QueryEngine, RecordScan};
pub use crate::store::{StoreClient, TableDescriptor, WideStore};
