pub mod cell;
pub mod error;
pub mod filter;

pub use cell::{Cell, CellWrite, RowCells, RowMutation};
pub use error::{
    AdminError, AdminResult, ConnectionError, MappingError, QueryError, QueryResult, StoreError,
    StoreResult, ValidationError,
};
pub use filter::{ColumnValueFilter, CompareOp, FilterList, FilterOperator};
