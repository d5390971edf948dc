//! Error types for the record access layer.
//!
//! Layered the same way the operations are: the store and its engines
//! report `StoreError`, each surface component reports its own enum, and
//! `QueryError` aggregates everything a `QueryEngine` call can surface.
//! An absent row is never an error; point lookups return `Ok(None)`.

use thiserror::Error;

/// Result type for store and engine operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for table administration.
pub type AdminResult<T> = Result<T, AdminError>;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Failures inside the wide-column store and its storage engines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("database error: {0}")]
    DbError(String),
    #[error("serialize error: {0}")]
    SerializeError(String),
    #[error("deserialize error: {0}")]
    DeserializeError(String),
    #[error("table not found: {0}")]
    TableNotFound(String),
    #[error("table already exists: {0}")]
    TableAlreadyExists(String),
    #[error("unknown column family {family} in table {table}")]
    FamilyNotFound { table: String, family: String },
    #[error("corrupt cell key: {0}")]
    CorruptKey(String),
    #[error("io error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::IoError(e.to_string())
    }
}

#[cfg(feature = "redb")]
impl From<redb::Error> for StoreError {
    fn from(e: redb::Error) -> Self {
        StoreError::DbError(e.to_string())
    }
}

/// A connection to the store could not be established.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConnectionError {
    #[error("failed to connect to {peer}: {reason}")]
    Establish { peer: String, reason: String },
    #[error("invalid store configuration: {0}")]
    Config(String),
}

/// Table administration failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdminError {
    #[error("invalid table name: {0:?}")]
    InvalidName(String),
    #[error("invalid column family name: {0:?}")]
    InvalidFamily(String),
    #[error("table already exists: {0}")]
    TableAlreadyExists(String),
    #[error("cluster coordination unavailable: {0}")]
    Unavailable(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Record encode/decode failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MappingError {
    #[error("cannot coerce {value:?} into {kind} field {field}")]
    Coercion {
        field: String,
        kind: &'static str,
        value: String,
    },
    #[error("structured decode failed: {0}")]
    Deserialize(String),
}

/// A caller-supplied identifier failed validation. Raised before any store
/// call is made.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0} must not be blank")]
    Blank(&'static str),
    #[error("record has no non-blank fields to write")]
    EmptyRecord,
}

/// Umbrella error for `QueryEngine` operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("mapping error: {0}")]
    Mapping(#[from] MappingError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
