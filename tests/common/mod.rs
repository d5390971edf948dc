//! Shared helpers for integration tests.

pub mod fixtures;

use coldb::{Connection, ConnectionManager, QueryEngine, SchemaAdmin, StoreConfig};
use std::path::Path;

/// Connection backed by a fresh in-memory store.
pub fn memory_connection() -> Connection {
    let mut context = ConnectionManager::new(StoreConfig::memory()).context();
    context.connection().expect("Failed to connect").clone()
}

/// Connection backed by a redb file inside `dir`.
pub fn file_connection(dir: &Path) -> Connection {
    let mut config = StoreConfig::default();
    config.storage_path = dir.join("store.db").to_string_lossy().into_owned();
    let mut context = ConnectionManager::new(config).context();
    context.connection().expect("Failed to connect").clone()
}

/// Create `table` with an `info` family and insert every person, keyed by
/// name.
pub fn seed_people(connection: &Connection, table: &str, people: &[fixtures::Person]) {
    SchemaAdmin::new(connection)
        .create_table(table, &["info"])
        .expect("Failed to create table");
    let engine = QueryEngine::new(connection);
    for person in people {
        engine
            .create(person, table, "info", &person.name)
            .expect("Failed to insert person");
    }
}
