//! Table administration.

use crate::connection::Connection;
use crate::core::error::{AdminError, AdminResult, StoreError};
use crate::store::TableDescriptor;

/// Creates tables and checks their existence over a connection.
pub struct SchemaAdmin<'a> {
    connection: &'a Connection,
}

impl<'a> SchemaAdmin<'a> {
    pub fn new(connection: &'a Connection) -> Self {
        Self { connection }
    }

    /// Create `name` with one column family per entry of `families`.
    /// Everything else (versions, TTL, compression) stays at store defaults.
    ///
    /// Not idempotent: creating an existing table surfaces
    /// `AdminError::TableAlreadyExists`.
    pub fn create_table(&self, name: &str, families: &[&str]) -> AdminResult<()> {
        check_table_name(name)?;
        if families.is_empty() {
            return Err(AdminError::InvalidFamily(String::new()));
        }
        for family in families {
            check_family_name(family)?;
        }

        log::info!("creating table {} with families {:?}", name, families);
        let descriptor = TableDescriptor::new(name, families);
        self.connection
            .client()
            .create_table(&descriptor)
            .map_err(|e| match e {
                StoreError::TableAlreadyExists(table) => AdminError::TableAlreadyExists(table),
                other => AdminError::Store(other),
            })
    }

    pub fn table_exists(&self, name: &str) -> AdminResult<bool> {
        check_table_name(name)?;
        Ok(self.connection.client().table_exists(name)?)
    }
}

/// Table names: non-blank ASCII alphanumerics plus `_`, `-` and `.`,
/// rejected before any store call.
fn check_table_name(name: &str) -> AdminResult<()> {
    if name.trim().is_empty() || !name.chars().all(legal_name_char) {
        return Err(AdminError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn check_family_name(family: &str) -> AdminResult<()> {
    if family.trim().is_empty() || !family.chars().all(legal_name_char) {
        return Err(AdminError::InvalidFamily(family.to_string()));
    }
    Ok(())
}

fn legal_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::connection::ConnectionManager;

    fn connect() -> Connection {
        let mut context = ConnectionManager::new(StoreConfig::memory()).context();
        context.connection().expect("Failed to connect").clone()
    }

    #[test]
    fn test_create_then_exists() {
        let connection = connect();
        let admin = SchemaAdmin::new(&connection);

        assert!(!admin.table_exists("people").expect("Failed to check table"));
        admin
            .create_table("people", &["info"])
            .expect("Failed to create table");
        assert!(admin.table_exists("people").expect("Failed to check table"));
    }

    #[test]
    fn test_duplicate_create_surfaces_already_exists() {
        let connection = connect();
        let admin = SchemaAdmin::new(&connection);
        admin
            .create_table("people", &["info"])
            .expect("Failed to create table");

        let err = admin
            .create_table("people", &["info"])
            .expect_err("duplicate create must fail");
        assert!(matches!(err, AdminError::TableAlreadyExists(_)));
    }

    #[test]
    fn test_malformed_names_rejected_before_store() {
        let connection = connect();
        let admin = SchemaAdmin::new(&connection);

        for bad in ["", "  ", "no spaces", "semi;colon"] {
            let err = admin
                .create_table(bad, &["info"])
                .expect_err("bad name must fail");
            assert!(matches!(err, AdminError::InvalidName(_)), "name {:?}", bad);
        }

        let err = admin
            .create_table("ok", &[])
            .expect_err("empty family list must fail");
        assert!(matches!(err, AdminError::InvalidFamily(_)));

        let err = admin
            .create_table("ok", &["bad family"])
            .expect_err("bad family must fail");
        assert!(matches!(err, AdminError::InvalidFamily(_)));

        // Nothing was created along the way.
        assert!(!admin.table_exists("ok").expect("Failed to check table"));
    }
}
