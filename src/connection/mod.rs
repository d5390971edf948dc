//! Connection lifecycle.
//!
//! One connection per execution context, created lazily from the cluster
//! configuration and cached by its owning `StoreContext` until released.
//! This replaces ambient per-thread storage with explicit ownership: the
//! caller decides where a context lives and when it closes.

use crate::config::StoreConfig;
use crate::core::error::ConnectionError;
use crate::store::{StoreClient, WideStore};
use std::sync::Arc;

/// Live handle to the store.
#[derive(Clone)]
pub struct Connection {
    client: Arc<dyn StoreClient>,
    peer: String,
}

impl Connection {
    pub fn client(&self) -> &dyn StoreClient {
        self.client.as_ref()
    }

    /// The configured cluster location this connection was built from.
    pub fn peer(&self) -> &str {
        &self.peer
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection").field("peer", &self.peer).finish()
    }
}

/// Builds connections from cluster configuration.
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    config: StoreConfig,
}

impl ConnectionManager {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// A fresh execution context holding no connection yet.
    pub fn context(&self) -> StoreContext {
        StoreContext {
            manager: self.clone(),
            connection: None,
        }
    }

    fn establish(&self) -> Result<Connection, ConnectionError> {
        let peer = format!("{}:{}", self.config.quorum, self.config.client_port);
        log::info!("establishing store connection to {}", peer);

        let client: Arc<dyn StoreClient> = if self.config.in_memory {
            Arc::new(WideStore::in_memory())
        } else {
            #[cfg(feature = "redb")]
            {
                if self.config.storage_path.trim().is_empty() {
                    return Err(ConnectionError::Config(
                        "storage_path must not be empty in file mode".to_string(),
                    ));
                }
                let store = WideStore::open(&self.config.storage_path).map_err(|e| {
                    ConnectionError::Establish {
                        peer: peer.clone(),
                        reason: e.to_string(),
                    }
                })?;
                Arc::new(store)
            }
            #[cfg(not(feature = "redb"))]
            {
                return Err(ConnectionError::Config(
                    "file-backed storage requires the redb feature".to_string(),
                ));
            }
        };

        Ok(Connection { client, peer })
    }
}

/// Execution-context-scoped connection cache.
pub struct StoreContext {
    manager: ConnectionManager,
    connection: Option<Connection>,
}

impl StoreContext {
    /// The context's connection, established on first use and cached for
    /// the lifetime of the context. Never retried internally.
    pub fn connection(&mut self) -> Result<&Connection, ConnectionError> {
        match self.connection {
            Some(ref connection) => Ok(connection),
            None => {
                let connection = self.manager.establish()?;
                Ok(self.connection.insert(connection))
            }
        }
    }

    /// Whether this context currently holds a connection.
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Release the cached connection. No-op when none exists.
    pub fn close(&mut self) {
        if let Some(connection) = self.connection.take() {
            log::info!("closing store connection to {}", connection.peer());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_is_lazy_and_cached() {
        let manager = ConnectionManager::new(StoreConfig::memory());
        let mut context = manager.context();
        assert!(!context.is_connected());

        let first = context.connection().expect("Failed to connect").clone();
        assert!(context.is_connected());

        let second = context.connection().expect("Failed to connect").clone();
        assert!(Arc::ptr_eq(&first.client, &second.client));
    }

    #[test]
    fn test_close_releases_and_is_idempotent() {
        let manager = ConnectionManager::new(StoreConfig::memory());
        let mut context = manager.context();

        context.close();
        assert!(!context.is_connected());

        context.connection().expect("Failed to connect");
        context.close();
        assert!(!context.is_connected());
        context.close();
    }

    #[test]
    fn test_contexts_do_not_share_connections() {
        let manager = ConnectionManager::new(StoreConfig::memory());
        let mut first = manager.context();
        let mut second = manager.context();

        let a = first.connection().expect("Failed to connect").clone();
        let b = second.connection().expect("Failed to connect").clone();
        assert!(!Arc::ptr_eq(&a.client, &b.client));
    }

    #[test]
    fn test_peer_reflects_configuration() {
        let mut config = StoreConfig::memory();
        config.quorum = "zk1,zk2".to_string();
        config.client_port = 2181;
        let mut context = ConnectionManager::new(config).context();
        let connection = context.connection().expect("Failed to connect");
        assert_eq!(connection.peer(), "zk1,zk2:2181");
    }
}
