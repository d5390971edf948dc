use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Cluster and backend configuration.
///
/// The quorum endpoints and client port locate the store cluster; this
/// layer treats them as opaque and only hands them to the connection
/// layer at connection-creation time.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoreConfig {
    /// Comma-separated coordination-service quorum endpoints.
    pub quorum: String,
    pub client_port: u16,
    /// Embedded backend location (file mode).
    pub storage_path: String,
    /// Keep all data in memory instead of on disk.
    #[serde(default)]
    pub in_memory: bool,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "coldb".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            quorum: "127.0.0.1".to_string(),
            client_port: 2181,
            storage_path: "data/coldb".to_string(),
            in_memory: false,
            log: LogConfig::default(),
        }
    }
}

impl StoreConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: StoreConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Memory-mode configuration for tests and embedded use.
    pub fn memory() -> Self {
        Self {
            in_memory: true,
            storage_path: String::new(),
            ..Self::default()
        }
    }
}
