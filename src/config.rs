//! Store configuration.
//!
//! ```
//! use nearword::config::{StoreConfig, SyncPolicy};
//!
//! # fn example() -> nearword::error::Result<()> {
//! let config = StoreConfig::builder()
//!     .data_dir("/var/lib/nearword")
//!     .log_file("words.log")
//!     .sync_policy(SyncPolicy::Always)
//!     .build()?;
//! assert_eq!(config.log_file, "words.log");
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NearwordError, Result};
use crate::storage::StorageConfig;

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "logs.txt";

/// How hard each log append pushes its bytes toward the disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncPolicy {
    /// Flush the userspace buffer to the OS after every append.
    #[default]
    Flush,
    /// Flush and `fsync` after every append.
    Always,
}

/// Configuration for a [`Store`](crate::store::Store).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the log and its lock file.
    pub data_dir: PathBuf,

    /// Log file name inside `data_dir`.
    pub log_file: String,

    /// Durability of each append.
    pub sync_policy: SyncPolicy,

    /// Buffer size for log I/O.
    pub buffer_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            data_dir: PathBuf::from("."),
            log_file: DEFAULT_LOG_FILE.to_string(),
            sync_policy: SyncPolicy::default(),
            buffer_size: StorageConfig::default().buffer_size,
        }
    }
}

impl StoreConfig {
    /// Create a new builder for StoreConfig.
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }

    /// Load a JSON configuration file; missing keys take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            NearwordError::invalid_config(format!(
                "cannot read {}: {e}",
                path.as_ref().display()
            ))
        })?;
        let config: StoreConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the store cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.log_file.is_empty() {
            return Err(NearwordError::invalid_config("log_file must not be empty"));
        }
        if self.log_file.contains(['/', '\\']) {
            return Err(NearwordError::invalid_config(format!(
                "log_file '{}' must be a plain file name; use data_dir for the directory",
                self.log_file
            )));
        }
        if self.buffer_size == 0 {
            return Err(NearwordError::invalid_config("buffer_size must be positive"));
        }
        Ok(())
    }

    /// Storage-level settings derived from this configuration.
    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig {
            buffer_size: self.buffer_size,
        }
    }
}

/// Builder for [`StoreConfig`].
#[derive(Debug, Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    pub fn data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.config.data_dir = data_dir.into();
        self
    }

    pub fn log_file(mut self, log_file: impl Into<String>) -> Self {
        self.config.log_file = log_file.into();
        self
    }

    pub fn sync_policy(mut self, sync_policy: SyncPolicy) -> Self {
        self.config.sync_policy = sync_policy;
        self
    }

    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.config.buffer_size = buffer_size;
        self
    }

    pub fn build(self) -> Result<StoreConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("."));
        assert_eq!(config.log_file, "logs.txt");
        assert_eq!(config.sync_policy, SyncPolicy::Flush);
        assert_eq!(config.buffer_size, 65536);
    }

    #[test]
    fn test_builder_validates() {
        assert!(StoreConfig::builder().log_file("").build().is_err());
        assert!(StoreConfig::builder().log_file("a/b.txt").build().is_err());
        assert!(StoreConfig::builder().buffer_size(0).build().is_err());

        let config = StoreConfig::builder()
            .sync_policy(SyncPolicy::Always)
            .buffer_size(128)
            .build()
            .unwrap();
        assert_eq!(config.sync_policy, SyncPolicy::Always);
        assert_eq!(config.storage_config().buffer_size, 128);
    }

    #[test]
    fn test_from_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nearword.json");
        std::fs::write(&path, r#"{"log_file": "words.log", "sync_policy": "always"}"#).unwrap();

        let config = StoreConfig::from_json_file(&path).unwrap();
        assert_eq!(config.log_file, "words.log");
        assert_eq!(config.sync_policy, SyncPolicy::Always);
        assert_eq!(config.buffer_size, 65536);
    }

    #[test]
    fn test_from_json_file_errors() {
        let dir = TempDir::new().unwrap();
        assert!(StoreConfig::from_json_file(dir.path().join("missing.json")).is_err());

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            StoreConfig::from_json_file(&path),
            Err(NearwordError::Json(_))
        ));
    }
}
