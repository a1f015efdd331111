//! Configuration constants and types for the audio stego store.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Size of the canonical WAV header preserved verbatim.
pub const HEADER_SIZE: usize = 44;

/// Extension appended to every content key.
pub const CONTAINER_EXTENSION: &str = "wav";

/// Default storage root, relative to the working directory.
pub const DEFAULT_STORAGE_PATH: &str = "files_storage";

/// Default number of events fetched per batch.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Default upper bound on a single audio download.
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 30;

/// Default pause between polls when the event source is idle.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Maximum batch size accepted by the consumer.
pub const MAX_BATCH_SIZE: usize = 100;

/// Layout of the on-disk container store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Root directory holding one subdirectory per user.
    pub root: PathBuf,

    /// Fixed container header length in bytes.
    #[serde(default = "default_header_size")]
    pub header_size: usize,

    /// File extension for stored containers.
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_header_size() -> usize {
    HEADER_SIZE
}

fn default_extension() -> String {
    CONTAINER_EXTENSION.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_STORAGE_PATH),
            header_size: HEADER_SIZE,
            extension: CONTAINER_EXTENSION.to_string(),
        }
    }
}

impl StoreConfig {
    /// Create a store configuration rooted at `root` with default layout.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(Error::Config("Storage root must not be empty".to_string()));
        }
        if self.extension.is_empty() || self.extension.contains(['/', '\\', '.']) {
            return Err(Error::Config(format!(
                "Invalid container extension: {:?}",
                self.extension
            )));
        }
        Ok(())
    }
}

/// Configuration for the event processing loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Container store layout.
    #[serde(default)]
    pub store: StoreConfig,

    /// Events fetched per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Sleep between polls of an empty event source.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Timeout for a single audio download.
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,

    /// Return the user to idle once a hidden file has been delivered.
    /// When false the next plain text is again treated as text to hide.
    #[serde(default = "default_reset_after_delivery")]
    pub reset_after_delivery: bool,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_download_timeout_secs() -> u64 {
    DEFAULT_DOWNLOAD_TIMEOUT_SECS
}

fn default_reset_after_delivery() -> bool {
    true
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            reset_after_delivery: true,
        }
    }
}

impl BotConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BotConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.store.validate()?;
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(Error::Config(format!(
                "Batch size must be between 1 and {}",
                MAX_BATCH_SIZE
            )));
        }
        if self.download_timeout_secs == 0 {
            return Err(Error::Config(
                "Download timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_is_valid() {
        assert!(BotConfig::default().validate().is_ok());
        assert_eq!(StoreConfig::default().header_size, HEADER_SIZE);
    }

    #[test]
    fn test_batch_size_bounds() {
        let mut config = BotConfig::default();
        config.batch_size = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        config.batch_size = MAX_BATCH_SIZE + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_extension_rejected() {
        let mut config = StoreConfig::default();
        config.extension = "../wav".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bot.json");
        std::fs::write(
            &path,
            r#"{"store": {"root": "/tmp/stego"}, "reset_after_delivery": false}"#,
        )
        .unwrap();

        let config = BotConfig::load(&path).unwrap();
        assert_eq!(config.store.root, PathBuf::from("/tmp/stego"));
        assert_eq!(config.store.header_size, HEADER_SIZE);
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert!(!config.reset_after_delivery);
    }
}
