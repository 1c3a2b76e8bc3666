//! Storage engine configuration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Minimum cache size: 1 MB.
const MIN_CACHE_SIZE_BYTES: usize = 1024 * 1024;

/// redb storage configuration.
///
/// # Validation Rules
///
/// - `cache_size_bytes` must be >= 1 MB (1,048,576 bytes)
///
/// # Example
///
/// ```no_run
/// # use ballot_ledger_types::config::StorageConfig;
/// let config = StorageConfig::builder()
///     .cache_size_bytes(128 * 1024 * 1024)
///     .build()
///     .expect("valid storage config");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StorageConfig {
    /// Page cache size handed to redb, in bytes.
    #[serde(default = "default_cache_size")]
    pub cache_size_bytes: usize,
    /// File name of the database inside the data directory.
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

#[bon::bon]
impl StorageConfig {
    /// Creates a new storage configuration with validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if `cache_size_bytes` < 1 MB or
    /// `file_name` is empty.
    #[builder]
    pub fn new(
        #[builder(default = default_cache_size())] cache_size_bytes: usize,
        #[builder(into, default = default_file_name())] file_name: String,
    ) -> Result<Self, ConfigError> {
        let config = Self { cache_size_bytes, file_name };
        config.validate()?;
        Ok(config)
    }
}

impl StorageConfig {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any value is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_size_bytes < MIN_CACHE_SIZE_BYTES {
            return Err(ConfigError::Validation {
                message: format!(
                    "cache_size_bytes must be >= {} (1 MB), got {}",
                    MIN_CACHE_SIZE_BYTES, self.cache_size_bytes
                ),
            });
        }
        if self.file_name.trim().is_empty() {
            return Err(ConfigError::Validation {
                message: "file_name must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { cache_size_bytes: default_cache_size(), file_name: default_file_name() }
    }
}

fn default_cache_size() -> usize {
    64 * 1024 * 1024 // 64 MB
}

fn default_file_name() -> String {
    "ballot-ledger.redb".to_string()
}
