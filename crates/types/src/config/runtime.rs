//! File-backed runtime configuration.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{ConfigError, SessionConfig, StorageConfig, ValidationConfig};

/// Settings loaded from the optional `--config` TOML file.
///
/// Every section is optional; missing sections fall back to their defaults.
///
/// ```toml
/// [storage]
/// cache_size_bytes = 67108864
///
/// [session]
/// ttl = "24h"
///
/// [validation]
/// min_voter_age = 18
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RuntimeConfig {
    /// Storage engine settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Bearer session settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Input validation limits.
    #[serde(default)]
    pub validation: ValidationConfig,
}

impl RuntimeConfig {
    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::Validation`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.storage.validate()?;
        self.session.validate()?;
        self.validation.validate()?;
        Ok(())
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Validation`] for out-of-range values.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse { message: e.to_string() })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise the
    /// errors of [`RuntimeConfig::from_toml_str`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            message: format!("{}: {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse { message: e.to_string() })
    }

    /// Returns the JSON schema for the configuration file.
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(RuntimeConfig)).unwrap_or_default()
    }
}
