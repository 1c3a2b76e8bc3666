//! Bearer session configuration.

use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Shortest accepted session lifetime.
const MIN_TTL: Duration = Duration::from_secs(60);

/// Longest accepted session lifetime (30 days).
const MAX_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Session lifetime settings.
///
/// Durations are written in humantime form in TOML (`ttl = "24h"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SessionConfig {
    /// How long an issued bearer token stays valid.
    #[serde(default = "default_ttl")]
    #[serde(with = "super::humantime_serde")]
    #[schemars(with = "String")]
    pub ttl: Duration,
}

#[bon::bon]
impl SessionConfig {
    /// Creates a new session configuration with validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if `ttl` is outside 1 minute to 30 days.
    #[builder]
    pub fn new(#[builder(default = default_ttl())] ttl: Duration) -> Result<Self, ConfigError> {
        let config = Self { ttl };
        config.validate()?;
        Ok(config)
    }
}

impl SessionConfig {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if `ttl` is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ttl < MIN_TTL || self.ttl > MAX_TTL {
            return Err(ConfigError::Validation {
                message: format!(
                    "ttl must be between {} and {}, got {}",
                    humantime::format_duration(MIN_TTL),
                    humantime::format_duration(MAX_TTL),
                    humantime::format_duration(self.ttl)
                ),
            });
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { ttl: default_ttl() }
    }
}

fn default_ttl() -> Duration {
    Duration::from_secs(24 * 60 * 60)
}
