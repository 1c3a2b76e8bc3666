//! Input limits applied at registration and admin management.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ConfigError;

const fn default_min_voter_age() -> u32 {
    18
}

const fn default_national_id_digits() -> usize {
    12
}

const fn default_phone_digits() -> usize {
    10
}

const fn default_max_text_bytes() -> usize {
    512
}

/// Input validation limits.
///
/// Controls the voter eligibility age, the exact digit counts of national
/// ids and phone numbers, and the byte limit for free-text fields.
///
/// # Example
///
/// ```no_run
/// # use ballot_ledger_types::config::ValidationConfig;
/// let config = ValidationConfig::builder()
///     .min_voter_age(21)
///     .build()
///     .expect("valid validation config");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationConfig {
    /// Minimum age in whole years on the registration date. Default: 18.
    #[serde(default = "default_min_voter_age")]
    pub min_voter_age: u32,
    /// Exact number of ASCII digits in a national id. Default: 12.
    #[serde(default = "default_national_id_digits")]
    pub national_id_digits: usize,
    /// Exact number of ASCII digits in a phone number. Default: 10.
    #[serde(default = "default_phone_digits")]
    pub phone_digits: usize,
    /// Maximum UTF-8 length of names, titles, addresses and descriptions.
    ///
    /// Must be >= 1. Default: 512.
    #[serde(default = "default_max_text_bytes")]
    pub max_text_bytes: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_voter_age: default_min_voter_age(),
            national_id_digits: default_national_id_digits(),
            phone_digits: default_phone_digits(),
            max_text_bytes: default_max_text_bytes(),
        }
    }
}

#[bon::bon]
impl ValidationConfig {
    /// Creates a new validation configuration, verifying all limits are positive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if a digit count or the text limit is zero.
    #[builder]
    pub fn new(
        #[builder(default = default_min_voter_age())] min_voter_age: u32,
        #[builder(default = default_national_id_digits())] national_id_digits: usize,
        #[builder(default = default_phone_digits())] phone_digits: usize,
        #[builder(default = default_max_text_bytes())] max_text_bytes: usize,
    ) -> Result<Self, ConfigError> {
        let config = Self { min_voter_age, national_id_digits, phone_digits, max_text_bytes };
        config.validate()?;
        Ok(config)
    }
}

impl ValidationConfig {
    /// Validates the limits after deserialization.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any limit is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.national_id_digits == 0 {
            return Err(ConfigError::Validation {
                message: "national_id_digits must be > 0".to_string(),
            });
        }
        if self.phone_digits == 0 {
            return Err(ConfigError::Validation {
                message: "phone_digits must be > 0".to_string(),
            });
        }
        if self.max_text_bytes == 0 {
            return Err(ConfigError::Validation {
                message: "max_text_bytes must be > 0".to_string(),
            });
        }
        Ok(())
    }
}
