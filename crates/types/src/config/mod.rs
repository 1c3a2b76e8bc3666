//! Configuration types for the ballot ledger.
//!
//! Configuration is loaded from an optional TOML file and CLI flags.
//! All config structs validate their values at construction time via
//! fallible builders. Post-deserialization validation is available via
//! the `validate()` method on each struct.

// The schemars `JsonSchema` derive macro internally uses `.unwrap()` in its
// expansions.
#![allow(clippy::disallowed_methods)]

mod runtime;
mod session;
mod storage;
mod validation;

pub use runtime::*;
pub use session::*;
use snafu::Snafu;
pub use storage::*;
pub use validation::*;

/// Configuration error.
#[derive(Debug, Snafu)]
pub enum ConfigError {
    /// A configuration value is invalid.
    #[snafu(display("invalid config: {message}"))]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// The configuration document could not be parsed or rendered.
    #[snafu(display("malformed config: {message}"))]
    Parse {
        /// Parser message.
        message: String,
    },

    /// The configuration file could not be read.
    #[snafu(display("unreadable config: {message}"))]
    Io {
        /// Path and I/O error.
        message: String,
    },
}

/// Duration serialization using humantime format.
mod humantime_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
