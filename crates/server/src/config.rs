//! Server command line and environment configuration.
//!
//! Every flag can also be set through an environment variable with the
//! `BALLOT_LEDGER__` prefix. CLI arguments override environment variables.
//! Tunables that are not about process wiring (storage cache, session TTL,
//! validation rules) live in [`RuntimeConfig`] and come from the optional
//! `--config` TOML file.

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

use ballot_ledger_types::config::{ConfigError, RuntimeConfig};
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Default listen address.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:5000";

/// Ballot ledger voting server.
#[derive(Debug, Parser)]
#[command(name = "ballot-ledger", version, about)]
pub struct Cli {
    /// Optional subcommand. Without one, the server starts.
    #[command(subcommand)]
    pub command: Option<CliCommand>,

    /// Server settings.
    #[command(flatten)]
    pub config: Config,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Inspect the runtime configuration format.
    Config {
        /// What to print.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Actions of the `config` subcommand.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Print the JSON schema of the runtime configuration file.
    Schema,
    /// Print an example runtime configuration file with default values.
    Example,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text.
    Text,
    /// One JSON object per event.
    Json,
    /// JSON when stdout is not a terminal, text otherwise.
    #[default]
    Auto,
}

/// Process-level server settings.
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Address the HTTP API listens on.
    #[arg(long = "listen", env = "BALLOT_LEDGER__LISTEN", default_value = DEFAULT_LISTEN)]
    pub listen_addr: SocketAddr,

    /// Data directory. When omitted the server runs on an ephemeral
    /// temporary directory that is removed on shutdown.
    #[arg(long = "data", env = "BALLOT_LEDGER__DATA")]
    pub data_dir: Option<PathBuf>,

    /// Log output format.
    #[arg(long, env = "BALLOT_LEDGER__LOG_FORMAT", value_enum, default_value_t = LogFormat::Auto)]
    pub log_format: LogFormat,

    /// Seed a sample election, three candidates and an administrator when
    /// the store holds no elections yet.
    #[arg(long, env = "BALLOT_LEDGER__SEED_SAMPLE_DATA")]
    pub seed_sample_data: bool,

    /// Email of an administrator account to create at startup if missing.
    #[arg(long, env = "BALLOT_LEDGER__ADMIN_EMAIL", requires = "admin_password")]
    pub admin_email: Option<String>,

    /// Password of the bootstrap administrator.
    #[arg(long, env = "BALLOT_LEDGER__ADMIN_PASSWORD", requires = "admin_email", hide_env_values = true)]
    pub admin_password: Option<String>,

    /// Runtime configuration file (TOML).
    #[arg(long = "config", env = "BALLOT_LEDGER__CONFIG")]
    pub config_file: Option<PathBuf>,
}

impl Config {
    /// Settings for tests: loopback on an OS-assigned port, no data directory.
    pub fn for_test() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            data_dir: None,
            log_format: LogFormat::Text,
            seed_sample_data: false,
            admin_email: None,
            admin_password: None,
            config_file: None,
        }
    }

    /// Whether the server will run without a persistent data directory.
    pub fn is_ephemeral(&self) -> bool {
        self.data_dir.is_none()
    }

    /// Whether the listen address only accepts loopback connections.
    pub fn is_localhost_only(&self) -> bool {
        self.listen_addr.ip().is_loopback()
    }

    /// Bootstrap administrator credentials, if both were given.
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => Some((email, password)),
            _ => None,
        }
    }

    /// Loads the runtime configuration from `--config`, or defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load_runtime_config(&self) -> Result<RuntimeConfig, ConfigError> {
        match self.config_file.as_deref() {
            Some(path) => load_file(path),
            None => Ok(RuntimeConfig::default()),
        }
    }
}

fn load_file(path: &Path) -> Result<RuntimeConfig, ConfigError> {
    let config = RuntimeConfig::from_file(path)?;
    tracing::info!(config_file = %path.display(), "Loaded runtime configuration");
    Ok(config)
}

/// Pretty-printed JSON schema of [`RuntimeConfig`].
pub fn generate_runtime_config_schema() -> String {
    let schema = RuntimeConfig::json_schema();
    match serde_json::to_string_pretty(&schema) {
        Ok(mut rendered) => {
            rendered.push('\n');
            rendered
        },
        Err(_) => schema.to_string(),
    }
}

/// Example TOML runtime configuration with every default spelled out.
pub fn generate_runtime_config_example() -> String {
    let body = RuntimeConfig::default().to_toml_string().unwrap_or_default();
    format!(
        "# Ballot ledger runtime configuration.\n\
         # Pass with --config <file> or BALLOT_LEDGER__CONFIG.\n\n{body}"
    )
}
