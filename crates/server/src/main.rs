//! Ballot ledger server binary.
//!
//! # Usage
//!
//! ```bash
//! # Ephemeral server with sample data
//! ballot-ledger --seed-sample-data
//!
//! # Persistent server configured through the environment
//! BALLOT_LEDGER__LISTEN=0.0.0.0:5000 \
//! BALLOT_LEDGER__DATA=/var/lib/ballot-ledger \
//! ballot-ledger --config /etc/ballot-ledger.toml
//!
//! # Print the runtime configuration schema
//! ballot-ledger config schema
//! ```

use std::io::IsTerminal;

use ballot_ledger_server::{
    api,
    bootstrap::{self, BootstrapError},
    config::{self, Cli, CliCommand, Config, ConfigAction, LogFormat},
    shutdown,
};
use clap::Parser;
use snafu::{ResultExt, Snafu};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Top-level error type for the server binary.
#[derive(Debug, Snafu)]
enum ServerError {
    #[snafu(display("bootstrap error: {source}"))]
    Bootstrap { source: BootstrapError },

    #[snafu(display("failed to bind {addr}: {source}"))]
    Bind { addr: std::net::SocketAddr, source: std::io::Error },

    #[snafu(display("server error: {source}"))]
    Serve { source: std::io::Error },
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let cli = Cli::parse();

    if let Some(CliCommand::Config { action }) = cli.command {
        match action {
            ConfigAction::Schema => print!("{}", config::generate_runtime_config_schema()),
            ConfigAction::Example => print!("{}", config::generate_runtime_config_example()),
        }
        return Ok(());
    }

    let config = cli.config;
    init_logging(&config);

    let node = bootstrap::bootstrap(&config).context(BootstrapSnafu)?;

    tracing::info!(
        listen_addr = %config.listen_addr,
        data_dir = %node.data_dir.path().display(),
        session_ttl = %humantime::format_duration(node.runtime.session.ttl),
        "Starting ballot ledger"
    );

    if config.is_localhost_only() {
        tracing::warn!(
            "Listening on localhost only. Remote connections will be rejected. \
             Set --listen or BALLOT_LEDGER__LISTEN to accept remote connections."
        );
    }

    if node.data_dir.is_ephemeral() {
        tracing::warn!(
            data_dir = %node.data_dir.path().display(),
            "Running in ephemeral mode. All data will be lost on shutdown. \
             Set --data or BALLOT_LEDGER__DATA for persistent storage."
        );
    }

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .context(BindSnafu { addr: config.listen_addr })?;

    tracing::info!("Server ready, accepting connections");
    api::serve(listener, node.state, shutdown::shutdown_signal()).await.context(ServeSnafu)?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the logging system.
///
/// Supports three formats:
/// - `Text`: Human-readable format (development)
/// - `Json`: JSON structured logging (production)
/// - `Auto`: JSON for non-TTY stdout, text otherwise
fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = match config.log_format {
        LogFormat::Json => true,
        LogFormat::Text => false,
        LogFormat::Auto => !std::io::stdout().is_terminal(),
    };

    if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().flatten_event(true).with_current_span(false))
            .init();
    } else {
        tracing_subscriber::registry().with(env_filter).with(fmt::layer()).init();
    }
}
