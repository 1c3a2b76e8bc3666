//! Server bootstrap.
//!
//! Resolves the data directory, loads the runtime configuration, opens the
//! storage engine, and optionally seeds sample data and an administrator.

use std::path::{Path, PathBuf};

use ballot_ledger_storage::{Registry, RegistryError, StorageEngine, StoreError};
use ballot_ledger_types::{
    AdminRole, NewAdmin, NewCandidate, NewElection,
    config::{ConfigError, RuntimeConfig},
};
use chrono::{Duration, Utc};
use snafu::{ResultExt, Snafu};
use tempfile::TempDir;

use crate::{config::Config, state::AppState};

/// Email of the administrator created with `--seed-sample-data`.
pub const SAMPLE_ADMIN_EMAIL: &str = "admin@voting.gov.in";

/// Password of the administrator created with `--seed-sample-data`.
pub const SAMPLE_ADMIN_PASSWORD: &str = "admin123";

/// Bootstrap failure.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum BootstrapError {
    /// The data directory could not be created.
    #[snafu(display("Failed to prepare data directory {path}: {source}"))]
    DataDir {
        /// Directory path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The runtime configuration is unusable.
    #[snafu(display("Failed to load configuration: {source}"))]
    Config {
        /// Underlying config error.
        source: ConfigError,
    },

    /// The storage engine could not be opened.
    #[snafu(display("Failed to open storage: {source}"))]
    Open {
        /// Underlying store error.
        source: StoreError,
    },

    /// Sample data or the bootstrap administrator could not be written.
    #[snafu(display("Failed to seed data: {source}"))]
    Seed {
        /// Underlying registry error.
        source: RegistryError,
    },
}

/// Where the database lives.
#[derive(Debug)]
pub enum DataDir {
    /// A directory the operator chose.
    Persistent(PathBuf),
    /// A temporary directory removed on drop.
    Ephemeral(TempDir),
}

impl DataDir {
    /// Directory path.
    pub fn path(&self) -> &Path {
        match self {
            DataDir::Persistent(path) => path,
            DataDir::Ephemeral(dir) => dir.path(),
        }
    }

    /// Whether data is lost when the server exits.
    pub fn is_ephemeral(&self) -> bool {
        matches!(self, DataDir::Ephemeral(_))
    }
}

/// A fully wired server, ready to serve.
pub struct Bootstrapped {
    /// Handler state.
    pub state: AppState,
    /// The data directory. Dropping an ephemeral one deletes the database.
    pub data_dir: DataDir,
    /// The runtime configuration in effect.
    pub runtime: RuntimeConfig,
}

/// Creates the configured data directory, or a temporary one.
///
/// # Errors
///
/// Returns [`BootstrapError::DataDir`] if the directory cannot be created.
pub fn resolve_data_dir(config: &Config) -> Result<DataDir, BootstrapError> {
    match &config.data_dir {
        Some(path) => {
            std::fs::create_dir_all(path)
                .context(DataDirSnafu { path: path.display().to_string() })?;
            Ok(DataDir::Persistent(path.clone()))
        },
        None => {
            let dir = tempfile::Builder::new()
                .prefix("ballot-ledger-")
                .tempdir()
                .context(DataDirSnafu { path: std::env::temp_dir().display().to_string() })?;
            Ok(DataDir::Ephemeral(dir))
        },
    }
}

/// Opens storage and wires the handler state.
///
/// # Errors
///
/// Returns a [`BootstrapError`] describing the first step that failed.
pub fn bootstrap(config: &Config) -> Result<Bootstrapped, BootstrapError> {
    let runtime = config.load_runtime_config().context(ConfigSnafu)?;
    let data_dir = resolve_data_dir(config)?;

    let db_path = data_dir.path().join(&runtime.storage.file_name);
    let engine = StorageEngine::open(&db_path, &runtime.storage).context(OpenSnafu)?;
    tracing::info!(db_path = %db_path.display(), "Storage engine opened");

    let state = AppState::new(engine, &runtime);

    if config.seed_sample_data {
        seed_sample_data(&state.registry).context(SeedSnafu)?;
    }
    if let Some((email, password)) = config.admin_credentials() {
        ensure_admin(&state.registry, email, "Administrator", password).context(SeedSnafu)?;
    }

    Ok(Bootstrapped { state, data_dir, runtime })
}

/// Creates a sample election with three candidates and the sample
/// administrator. Does nothing when any election already exists.
///
/// Returns whether data was written.
///
/// # Errors
///
/// Returns [`RegistryError`] if a write fails.
pub fn seed_sample_data(registry: &Registry) -> Result<bool, RegistryError> {
    if !registry.list_elections()?.is_empty() {
        tracing::info!("Store already holds elections, skipping sample data");
        return Ok(false);
    }

    let start = Utc::now();
    let election = registry.create_election(
        NewElection::builder()
            .title("General Election 2024")
            .description("National General Election for Parliamentary Constituencies")
            .start_date(start)
            .end_date(start + Duration::days(1))
            .is_active(true)
            .constituency("Delhi Central")
            .build(),
    )?;

    let candidates = [
        (
            "Rajesh Kumar",
            "Indian National Congress",
            "Hand",
            "Experienced leader with focus on education and healthcare",
        ),
        (
            "Priya Sharma",
            "Bharatiya Janata Party",
            "Lotus",
            "Young leader committed to digital transformation",
        ),
        ("Amit Singh", "Aam Aadmi Party", "Broom", "Anti-corruption activist and social reformer"),
    ];
    for (name, party, symbol, description) in candidates {
        registry.add_candidate(
            election.id,
            NewCandidate::builder()
                .name(name)
                .party(party)
                .symbol(symbol)
                .description(description)
                .build(),
        )?;
    }

    ensure_admin(registry, SAMPLE_ADMIN_EMAIL, "Election Officer", SAMPLE_ADMIN_PASSWORD)?;

    tracing::info!(election_id = %election.id, "Seeded sample data");
    Ok(true)
}

/// Creates a super-admin unless one with `email` exists.
fn ensure_admin(
    registry: &Registry,
    email: &str,
    name: &str,
    password: &str,
) -> Result<(), RegistryError> {
    if registry.find_admin_by_email(email)?.is_some() {
        tracing::debug!(email, "Administrator already exists");
        return Ok(());
    }
    let admin = registry.create_admin(
        NewAdmin::builder()
            .email(email)
            .name(name)
            .role(AdminRole::SuperAdmin)
            .password(password)
            .build(),
    )?;
    tracing::info!(admin_id = %admin.id, "Created administrator");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_ephemeral_data_dir_is_removed_on_drop() {
        let config = Config::for_test();
        let dir = resolve_data_dir(&config).unwrap();
        assert!(dir.is_ephemeral());
        let path = dir.path().to_path_buf();
        assert!(path.is_dir());
        drop(dir);
        assert!(!path.exists());
    }

    #[test]
    fn test_persistent_data_dir_is_created() {
        let parent = tempfile::tempdir().unwrap();
        let mut config = Config::for_test();
        config.data_dir = Some(parent.path().join("nested/data"));

        let dir = resolve_data_dir(&config).unwrap();
        assert!(!dir.is_ephemeral());
        assert!(dir.path().is_dir());
    }

    #[test]
    fn test_bootstrap_seeds_once() {
        let parent = tempfile::tempdir().unwrap();
        let mut config = Config::for_test();
        config.data_dir = Some(parent.path().to_path_buf());
        config.seed_sample_data = true;

        {
            let node = bootstrap(&config).unwrap();
            let elections = node.state.registry.list_active_elections().unwrap();
            assert_eq!(elections.len(), 1);
            let candidates = node.state.registry.list_candidates(elections[0].id).unwrap();
            let names: Vec<_> = candidates.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(names, ["Amit Singh", "Priya Sharma", "Rajesh Kumar"]);
            assert!(node
                .state
                .registry
                .authenticate_admin(SAMPLE_ADMIN_EMAIL, SAMPLE_ADMIN_PASSWORD)
                .unwrap()
                .is_some());
        }

        let node = bootstrap(&config).unwrap();
        assert!(!seed_sample_data(&node.state.registry).unwrap());
        assert_eq!(node.state.registry.list_elections().unwrap().len(), 1);
    }

    #[test]
    fn test_bootstrap_admin_credentials() {
        let mut config = Config::for_test();
        config.admin_email = Some("officer@example.org".to_string());
        config.admin_password = Some("hunter22".to_string());

        let node = bootstrap(&config).unwrap();
        assert!(node.data_dir.is_ephemeral());
        let registry = &node.state.registry;
        assert!(registry.authenticate_admin("officer@example.org", "hunter22").unwrap().is_some());

        // a second run with the same credentials is a no-op
        ensure_admin(registry, "officer@example.org", "Administrator", "hunter22").unwrap();
    }

    #[test]
    fn test_bootstrap_rejects_bad_config_file() {
        let mut config = Config::for_test();
        config.config_file = Some(PathBuf::from("/nonexistent/ballot-ledger.toml"));
        assert!(matches!(bootstrap(&config), Err(BootstrapError::Config { .. })));
    }
}
