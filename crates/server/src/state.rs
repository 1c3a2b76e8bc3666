//! Shared handler state.

use ballot_ledger_storage::{BallotLedger, Registry, StatsReader, StorageEngine, TallyReader};
use ballot_ledger_types::config::RuntimeConfig;

use crate::session::SessionStore;

/// Everything a handler needs, cheaply cloneable.
///
/// Each component holds a handle to the same storage engine.
#[derive(Clone)]
pub struct AppState {
    /// Voters, elections, candidates and administrators.
    pub registry: Registry,
    /// The atomic cast-ballot path.
    pub ledger: BallotLedger,
    /// Election results.
    pub tally: TallyReader,
    /// Dashboard and voting history.
    pub stats: StatsReader,
    /// Bearer sessions.
    pub sessions: SessionStore,
}

impl AppState {
    /// Wires every component over `engine`.
    pub fn new(engine: StorageEngine, config: &RuntimeConfig) -> Self {
        Self {
            registry: Registry::new(engine.clone(), config.validation.clone()),
            ledger: BallotLedger::new(engine.clone()),
            tally: TallyReader::new(engine.clone()),
            stats: StatsReader::new(engine),
            sessions: SessionStore::new(&config.session),
        }
    }
}
