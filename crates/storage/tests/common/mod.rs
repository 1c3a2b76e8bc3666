//! Shared setup for storage integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use ballot_ledger_storage::{BallotLedger, Registry, StatsReader, StorageEngine, TallyReader};
use ballot_ledger_test_utils::fixtures;
use ballot_ledger_types::{CandidateId, ElectionId, VoterId, config::ValidationConfig};

/// Every component over one engine.
pub struct Harness {
    pub engine: StorageEngine,
    pub registry: Registry,
    pub ledger: BallotLedger,
    pub tally: TallyReader,
    pub stats: StatsReader,
}

impl Harness {
    pub fn over(engine: StorageEngine) -> Self {
        Self {
            registry: Registry::new(engine.clone(), ValidationConfig::default()),
            ledger: BallotLedger::new(engine.clone()),
            tally: TallyReader::new(engine.clone()),
            stats: StatsReader::new(engine.clone()),
            engine,
        }
    }

    pub fn in_memory() -> Self {
        Self::over(StorageEngine::open_in_memory().expect("open in-memory engine"))
    }

    /// Registers `count` voters numbered from `first`.
    pub fn voters(&self, first: u64, count: u64) -> Vec<VoterId> {
        (first..first + count)
            .map(|n| self.registry.register_voter(fixtures::voter(n)).unwrap().id)
            .collect()
    }

    pub fn election(&self, title: &str, active: bool) -> ElectionId {
        self.registry.create_election(fixtures::election(title, active)).unwrap().id
    }

    pub fn candidates(&self, election: ElectionId, names: &[&str]) -> Vec<CandidateId> {
        names
            .iter()
            .map(|name| self.registry.add_candidate(election, fixtures::candidate(name)).unwrap().id)
            .collect()
    }

    /// Casts `votes[i]` ballots for `candidates[i]` from fresh voters.
    pub fn cast_counts(&self, election: ElectionId, candidates: &[CandidateId], votes: &[u64]) {
        let mut next_voter = 1_000_000;
        for (candidate, &count) in candidates.iter().zip(votes) {
            for voter in self.voters(next_voter, count) {
                self.ledger.cast_ballot(voter, *candidate, election).unwrap();
            }
            next_voter += count;
        }
    }
}
