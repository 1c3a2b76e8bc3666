//! Tally reader: ranked, percentage-annotated election results.
//!
//! Results are recomputed from the candidates' running counters on every
//! call inside one MVCC read transaction, so a tally never mixes two commits.

use ballot_ledger_types::{
    Ballot, Candidate, CandidateResult, ElectionId, ElectionResults, rounded_percentage,
};
use redb::ReadableTable;
use snafu::{OptionExt, ResultExt};
use tracing::instrument;

use crate::{
    engine::StorageEngine,
    error::{CorruptedSnafu, Result, StorageSnafu, TableSnafu},
    keys::election_candidate_bounds,
    rows::{get_row, scan_rows},
    tables::Tables,
};

/// Read-only projection over candidate counters and ballots.
#[derive(Clone)]
pub struct TallyReader {
    engine: StorageEngine,
}

impl TallyReader {
    /// Creates a reader over the given engine.
    pub fn new(engine: StorageEngine) -> Self {
        Self { engine }
    }

    /// Returns the ranked results of `election_id`.
    ///
    /// An unknown election yields an empty result list with zero votes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::StoreError) if the store cannot be read.
    #[instrument(skip_all, fields(%election_id))]
    pub fn get_results(&self, election_id: ElectionId) -> Result<ElectionResults> {
        let txn = self.engine.begin_read()?;
        let index = txn.open_table(Tables::ELECTION_CANDIDATES).context(TableSnafu)?;
        let candidates = txn.open_table(Tables::CANDIDATES).context(TableSnafu)?;

        let (start, end) = election_candidate_bounds(election_id);
        let mut rows = Vec::new();
        for entry in index.range(&start[..]..=&end[..]).context(StorageSnafu)? {
            let (_, candidate_id) = entry.context(StorageSnafu)?;
            let candidate_id = candidate_id.value();
            let candidate: Candidate = get_row(&candidates, candidate_id)?.context(
                CorruptedSnafu { message: format!("indexed candidate {candidate_id} missing") },
            )?;
            rows.push(candidate);
        }

        Ok(project(election_id, &rows))
    }

    /// Counts the ballots recorded for `election_id`.
    ///
    /// Always equals the sum of the election's vote counts; exposed so the
    /// invariant can be audited.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::StoreError) if the store cannot be read.
    pub fn count_ballots(&self, election_id: ElectionId) -> Result<u64> {
        let txn = self.engine.begin_read()?;
        let ballots = txn.open_table(Tables::BALLOTS).context(TableSnafu)?;
        let all: Vec<Ballot> = scan_rows(&ballots, false)?;
        Ok(all.iter().filter(|b| b.election_id == election_id).count() as u64)
    }
}

/// Projects candidates (in insertion order) onto ranked results.
///
/// Rows are ordered by descending vote count with ties left in insertion
/// order. Percentages are rounded independently and may not sum to 100.
pub fn project(election_id: ElectionId, candidates: &[Candidate]) -> ElectionResults {
    let total_votes = candidates.iter().fold(0u64, |acc, c| acc.saturating_add(c.vote_count));

    let mut results: Vec<CandidateResult> = candidates
        .iter()
        .map(|c| CandidateResult {
            candidate_id: c.id,
            candidate_name: c.name.clone(),
            party: c.party.clone(),
            symbol: c.symbol.clone(),
            vote_count: c.vote_count,
            percentage: rounded_percentage(c.vote_count, total_votes),
        })
        .collect();
    // sort_by is stable
    results.sort_by(|a, b| b.vote_count.cmp(&a.vote_count));

    ElectionResults { results, total_votes, election_id }
}
