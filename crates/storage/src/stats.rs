//! Dashboard statistics and per-voter ballot history.

use ballot_ledger_types::{
    Ballot, BallotReceipt, Candidate, DashboardStats, Election, VoterId, rounded_percentage,
};
use redb::{ReadableTable, ReadableTableMetadata};
use snafu::{OptionExt, ResultExt};

use crate::{
    engine::StorageEngine,
    error::{CorruptedSnafu, Result, StorageSnafu, TableSnafu},
    rows::{get_row, scan_rows},
    tables::Tables,
};

/// Number of ballots shown on the dashboard.
pub const RECENT_BALLOTS: usize = 10;

/// Joins a ballot with its candidate and election.
fn receipt<C, E>(ballot: Ballot, candidates: &C, elections: &E) -> Result<BallotReceipt>
where
    C: ReadableTable<u64, &'static [u8]>,
    E: ReadableTable<u64, &'static [u8]>,
{
    let candidate: Candidate = get_row(candidates, ballot.candidate_id.value())?.context(
        CorruptedSnafu { message: format!("{} references missing candidate", ballot.id) },
    )?;
    let election: Election = get_row(elections, ballot.election_id.value())?.context(
        CorruptedSnafu { message: format!("{} references missing election", ballot.id) },
    )?;
    Ok(BallotReceipt {
        id: ballot.id,
        timestamp: ballot.timestamp,
        integrity_tag: ballot.integrity_tag,
        candidate_name: candidate.name,
        candidate_party: candidate.party,
        election_title: election.title,
    })
}

/// Aggregate read views.
#[derive(Clone)]
pub struct StatsReader {
    engine: StorageEngine,
}

impl StatsReader {
    /// Creates a reader over the given engine.
    pub fn new(engine: StorageEngine) -> Self {
        Self { engine }
    }

    /// Computes the administrator dashboard from one consistent snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::StoreError) if the store cannot be read.
    pub fn dashboard(&self) -> Result<DashboardStats> {
        let txn = self.engine.begin_read()?;
        let voters = txn.open_table(Tables::VOTERS).context(TableSnafu)?;
        let ballots = txn.open_table(Tables::BALLOTS).context(TableSnafu)?;
        let candidates = txn.open_table(Tables::CANDIDATES).context(TableSnafu)?;
        let elections = txn.open_table(Tables::ELECTIONS).context(TableSnafu)?;

        let total_voters = voters.len().context(StorageSnafu)?;
        let total_votes = ballots.len().context(StorageSnafu)?;

        let mut recent_votes = Vec::with_capacity(RECENT_BALLOTS);
        for entry in ballots.iter().context(StorageSnafu)?.rev().take(RECENT_BALLOTS) {
            let (_, value) = entry.context(StorageSnafu)?;
            let ballot: Ballot = ballot_ledger_types::decode(value.value())?;
            recent_votes.push(receipt(ballot, &candidates, &elections)?);
        }

        let mut active: Vec<Election> = scan_rows(&elections, true)?;
        active.retain(Election::accepts_ballots);

        Ok(DashboardStats {
            total_voters,
            total_votes,
            turnout_percentage: rounded_percentage(total_votes, total_voters),
            active_elections: active.len(),
            recent_votes,
            elections: active,
        })
    }

    /// Returns the ballots cast by `voter_id`, newest first. Holds at most one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`](crate::StoreError) if the store cannot be read.
    pub fn voting_history(&self, voter_id: VoterId) -> Result<Vec<BallotReceipt>> {
        let txn = self.engine.begin_read()?;
        let index = txn.open_table(Tables::VOTER_BALLOTS).context(TableSnafu)?;
        let ballot_id = match index.get(voter_id.value()).context(StorageSnafu)? {
            Some(guard) => guard.value(),
            None => return Ok(Vec::new()),
        };

        let ballots = txn.open_table(Tables::BALLOTS).context(TableSnafu)?;
        let candidates = txn.open_table(Tables::CANDIDATES).context(TableSnafu)?;
        let elections = txn.open_table(Tables::ELECTIONS).context(TableSnafu)?;
        let ballot: Ballot = get_row(&ballots, ballot_id)?
            .context(CorruptedSnafu { message: format!("{voter_id} indexes missing ballot") })?;
        Ok(vec![receipt(ballot, &candidates, &elections)?])
    }
}
