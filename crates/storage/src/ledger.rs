//! Ballot ledger: the vote-casting transaction.
//!
//! A ballot, the voter's has-voted flag, the `voter_ballots` index row, and the
//! candidate's vote count change together in one redb write transaction, or
//! not at all. redb admits a single write transaction at a time, which
//! serializes the check-then-act sequence for every voter.

use ballot_ledger_types::{
    Ballot, BallotId, Candidate, CandidateId, Election, ElectionId, ErrorCode, IntegrityTag, Voter,
    VoterId,
};
use chrono::Utc;
use redb::{ReadableTable, WriteTransaction};
use snafu::{OptionExt, ResultExt, Snafu};
use tracing::{debug, info, instrument, warn};

use crate::{
    engine::StorageEngine,
    error::{CommitSnafu, CounterOverflowSnafu, StorageSnafu, StoreError, TableSnafu},
    rows::{Sequence, get_row, next_id, put_row},
    tables::Tables,
};

/// Outcome of a rejected or failed ballot.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum BallotError {
    /// The voter already has a ballot, or is not registered.
    #[snafu(display("{voter_id} has already voted"))]
    AlreadyVoted {
        /// The voter.
        voter_id: VoterId,
    },

    /// The election is missing or not accepting ballots.
    #[snafu(display("{election_id} is not active"))]
    ElectionNotActive {
        /// The election.
        election_id: ElectionId,
    },

    /// The candidate is missing or stands in another election.
    #[snafu(display("{candidate_id} is not a candidate in {election_id}"))]
    InvalidCandidate {
        /// The candidate.
        candidate_id: CandidateId,
        /// The election the ballot was cast in.
        election_id: ElectionId,
    },

    /// The store failed; nothing was committed.
    #[snafu(display("Store failure: {source}"))]
    Store {
        /// The underlying store error.
        source: StoreError,
    },
}

impl BallotError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::AlreadyVoted { .. } => ErrorCode::AlreadyVoted,
            Self::ElectionNotActive { .. } => ErrorCode::ElectionNotActive,
            Self::InvalidCandidate { .. } => ErrorCode::InvalidCandidate,
            Self::Store { source } => source.code(),
        }
    }
}

impl From<StoreError> for BallotError {
    fn from(source: StoreError) -> Self {
        BallotError::Store { source }
    }
}

/// Records ballots.
#[derive(Clone)]
pub struct BallotLedger {
    engine: StorageEngine,
}

impl BallotLedger {
    /// Creates a ledger over the given engine.
    pub fn new(engine: StorageEngine) -> Self {
        Self { engine }
    }

    /// Casts a ballot for `candidate_id` in `election_id` on behalf of `voter_id`.
    ///
    /// Preconditions are checked in order: the voter has not voted, the
    /// election is active, the candidate belongs to the election. The first
    /// failing check decides the error. No retries are attempted.
    ///
    /// # Errors
    ///
    /// Returns a rejection variant of [`BallotError`] when a precondition
    /// fails and [`BallotError::Store`] when the store fails. In every error
    /// case the store is left exactly as it was.
    #[instrument(skip_all, fields(%voter_id, %candidate_id, %election_id))]
    pub fn cast_ballot(
        &self,
        voter_id: VoterId,
        candidate_id: CandidateId,
        election_id: ElectionId,
    ) -> Result<Ballot, BallotError> {
        let txn = self.engine.begin_write()?;

        match Self::record(&txn, voter_id, candidate_id, election_id) {
            Ok(ballot) => {
                txn.commit().context(CommitSnafu)?;
                info!(ballot_id = %ballot.id, tag = %ballot.integrity_tag, "Ballot recorded");
                Ok(ballot)
            },
            Err(err) => {
                if let Err(abort_err) = txn.abort() {
                    warn!(error = %abort_err, "Failed to abort ballot transaction");
                }
                match &err {
                    BallotError::Store { source } => {
                        warn!(error = %source, "Ballot failed on store error");
                    },
                    rejection => debug!(reason = %rejection, "Ballot rejected"),
                }
                Err(err)
            },
        }
    }

    /// Checks preconditions and stages every write. The caller commits.
    fn record(
        txn: &WriteTransaction,
        voter_id: VoterId,
        candidate_id: CandidateId,
        election_id: ElectionId,
    ) -> Result<Ballot, BallotError> {
        let mut voters = txn.open_table(Tables::VOTERS).context(TableSnafu)?;
        let mut voter_ballots = txn.open_table(Tables::VOTER_BALLOTS).context(TableSnafu)?;
        let elections = txn.open_table(Tables::ELECTIONS).context(TableSnafu)?;
        let mut candidates = txn.open_table(Tables::CANDIDATES).context(TableSnafu)?;
        let mut ballots = txn.open_table(Tables::BALLOTS).context(TableSnafu)?;

        // 1. One ballot per voter, ever
        let voter: Option<Voter> = get_row(&voters, voter_id.value())?;
        let already_recorded =
            voter_ballots.get(voter_id.value()).context(StorageSnafu)?.is_some();
        let mut voter = match voter {
            Some(voter) if !voter.has_voted && !already_recorded => voter,
            _ => return AlreadyVotedSnafu { voter_id }.fail(),
        };

        // 2. Election accepts ballots
        let election: Election = get_row(&elections, election_id.value())?
            .filter(Election::accepts_ballots)
            .context(ElectionNotActiveSnafu { election_id })?;

        // 3. Candidate stands in this election
        let mut candidate: Candidate = get_row(&candidates, candidate_id.value())?
            .filter(|c: &Candidate| c.election_id == election_id)
            .context(InvalidCandidateSnafu { candidate_id, election_id })?;

        let now = Utc::now();
        if !election.is_within_window(now) {
            debug!(
                start = %election.start_date,
                end = %election.end_date,
                "Accepting ballot outside the scheduled window"
            );
        }

        candidate.vote_count = candidate
            .vote_count
            .checked_add(1)
            .context(CounterOverflowSnafu { candidate_id })?;

        let ballot = Ballot {
            id: BallotId::new(next_id(txn, Sequence::Ballot)?),
            voter_id,
            candidate_id,
            election_id,
            timestamp: now,
            integrity_tag: IntegrityTag::generate(),
        };

        voter.has_voted = true;
        voter.updated_at = now;

        put_row(&mut ballots, ballot.id.value(), &ballot)?;
        voter_ballots.insert(voter_id.value(), ballot.id.value()).context(StorageSnafu)?;
        put_row(&mut voters, voter_id.value(), &voter)?;
        put_row(&mut candidates, candidate_id.value(), &candidate)?;

        Ok(ballot)
    }
}
