//! Store-level error type shared by every storage component.

use ballot_ledger_types::{CandidateId, CodecError, ErrorCode};
use snafu::Snafu;

/// Failures of the underlying redb store.
///
/// Every variant is a fault: business-rule outcomes live in
/// [`BallotError`](crate::BallotError) and [`RegistryError`](crate::RegistryError).
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StoreError {
    /// The database file could not be opened or created.
    #[snafu(display("Failed to open database at {path}: {source}"))]
    Open {
        /// Location of the database file.
        path: String,
        /// The underlying redb error.
        source: redb::DatabaseError,
    },

    /// A read or write against a table failed.
    #[snafu(display("Storage error: {source}"))]
    Storage {
        /// The underlying redb error.
        source: redb::StorageError,
    },

    /// A table could not be opened.
    #[snafu(display("Table error: {source}"))]
    Table {
        /// The underlying redb error.
        source: redb::TableError,
    },

    /// A transaction could not be started.
    #[snafu(display("Transaction error: {source}"))]
    Transaction {
        /// The underlying redb error.
        source: redb::TransactionError,
    },

    /// A write transaction failed to commit.
    #[snafu(display("Commit error: {source}"))]
    Commit {
        /// The underlying redb error.
        source: redb::CommitError,
    },

    /// A stored row could not be encoded or decoded.
    #[snafu(display("Codec error: {source}"))]
    Codec {
        /// The underlying codec error.
        source: CodecError,
    },

    /// Incrementing a candidate's vote count would overflow.
    #[snafu(display("Vote count overflow for {candidate_id}"))]
    CounterOverflow {
        /// The candidate whose counter is saturated.
        candidate_id: CandidateId,
    },

    /// An identifier sequence is exhausted.
    #[snafu(display("Sequence {kind} exhausted"))]
    SequenceExhausted {
        /// The sequence name.
        kind: &'static str,
    },

    /// A row referenced by an index or a ballot is missing.
    #[snafu(display("Corrupted store: {message}"))]
    Corrupted {
        /// What was expected and not found.
        message: String,
    },
}

impl StoreError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Codec { .. } => ErrorCode::Serialization,
            Self::Corrupted { .. } => ErrorCode::Internal,
            _ => ErrorCode::Storage,
        }
    }
}

impl From<CodecError> for StoreError {
    fn from(source: CodecError) -> Self {
        StoreError::Codec { source }
    }
}

/// Result type for store operations.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;
