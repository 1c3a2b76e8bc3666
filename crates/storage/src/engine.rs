//! redb storage engine wrapper.
//!
//! Provides a thin wrapper around redb with:
//! - Database lifecycle management
//! - Table creation at open time, so read transactions never see a missing table
//! - File-backed and in-memory constructors

use std::{path::Path, sync::Arc};

use ballot_ledger_types::config::StorageConfig;
use redb::{Database, ReadTransaction, WriteTransaction, backends::InMemoryBackend};
use snafu::ResultExt;
use tracing::debug;

use crate::{
    error::{CommitSnafu, OpenSnafu, Result, TableSnafu, TransactionSnafu},
    tables::Tables,
};

/// Storage engine backed by redb.
///
/// Cloning is cheap and shares the underlying database handle.
#[derive(Clone)]
pub struct StorageEngine {
    db: Arc<Database>,
}

impl StorageEngine {
    /// Opens or creates a database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`](crate::StoreError::Open) if the file cannot
    /// be opened, or a table error if initialization fails.
    pub fn open(path: impl AsRef<Path>, config: &StorageConfig) -> Result<Self> {
        let path = path.as_ref();
        let db = Database::builder()
            .set_cache_size(config.cache_size_bytes)
            .create(path)
            .context(OpenSnafu { path: path.display().to_string() })?;
        debug!(path = %path.display(), "Opened database");
        Self::init(db)
    }

    /// Creates an in-memory database. Contents vanish when the last clone drops.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend or its tables cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let db = Database::builder()
            .create_with_backend(InMemoryBackend::new())
            .context(OpenSnafu { path: ":memory:".to_string() })?;
        Self::init(db)
    }

    fn init(db: Database) -> Result<Self> {
        let txn = db.begin_write().context(TransactionSnafu)?;
        {
            txn.open_table(Tables::VOTERS).context(TableSnafu)?;
            txn.open_table(Tables::ELECTIONS).context(TableSnafu)?;
            txn.open_table(Tables::CANDIDATES).context(TableSnafu)?;
            txn.open_table(Tables::BALLOTS).context(TableSnafu)?;
            txn.open_table(Tables::ADMINS).context(TableSnafu)?;
            txn.open_table(Tables::NATIONAL_IDS).context(TableSnafu)?;
            txn.open_table(Tables::ADMIN_EMAILS).context(TableSnafu)?;
            txn.open_table(Tables::ELECTION_CANDIDATES).context(TableSnafu)?;
            txn.open_table(Tables::VOTER_BALLOTS).context(TableSnafu)?;
            txn.open_table(Tables::SEQUENCES).context(TableSnafu)?;
        }
        txn.commit().context(CommitSnafu)?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Begins an MVCC read transaction.
    pub(crate) fn begin_read(&self) -> Result<ReadTransaction> {
        self.db.begin_read().context(TransactionSnafu)
    }

    /// Begins the exclusive write transaction, blocking until it is available.
    pub(crate) fn begin_write(&self) -> Result<WriteTransaction> {
        self.db.begin_write().context(TransactionSnafu)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use redb::ReadableTableMetadata;

    use super::*;

    #[test]
    fn test_open_in_memory_creates_tables() {
        let engine = StorageEngine::open_in_memory().expect("should open");
        let txn = engine.begin_read().expect("should begin read");
        let voters = txn.open_table(Tables::VOTERS).expect("voters table exists");
        assert_eq!(voters.len().expect("len"), 0);
        txn.open_table(Tables::SEQUENCES).expect("sequences table exists");
    }

    #[test]
    fn test_clones_share_database() {
        let engine = StorageEngine::open_in_memory().expect("should open");
        let clone = engine.clone();

        let txn = engine.begin_write().expect("begin write");
        {
            let mut table = txn.open_table(Tables::SEQUENCES).expect("open");
            table.insert("voter", 7).expect("insert");
        }
        txn.commit().expect("commit");

        let txn = clone.begin_read().expect("begin read");
        let table = txn.open_table(Tables::SEQUENCES).expect("open");
        assert_eq!(table.get("voter").expect("get").map(|v| v.value()), Some(7));
    }
}
