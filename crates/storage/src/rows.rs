//! Row access helpers shared by the ledger, registry, and readers.
//!
//! Entity tables all map `u64 → postcard bytes`; these helpers keep the
//! encode/decode and error wrapping in one place.

use ballot_ledger_types::{decode, encode};
use redb::{ReadableTable, Table, WriteTransaction};
use serde::{Serialize, de::DeserializeOwned};
use snafu::{OptionExt, ResultExt};

use crate::{
    error::{Result, SequenceExhaustedSnafu, StorageSnafu, TableSnafu},
    tables::Tables,
};

/// Identifier sequences, one per entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Sequence {
    Voter,
    Election,
    Candidate,
    Ballot,
    Admin,
}

impl Sequence {
    const fn name(self) -> &'static str {
        match self {
            Self::Voter => "voter",
            Self::Election => "election",
            Self::Candidate => "candidate",
            Self::Ballot => "ballot",
            Self::Admin => "admin",
        }
    }
}

/// Allocates the next identifier of `sequence` inside `txn`.
///
/// Identifiers start at 1. The allocation only becomes durable when `txn`
/// commits, so an aborted transaction leaves no gap.
pub(crate) fn next_id(txn: &WriteTransaction, sequence: Sequence) -> Result<u64> {
    let mut table = txn.open_table(Tables::SEQUENCES).context(TableSnafu)?;
    let current =
        table.get(sequence.name()).context(StorageSnafu)?.map(|guard| guard.value()).unwrap_or(0);
    let next = current.checked_add(1).context(SequenceExhaustedSnafu { kind: sequence.name() })?;
    table.insert(sequence.name(), next).context(StorageSnafu)?;
    Ok(next)
}

/// Loads and decodes the row stored under `id`.
pub(crate) fn get_row<T, Tbl>(table: &Tbl, id: u64) -> Result<Option<T>>
where
    T: DeserializeOwned,
    Tbl: ReadableTable<u64, &'static [u8]>,
{
    match table.get(id).context(StorageSnafu)? {
        Some(guard) => Ok(Some(decode(guard.value())?)),
        None => Ok(None),
    }
}

/// Encodes and stores `row` under `id`, replacing any previous value.
pub(crate) fn put_row<T: Serialize>(
    table: &mut Table<'_, u64, &'static [u8]>,
    id: u64,
    row: &T,
) -> Result<()> {
    let bytes = encode(row)?;
    table.insert(id, bytes.as_slice()).context(StorageSnafu)?;
    Ok(())
}

/// Decodes every row of an entity table.
///
/// Identifier order equals insertion order, so `newest_first` reverses it.
pub(crate) fn scan_rows<T, Tbl>(table: &Tbl, newest_first: bool) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    Tbl: ReadableTable<u64, &'static [u8]>,
{
    let mut rows = Vec::new();
    for entry in table.iter().context(StorageSnafu)? {
        let (_, value) = entry.context(StorageSnafu)?;
        rows.push(decode(value.value())?);
    }
    if newest_first {
        rows.reverse();
    }
    Ok(rows)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::engine::StorageEngine;

    #[test]
    fn test_sequences_start_at_one_and_are_independent() {
        let engine = StorageEngine::open_in_memory().unwrap();
        let txn = engine.begin_write().unwrap();
        assert_eq!(next_id(&txn, Sequence::Voter).unwrap(), 1);
        assert_eq!(next_id(&txn, Sequence::Voter).unwrap(), 2);
        assert_eq!(next_id(&txn, Sequence::Ballot).unwrap(), 1);
        txn.commit().unwrap();
    }

    #[test]
    fn test_aborted_allocation_is_not_kept() {
        let engine = StorageEngine::open_in_memory().unwrap();

        let txn = engine.begin_write().unwrap();
        assert_eq!(next_id(&txn, Sequence::Election).unwrap(), 1);
        txn.abort().unwrap();

        let txn = engine.begin_write().unwrap();
        assert_eq!(next_id(&txn, Sequence::Election).unwrap(), 1);
        txn.commit().unwrap();
    }

    #[test]
    fn test_put_get_and_scan_order() {
        let engine = StorageEngine::open_in_memory().unwrap();
        let txn = engine.begin_write().unwrap();
        {
            let mut table = txn.open_table(Tables::ADMINS).unwrap();
            for id in 1..=3u64 {
                put_row(&mut table, id, &format!("row-{id}")).unwrap();
            }
            let loaded: Option<String> = get_row(&table, 2).unwrap();
            assert_eq!(loaded.as_deref(), Some("row-2"));
            assert!(get_row::<String, _>(&table, 9).unwrap().is_none());
        }
        txn.commit().unwrap();

        let txn = engine.begin_read().unwrap();
        let table = txn.open_table(Tables::ADMINS).unwrap();
        let oldest: Vec<String> = scan_rows(&table, false).unwrap();
        let newest: Vec<String> = scan_rows(&table, true).unwrap();
        assert_eq!(oldest, ["row-1", "row-2", "row-3"]);
        assert_eq!(newest, ["row-3", "row-2", "row-1"]);
    }
}
