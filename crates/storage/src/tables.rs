//! Table definitions for redb storage.
//!
//! Entity tables map a numeric identifier to a postcard-encoded row.
//! Index tables map a natural key to an identifier. Key encoding for
//! composite keys is handled by the keys module.

use redb::TableDefinition;

/// Table definitions for ballot ledger storage.
pub struct Tables;

impl Tables {
    // =========================================================================
    // Entity Tables
    // =========================================================================

    /// Voters: voter_id → serialized Voter
    pub const VOTERS: TableDefinition<'static, u64, &'static [u8]> =
        TableDefinition::new("voters");

    /// Elections: election_id → serialized Election
    pub const ELECTIONS: TableDefinition<'static, u64, &'static [u8]> =
        TableDefinition::new("elections");

    /// Candidates: candidate_id → serialized Candidate
    pub const CANDIDATES: TableDefinition<'static, u64, &'static [u8]> =
        TableDefinition::new("candidates");

    /// Ballots: ballot_id → serialized Ballot. Append-only.
    pub const BALLOTS: TableDefinition<'static, u64, &'static [u8]> =
        TableDefinition::new("ballots");

    /// Administrators: admin_id → serialized Admin
    pub const ADMINS: TableDefinition<'static, u64, &'static [u8]> =
        TableDefinition::new("admins");

    // =========================================================================
    // Index Tables
    // =========================================================================

    /// National id → voter_id. Enforces one registration per citizen.
    pub const NATIONAL_IDS: TableDefinition<'static, &'static str, u64> =
        TableDefinition::new("national_ids");

    /// Lower-cased email → admin_id.
    pub const ADMIN_EMAILS: TableDefinition<'static, &'static str, u64> =
        TableDefinition::new("admin_emails");

    /// Candidates of an election in insertion order.
    /// Key format: {election_id:8BE}{candidate_id:8BE}
    pub const ELECTION_CANDIDATES: TableDefinition<'static, &'static [u8], u64> =
        TableDefinition::new("election_candidates");

    /// voter_id → ballot_id. At most one entry per voter, ever.
    pub const VOTER_BALLOTS: TableDefinition<'static, u64, u64> =
        TableDefinition::new("voter_ballots");

    // =========================================================================
    // Metadata Tables
    // =========================================================================

    /// Sequence name → last allocated identifier.
    pub const SEQUENCES: TableDefinition<'static, &'static str, u64> =
        TableDefinition::new("sequences");
}
