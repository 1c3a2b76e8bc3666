//! Core type definitions for the ballot ledger.
//!
//! - Identifier newtypes (VoterId, ElectionId, ...)
//! - Stored entities (Voter, Election, Candidate, Ballot, Admin)
//! - Registration inputs and read projections (results, dashboard, receipts)
//!
//! Stored entities are postcard-encoded in the store and JSON-encoded on the
//! wire, so they must not use `skip_serializing_if` or other attributes that
//! break non-self-describing formats.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Identifier Types
// ============================================================================

/// Generates a newtype wrapper around a numeric type for type-safe identifiers.
///
/// Each generated type provides:
/// - Standard derives: Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord
/// - Serde with `#[serde(transparent)]` so JSON carries a plain number
/// - `From<inner>` and `Into<inner>` conversions
/// - `Display` with a semantic prefix (e.g., `voter:12`)
/// - `new()` constructor and `value()` accessor
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident, $inner:ty, $prefix:expr
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name($inner);

        impl $name {
            /// Creates a new identifier from a raw value.
            #[inline]
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            /// Returns the raw numeric value.
            #[inline]
            pub const fn value(self) -> $inner {
                self.0
            }
        }

        impl From<$inner> for $name {
            #[inline]
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $inner {
            #[inline]
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}:{}", $prefix, self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = <$inner as std::str::FromStr>::Err;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                s.parse::<$inner>().map(Self)
            }
        }
    };
}

define_id!(
    /// Identifier of a registered voter.
    ///
    /// Allocated from the `voter` sequence; the first voter is `voter:1`.
    VoterId, u64, "voter"
);

define_id!(
    /// Identifier of an election.
    ElectionId, u64, "election"
);

define_id!(
    /// Identifier of a candidate. Candidate ids grow in insertion order,
    /// which the tally uses as its tie-break.
    CandidateId, u64, "candidate"
);

define_id!(
    /// Identifier of a recorded ballot.
    BallotId, u64, "ballot"
);

define_id!(
    /// Identifier of an administrator account.
    AdminId, u64, "admin"
);

// ============================================================================
// Integrity Tag
// ============================================================================

/// Opaque per-ballot correlation token.
///
/// Unique per ballot and useful for matching a receipt against audit logs.
/// It carries no cryptographic binding to the ballot contents and proves
/// nothing about tampering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntegrityTag(String);

impl IntegrityTag {
    /// Generates a fresh tag of the form `tag_<32 hex chars>`.
    pub fn generate() -> Self {
        Self(format!("tag_{}", uuid::Uuid::new_v4().simple()))
    }

    /// Returns the tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IntegrityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Stored Entities
// ============================================================================

/// A registered, identity-verified citizen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voter {
    /// Voter identifier.
    pub id: VoterId,
    /// National identity number (unique across voters).
    pub national_id: String,
    /// Full name.
    pub name: String,
    /// Date of birth, used for the minimum-age check at registration.
    pub date_of_birth: NaiveDate,
    /// Postal address.
    pub address: String,
    /// Contact phone number.
    pub phone_number: String,
    /// Whether identity verification succeeded.
    pub is_verified: bool,
    /// Set once, by the ballot ledger, when the voter's ballot commits.
    pub has_voted: bool,
    /// Registration time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

/// A voting event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Election {
    /// Election identifier.
    pub id: ElectionId,
    /// Display title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Scheduled opening time.
    pub start_date: DateTime<Utc>,
    /// Scheduled closing time.
    pub end_date: DateTime<Utc>,
    /// Administrator-controlled switch gating ballot acceptance.
    pub is_active: bool,
    /// Constituency the election covers.
    pub constituency: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Election {
    /// Whether the election currently accepts ballots.
    ///
    /// Only the active flag is consulted; the scheduled window is advisory.
    #[inline]
    pub fn accepts_ballots(&self) -> bool {
        self.is_active
    }

    /// Whether `at` falls inside the scheduled `[start_date, end_date]` window.
    pub fn is_within_window(&self, at: DateTime<Utc>) -> bool {
        self.start_date <= at && at <= self.end_date
    }
}

/// A contestant within one election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Candidate identifier.
    pub id: CandidateId,
    /// Owning election.
    pub election_id: ElectionId,
    /// Candidate name.
    pub name: String,
    /// Party affiliation.
    pub party: String,
    /// Ballot symbol.
    pub symbol: String,
    /// Constituency the candidate stands in.
    pub constituency: String,
    /// Free-form description.
    pub description: String,
    /// Optional portrait URL.
    pub image_url: Option<String>,
    /// Running tally. Only the ballot ledger increments it.
    pub vote_count: u64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// An immutable cast-vote record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ballot {
    /// Ballot identifier.
    pub id: BallotId,
    /// The voter who cast it.
    pub voter_id: VoterId,
    /// The chosen candidate.
    pub candidate_id: CandidateId,
    /// The election it was cast in.
    pub election_id: ElectionId,
    /// Commit time.
    pub timestamp: DateTime<Utc>,
    /// Opaque correlation token.
    pub integrity_tag: IntegrityTag,
}

/// Administrator role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full administrative access.
    SuperAdmin,
    /// Manages elections and candidates.
    ElectionOfficer,
}

/// An administrator account.
///
/// Never serialize this type to clients; use [`AdminProfile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    /// Admin identifier.
    pub id: AdminId,
    /// Login email (unique).
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role.
    pub role: AdminRole,
    /// Hex-encoded SHA-256 digest of the password.
    pub password_digest: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Client-facing view of an [`Admin`] without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    /// Admin identifier.
    pub id: AdminId,
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role.
    pub role: AdminRole,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<&Admin> for AdminProfile {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            email: admin.email.clone(),
            name: admin.name.clone(),
            role: admin.role,
            created_at: admin.created_at,
        }
    }
}

// ============================================================================
// Registration Inputs
// ============================================================================

/// Identity-verification submission for a new voter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase")]
pub struct NewVoter {
    /// National identity number.
    #[builder(into)]
    pub national_id: String,
    /// Full name.
    #[builder(into)]
    pub name: String,
    /// Date of birth.
    pub date_of_birth: NaiveDate,
    /// Postal address.
    #[builder(into)]
    pub address: String,
    /// Contact phone number.
    #[builder(into)]
    pub phone_number: String,
}

/// Fields for a new election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase")]
pub struct NewElection {
    /// Display title.
    #[builder(into)]
    pub title: String,
    /// Free-form description.
    #[builder(into, default)]
    #[serde(default)]
    pub description: String,
    /// Scheduled opening time.
    pub start_date: DateTime<Utc>,
    /// Scheduled closing time.
    pub end_date: DateTime<Utc>,
    /// Whether the election accepts ballots immediately.
    #[builder(default)]
    #[serde(default)]
    pub is_active: bool,
    /// Constituency.
    #[builder(into)]
    pub constituency: String,
}

/// Fields for a new candidate. The owning election comes from the route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bon::Builder)]
#[serde(rename_all = "camelCase")]
pub struct NewCandidate {
    /// Candidate name.
    #[builder(into)]
    pub name: String,
    /// Party affiliation.
    #[builder(into)]
    pub party: String,
    /// Ballot symbol.
    #[builder(into)]
    pub symbol: String,
    /// Constituency.
    #[builder(into, default)]
    #[serde(default)]
    pub constituency: String,
    /// Free-form description.
    #[builder(into, default)]
    #[serde(default)]
    pub description: String,
    /// Optional portrait URL.
    #[builder(into)]
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Fields for a new administrator account.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct NewAdmin {
    /// Login email.
    #[builder(into)]
    pub email: String,
    /// Display name.
    #[builder(into)]
    pub name: String,
    /// Role.
    pub role: AdminRole,
    /// Plaintext password; only its digest is stored.
    #[builder(into)]
    pub password: String,
}

// ============================================================================
// Read Projections
// ============================================================================

/// One row of an election tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateResult {
    /// Candidate identifier.
    pub candidate_id: CandidateId,
    /// Candidate name.
    pub candidate_name: String,
    /// Party affiliation.
    pub party: String,
    /// Ballot symbol.
    pub symbol: String,
    /// Votes received.
    pub vote_count: u64,
    /// Share of all votes, rounded to the nearest integer.
    pub percentage: u32,
}

/// Ranked tally for one election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionResults {
    /// Rows ordered by descending vote count, ties in insertion order.
    pub results: Vec<CandidateResult>,
    /// Sum of all candidates' vote counts.
    pub total_votes: u64,
    /// The election the tally belongs to.
    pub election_id: ElectionId,
}

/// A ballot joined with its candidate and election, for history views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotReceipt {
    /// Ballot identifier.
    pub id: BallotId,
    /// Commit time.
    pub timestamp: DateTime<Utc>,
    /// Opaque correlation token.
    pub integrity_tag: IntegrityTag,
    /// Chosen candidate's name.
    pub candidate_name: String,
    /// Chosen candidate's party.
    pub candidate_party: String,
    /// Election title.
    pub election_title: String,
}

/// Aggregate figures for the administrator dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Registered voters.
    pub total_voters: u64,
    /// Recorded ballots.
    pub total_votes: u64,
    /// `round(100 * total_votes / total_voters)`, 0 without voters.
    pub turnout_percentage: u32,
    /// Number of elections with the active flag set.
    pub active_elections: usize,
    /// Most recent ballots, newest first.
    pub recent_votes: Vec<BallotReceipt>,
    /// The active elections.
    pub elections: Vec<Election>,
}

/// Rounded share of `part` in `total`, in percent.
///
/// Rounds half up (`12.5 -> 13`) using integer arithmetic only. Returns 0 when
/// `total` is 0. Shares computed this way need not sum to 100.
pub fn rounded_percentage(part: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    let numerator = 200 * u128::from(part) + u128::from(total);
    let share = numerator / (2 * u128::from(total));
    u32::try_from(share).unwrap_or(u32::MAX)
}
