//! Proptest strategies for ballot ledger inputs.
//!
//! Strategies produce well-formed registrations and ballot scripts while
//! exploring edge cases through random variation.
//!
//! # Usage
//!
//! ```no_run
//! use ballot_ledger_test_utils::strategies;
//! use proptest::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn my_property(script in strategies::arb_ballot_script(5, 3, 2)) {
//!         // replay the script against a fresh engine
//!     }
//! }
//! ```

use ballot_ledger_types::NewVoter;
use chrono::NaiveDate;
use proptest::prelude::*;

/// One attempted ballot, by index into the fixture's voters, candidates, and elections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BallotAttempt {
    /// Index of the voter.
    pub voter: usize,
    /// Index of the candidate (may belong to another election).
    pub candidate: usize,
    /// Index of the election.
    pub election: usize,
}

/// Generates a 12-digit national id.
pub fn arb_national_id() -> impl Strategy<Value = String> {
    "[0-9]{12}"
}

/// Generates a 10-digit phone number.
pub fn arb_phone_number() -> impl Strategy<Value = String> {
    "[0-9]{10}"
}

/// Generates a person's name of 1-40 characters.
pub fn arb_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{0,19}( [A-Z][a-z]{0,18})?"
}

/// Generates a birth date between 1920 and 2000, always adult today.
pub fn arb_adult_birth_date() -> impl Strategy<Value = NaiveDate> {
    (1920i32..=2000, 1u32..=12, 1u32..=28)
        .prop_filter_map("valid date", |(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
}

/// Generates a valid voter registration.
pub fn arb_new_voter() -> impl Strategy<Value = NewVoter> {
    (arb_national_id(), arb_name(), arb_adult_birth_date(), arb_phone_number()).prop_map(
        |(national_id, name, date_of_birth, phone_number)| {
            NewVoter::builder()
                .national_id(national_id)
                .name(name)
                .date_of_birth(date_of_birth)
                .address("1 Generated Road")
                .phone_number(phone_number)
                .build()
        },
    )
}

/// Generates a sequence of 0-64 ballot attempts over `voters` voters,
/// `candidates` candidates, and `elections` elections.
///
/// Repeated voters, foreign candidates, and inactive elections all occur.
pub fn arb_ballot_script(
    voters: usize,
    candidates: usize,
    elections: usize,
) -> impl Strategy<Value = Vec<BallotAttempt>> {
    let attempt = (0..voters.max(1), 0..candidates.max(1), 0..elections.max(1))
        .prop_map(|(voter, candidate, election)| BallotAttempt { voter, candidate, election });
    proptest::collection::vec(attempt, 0..64)
}

/// Generates 1-8 vote counts with a non-zero total.
pub fn arb_vote_counts() -> impl Strategy<Value = Vec<u64>> {
    proptest::collection::vec(0u64..10_000, 1..8).prop_filter("non-zero total", |counts| {
        counts.iter().sum::<u64>() > 0
    })
}

/// Reference percentage using floating point, for cross-checking integer rounding.
///
/// Only valid for totals small enough to be exact in `f64`.
pub fn reference_percentage(part: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    let exact = part as f64 * 100.0 / total as f64;
    (exact + 0.5).floor() as u32
}
