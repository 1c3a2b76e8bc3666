//! Well-formed registration inputs for tests.
//!
//! Centralizes the magic values (national ids, phone numbers, dates) that
//! would otherwise be scattered across test modules.

// Fixture constants are known-valid dates
#![allow(clippy::expect_used)]

use ballot_ledger_types::{AdminRole, NewAdmin, NewCandidate, NewElection, NewVoter};
use chrono::{Duration, NaiveDate, Utc};

/// Email of the administrator created by [`admin`].
pub const ADMIN_EMAIL: &str = "admin@example.org";

/// Password of the administrator created by [`admin`].
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";

/// Returns an adult voter whose national id is derived from `n`.
///
/// Distinct `n` always yield distinct national ids.
#[must_use]
pub fn voter(n: u64) -> NewVoter {
    NewVoter::builder()
        .national_id(format!("{:012}", n % 1_000_000_000_000))
        .name(format!("Test Voter {n}"))
        .date_of_birth(NaiveDate::from_ymd_opt(1980, 6, 15).expect("valid date"))
        .address(format!("{n} Test Street"))
        .phone_number("9876543210")
        .build()
}

/// Returns an election whose window spans the current time.
#[must_use]
pub fn election(title: &str, active: bool) -> NewElection {
    let start = Utc::now() - Duration::hours(1);
    NewElection::builder()
        .title(title)
        .description(format!("{title} (test)"))
        .start_date(start)
        .end_date(start + Duration::days(1))
        .is_active(active)
        .constituency("Central")
        .build()
}

/// Returns a candidate named `name`.
#[must_use]
pub fn candidate(name: &str) -> NewCandidate {
    NewCandidate::builder()
        .name(name)
        .party(format!("{name} Alliance"))
        .symbol("Star")
        .build()
}

/// Returns a super-admin with [`ADMIN_EMAIL`] and [`ADMIN_PASSWORD`].
#[must_use]
pub fn admin() -> NewAdmin {
    NewAdmin::builder()
        .email(ADMIN_EMAIL)
        .name("Test Administrator")
        .role(AdminRole::SuperAdmin)
        .password(ADMIN_PASSWORD)
        .build()
}
