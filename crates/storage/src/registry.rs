//! Registry: voter registration and election administration.
//!
//! Writes here share the store's single write transaction with the ballot
//! ledger but never touch `has_voted`, ballots, or vote counts.

use ballot_ledger_types::{
    Admin, AdminId, Candidate, CandidateId, Election, ElectionId, ErrorCode, NewAdmin,
    NewCandidate, NewElection, NewVoter, ValidationError, Voter, VoterId,
    config::ValidationConfig,
    validation::{
        validate_email, validate_new_candidate, validate_new_election, validate_new_voter,
        validate_text,
    },
};
use chrono::Utc;
use redb::{ReadableTable, WriteTransaction};
use sha2::{Digest, Sha256};
use snafu::{ResultExt, Snafu};
use subtle::ConstantTimeEq;
use tracing::{info, instrument, warn};

use crate::{
    engine::StorageEngine,
    error::{CommitSnafu, StorageSnafu, StoreError, TableSnafu},
    keys::{election_candidate_bounds, election_candidate_key},
    rows::{Sequence, get_row, next_id, put_row, scan_rows},
    tables::Tables,
};

/// Failures of registry writes.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum RegistryError {
    /// A voter with the same national id exists.
    #[snafu(display("National id already registered"))]
    AlreadyRegistered,

    /// An admin with the same email exists.
    #[snafu(display("Admin email already in use"))]
    DuplicateEmail,

    /// Input failed validation.
    #[snafu(display("Invalid input: {source}"))]
    Invalid {
        /// The failed check.
        source: ValidationError,
    },

    /// The addressed row does not exist.
    #[snafu(display("{entity} {id} not found"))]
    NotFound {
        /// Entity kind.
        entity: &'static str,
        /// Raw identifier.
        id: u64,
    },

    /// The store failed; nothing was committed.
    #[snafu(display("Store failure: {source}"))]
    Store {
        /// The underlying store error.
        source: StoreError,
    },
}

impl RegistryError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::AlreadyRegistered => ErrorCode::AlreadyRegistered,
            Self::DuplicateEmail => ErrorCode::Conflict,
            Self::Invalid { .. } => ErrorCode::InvalidArgument,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Store { source } => source.code(),
        }
    }
}

impl From<StoreError> for RegistryError {
    fn from(source: StoreError) -> Self {
        RegistryError::Store { source }
    }
}

/// Hex-encoded SHA-256 digest of an admin password.
pub fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Constant-time comparison of a stored digest against a candidate password.
fn digest_matches(stored: &str, password: &str) -> bool {
    stored.as_bytes().ct_eq(password_digest(password).as_bytes()).into()
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Commits `txn` when `outcome` succeeded, aborts it otherwise.
fn finish<T>(
    txn: WriteTransaction,
    outcome: Result<T, RegistryError>,
) -> Result<T, RegistryError> {
    match outcome {
        Ok(value) => {
            txn.commit().context(CommitSnafu)?;
            Ok(value)
        },
        Err(err) => {
            if let Err(abort_err) = txn.abort() {
                warn!(error = %abort_err, "Failed to abort registry transaction");
            }
            Err(err)
        },
    }
}

/// Voter, election, candidate, and administrator records.
#[derive(Clone)]
pub struct Registry {
    engine: StorageEngine,
    validation: ValidationConfig,
}

impl Registry {
    /// Creates a registry over the given engine.
    pub fn new(engine: StorageEngine, validation: ValidationConfig) -> Self {
        Self { engine, validation }
    }

    // =========================================================================
    // Voters
    // =========================================================================

    /// Registers a verified voter.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Invalid`] if a field fails validation
    /// - [`RegistryError::AlreadyRegistered`] if the national id is taken
    #[instrument(skip_all)]
    pub fn register_voter(&self, input: NewVoter) -> Result<Voter, RegistryError> {
        let now = Utc::now();
        validate_new_voter(&input, now.date_naive(), &self.validation).context(InvalidSnafu)?;

        let txn = self.engine.begin_write()?;
        let outcome = (|| -> Result<Voter, RegistryError> {
            let mut national_ids = txn.open_table(Tables::NATIONAL_IDS).context(TableSnafu)?;
            if national_ids.get(input.national_id.as_str()).context(StorageSnafu)?.is_some() {
                return AlreadyRegisteredSnafu.fail();
            }
            let id = VoterId::new(next_id(&txn, Sequence::Voter)?);
            let voter = Voter {
                id,
                national_id: input.national_id,
                name: input.name,
                date_of_birth: input.date_of_birth,
                address: input.address,
                phone_number: input.phone_number,
                is_verified: true,
                has_voted: false,
                created_at: now,
                updated_at: now,
            };
            national_ids.insert(voter.national_id.as_str(), id.value()).context(StorageSnafu)?;
            let mut voters = txn.open_table(Tables::VOTERS).context(TableSnafu)?;
            put_row(&mut voters, id.value(), &voter)?;
            Ok(voter)
        })();
        let voter = finish(txn, outcome)?;
        info!(voter_id = %voter.id, "Voter registered");
        Ok(voter)
    }

    /// Loads a voter.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    pub fn get_voter(&self, id: VoterId) -> Result<Option<Voter>, StoreError> {
        let txn = self.engine.begin_read()?;
        let voters = txn.open_table(Tables::VOTERS).context(TableSnafu)?;
        get_row(&voters, id.value())
    }

    /// Lists every voter, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    pub fn list_voters(&self) -> Result<Vec<Voter>, StoreError> {
        let txn = self.engine.begin_read()?;
        let voters = txn.open_table(Tables::VOTERS).context(TableSnafu)?;
        scan_rows(&voters, true)
    }

    // =========================================================================
    // Elections
    // =========================================================================

    /// Creates an election.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Invalid`] if the title is blank or the window
    /// is not ordered.
    #[instrument(skip_all)]
    pub fn create_election(&self, input: NewElection) -> Result<Election, RegistryError> {
        validate_new_election(&input, &self.validation).context(InvalidSnafu)?;

        let txn = self.engine.begin_write()?;
        let outcome = (|| -> Result<Election, RegistryError> {
            let election = Election {
                id: ElectionId::new(next_id(&txn, Sequence::Election)?),
                title: input.title,
                description: input.description,
                start_date: input.start_date,
                end_date: input.end_date,
                is_active: input.is_active,
                constituency: input.constituency,
                created_at: Utc::now(),
            };
            let mut elections = txn.open_table(Tables::ELECTIONS).context(TableSnafu)?;
            put_row(&mut elections, election.id.value(), &election)?;
            Ok(election)
        })();
        let election = finish(txn, outcome)?;
        info!(election_id = %election.id, active = election.is_active, "Election created");
        Ok(election)
    }

    /// Sets the active flag of an election.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the election does not exist.
    #[instrument(skip(self, election_id), fields(%election_id))]
    pub fn set_election_active(
        &self,
        election_id: ElectionId,
        active: bool,
    ) -> Result<Election, RegistryError> {
        let txn = self.engine.begin_write()?;
        let outcome = (|| -> Result<Election, RegistryError> {
            let mut elections = txn.open_table(Tables::ELECTIONS).context(TableSnafu)?;
            let mut election: Election = get_row(&elections, election_id.value())?
                .ok_or(RegistryError::NotFound { entity: "election", id: election_id.value() })?;
            election.is_active = active;
            put_row(&mut elections, election_id.value(), &election)?;
            Ok(election)
        })();
        let election = finish(txn, outcome)?;
        info!("Election status changed");
        Ok(election)
    }

    /// Loads an election.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    pub fn get_election(&self, id: ElectionId) -> Result<Option<Election>, StoreError> {
        let txn = self.engine.begin_read()?;
        let elections = txn.open_table(Tables::ELECTIONS).context(TableSnafu)?;
        get_row(&elections, id.value())
    }

    /// Lists every election, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    pub fn list_elections(&self) -> Result<Vec<Election>, StoreError> {
        let txn = self.engine.begin_read()?;
        let elections = txn.open_table(Tables::ELECTIONS).context(TableSnafu)?;
        scan_rows(&elections, true)
    }

    /// Lists the elections that accept ballots, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    pub fn list_active_elections(&self) -> Result<Vec<Election>, StoreError> {
        let mut elections = self.list_elections()?;
        elections.retain(Election::accepts_ballots);
        Ok(elections)
    }

    // =========================================================================
    // Candidates
    // =========================================================================

    /// Adds a candidate to an election with a vote count of zero.
    ///
    /// A blank constituency inherits the election's.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Invalid`] if a field fails validation
    /// - [`RegistryError::NotFound`] if the election does not exist
    #[instrument(skip(self, election_id, input), fields(%election_id))]
    pub fn add_candidate(
        &self,
        election_id: ElectionId,
        input: NewCandidate,
    ) -> Result<Candidate, RegistryError> {
        validate_new_candidate(&input, &self.validation).context(InvalidSnafu)?;

        let txn = self.engine.begin_write()?;
        let outcome = (|| -> Result<Candidate, RegistryError> {
            let elections = txn.open_table(Tables::ELECTIONS).context(TableSnafu)?;
            let election: Election = get_row(&elections, election_id.value())?
                .ok_or(RegistryError::NotFound { entity: "election", id: election_id.value() })?;

            let constituency = if input.constituency.trim().is_empty() {
                election.constituency
            } else {
                input.constituency
            };
            let candidate = Candidate {
                id: CandidateId::new(next_id(&txn, Sequence::Candidate)?),
                election_id,
                name: input.name,
                party: input.party,
                symbol: input.symbol,
                constituency,
                description: input.description,
                image_url: input.image_url,
                vote_count: 0,
                created_at: Utc::now(),
            };

            let mut candidates = txn.open_table(Tables::CANDIDATES).context(TableSnafu)?;
            put_row(&mut candidates, candidate.id.value(), &candidate)?;
            let mut index = txn.open_table(Tables::ELECTION_CANDIDATES).context(TableSnafu)?;
            let key = election_candidate_key(election_id, candidate.id);
            index.insert(&key[..], candidate.id.value()).context(StorageSnafu)?;
            Ok(candidate)
        })();
        let candidate = finish(txn, outcome)?;
        info!(candidate_id = %candidate.id, "Candidate added");
        Ok(candidate)
    }

    /// Lists the candidates of an election ordered by name, ties by id.
    ///
    /// An unknown election has no candidates.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    pub fn list_candidates(&self, election_id: ElectionId) -> Result<Vec<Candidate>, StoreError> {
        let txn = self.engine.begin_read()?;
        let index = txn.open_table(Tables::ELECTION_CANDIDATES).context(TableSnafu)?;
        let candidates = txn.open_table(Tables::CANDIDATES).context(TableSnafu)?;

        let (start, end) = election_candidate_bounds(election_id);
        let mut rows: Vec<Candidate> = Vec::new();
        for entry in index.range(&start[..]..=&end[..]).context(StorageSnafu)? {
            let (_, candidate_id) = entry.context(StorageSnafu)?;
            if let Some(candidate) = get_row(&candidates, candidate_id.value())? {
                rows.push(candidate);
            }
        }
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    // =========================================================================
    // Administrators
    // =========================================================================

    /// Creates an administrator account. The email is stored lower-cased.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Invalid`] if the email, name, or password is unusable
    /// - [`RegistryError::DuplicateEmail`] if the email is taken
    #[instrument(skip_all)]
    pub fn create_admin(&self, input: NewAdmin) -> Result<Admin, RegistryError> {
        let email = normalize_email(&input.email);
        validate_email(&email).context(InvalidSnafu)?;
        validate_text(&input.name, "name", &self.validation).context(InvalidSnafu)?;
        validate_text(&input.password, "password", &self.validation).context(InvalidSnafu)?;

        let txn = self.engine.begin_write()?;
        let outcome = (|| -> Result<Admin, RegistryError> {
            let mut emails = txn.open_table(Tables::ADMIN_EMAILS).context(TableSnafu)?;
            if emails.get(email.as_str()).context(StorageSnafu)?.is_some() {
                return DuplicateEmailSnafu.fail();
            }
            let admin = Admin {
                id: AdminId::new(next_id(&txn, Sequence::Admin)?),
                email,
                name: input.name,
                role: input.role,
                password_digest: password_digest(&input.password),
                created_at: Utc::now(),
            };
            emails.insert(admin.email.as_str(), admin.id.value()).context(StorageSnafu)?;
            let mut admins = txn.open_table(Tables::ADMINS).context(TableSnafu)?;
            put_row(&mut admins, admin.id.value(), &admin)?;
            Ok(admin)
        })();
        let admin = finish(txn, outcome)?;
        info!(admin_id = %admin.id, "Admin created");
        Ok(admin)
    }

    /// Loads an administrator.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    pub fn get_admin(&self, id: AdminId) -> Result<Option<Admin>, StoreError> {
        let txn = self.engine.begin_read()?;
        let admins = txn.open_table(Tables::ADMINS).context(TableSnafu)?;
        get_row(&admins, id.value())
    }

    /// Loads an administrator by email.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    pub fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>, StoreError> {
        let txn = self.engine.begin_read()?;
        let emails = txn.open_table(Tables::ADMIN_EMAILS).context(TableSnafu)?;
        let id = match emails.get(normalize_email(email).as_str()).context(StorageSnafu)? {
            Some(guard) => guard.value(),
            None => return Ok(None),
        };
        let admins = txn.open_table(Tables::ADMINS).context(TableSnafu)?;
        get_row(&admins, id)
    }

    /// Returns the admin whose email and password match, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be read.
    pub fn authenticate_admin(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Admin>, StoreError> {
        let admin = self.find_admin_by_email(email)?;
        Ok(admin.filter(|a| digest_matches(&a.password_digest, password)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use ballot_ledger_types::AdminRole;
    use chrono::{Duration, NaiveDate};

    use super::*;

    fn registry() -> Registry {
        Registry::new(StorageEngine::open_in_memory().unwrap(), ValidationConfig::default())
    }

    fn voter(national_id: &str) -> NewVoter {
        NewVoter::builder()
            .national_id(national_id)
            .name("Ravi Kumar")
            .date_of_birth(NaiveDate::from_ymd_opt(1985, 3, 9).unwrap())
            .address("12 Main Road")
            .phone_number("9876543210")
            .build()
    }

    fn election(title: &str, active: bool) -> NewElection {
        let start = Utc::now();
        NewElection::builder()
            .title(title)
            .start_date(start)
            .end_date(start + Duration::days(1))
            .is_active(active)
            .constituency("Central")
            .build()
    }

    fn candidate(name: &str) -> NewCandidate {
        NewCandidate::builder().name(name).party("Party").symbol("Star").build()
    }

    #[test]
    fn test_register_voter_assigns_sequential_ids() {
        let registry = registry();
        let first = registry.register_voter(voter("111111111111")).unwrap();
        let second = registry.register_voter(voter("222222222222")).unwrap();
        assert_eq!(first.id, VoterId::new(1));
        assert_eq!(second.id, VoterId::new(2));
        assert!(first.is_verified);
        assert!(!first.has_voted);
    }

    #[test]
    fn test_register_voter_rejects_duplicate_national_id() {
        let registry = registry();
        registry.register_voter(voter("111111111111")).unwrap();
        let err = registry.register_voter(voter("111111111111")).unwrap_err();
        assert!(matches!(err, RegistryError::AlreadyRegistered));
        assert_eq!(err.code(), ErrorCode::AlreadyRegistered);
        assert_eq!(registry.list_voters().unwrap().len(), 1);
    }

    #[test]
    fn test_register_voter_rejects_minor() {
        let registry = registry();
        let mut input = voter("111111111111");
        input.date_of_birth = Utc::now().date_naive();
        let err = registry.register_voter(input).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_list_voters_newest_first() {
        let registry = registry();
        registry.register_voter(voter("111111111111")).unwrap();
        registry.register_voter(voter("222222222222")).unwrap();
        let ids: Vec<u64> = registry.list_voters().unwrap().iter().map(|v| v.id.value()).collect();
        assert_eq!(ids, [2, 1]);
    }

    #[test]
    fn test_election_lifecycle() {
        let registry = registry();
        let old = registry.create_election(election("Old", true)).unwrap();
        let new = registry.create_election(election("New", false)).unwrap();

        let titles: Vec<String> =
            registry.list_elections().unwrap().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, ["New", "Old"]);

        let active = registry.list_active_elections().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, old.id);

        let toggled = registry.set_election_active(new.id, true).unwrap();
        assert!(toggled.is_active);
        assert_eq!(registry.list_active_elections().unwrap().len(), 2);
    }

    #[test]
    fn test_set_active_on_missing_election() {
        let err = registry().set_election_active(ElectionId::new(9), true).unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { entity: "election", id: 9 }));
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[test]
    fn test_create_election_rejects_reversed_window() {
        let mut input = election("Backwards", true);
        input.end_date = input.start_date - Duration::hours(1);
        let err = registry().create_election(input).unwrap_err();
        assert!(matches!(err, RegistryError::Invalid { .. }));
    }

    #[test]
    fn test_candidates_sorted_by_name_and_scoped_to_election() {
        let registry = registry();
        let e1 = registry.create_election(election("One", true)).unwrap().id;
        let e2 = registry.create_election(election("Two", true)).unwrap().id;
        registry.add_candidate(e1, candidate("Zara")).unwrap();
        registry.add_candidate(e2, candidate("Kiran")).unwrap();
        let asha = registry.add_candidate(e1, candidate("Asha")).unwrap();

        assert_eq!(asha.vote_count, 0);
        assert_eq!(asha.constituency, "Central");
        let names: Vec<String> =
            registry.list_candidates(e1).unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["Asha", "Zara"]);
        assert!(registry.list_candidates(ElectionId::new(99)).unwrap().is_empty());
    }

    #[test]
    fn test_add_candidate_to_missing_election() {
        let err = registry().add_candidate(ElectionId::new(3), candidate("Asha")).unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { .. }));
    }

    #[test]
    fn test_failed_candidate_insert_allocates_no_id() {
        let registry = registry();
        assert!(registry.add_candidate(ElectionId::new(3), candidate("Ghost")).is_err());
        let e = registry.create_election(election("Real", true)).unwrap().id;
        let first = registry.add_candidate(e, candidate("Asha")).unwrap();
        assert_eq!(first.id, CandidateId::new(1));
    }

    #[test]
    fn test_admin_authentication() {
        let registry = registry();
        let admin = registry
            .create_admin(
                NewAdmin::builder()
                    .email("Admin@Voting.gov.in")
                    .name("Chief Officer")
                    .role(AdminRole::SuperAdmin)
                    .password("admin123")
                    .build(),
            )
            .unwrap();
        assert_eq!(admin.email, "admin@voting.gov.in");
        assert_eq!(admin.password_digest, password_digest("admin123"));
        assert_ne!(admin.password_digest, "admin123");

        let found = registry.authenticate_admin("admin@voting.gov.in", "admin123").unwrap();
        assert_eq!(found.map(|a| a.id), Some(admin.id));
        assert!(registry.authenticate_admin("admin@voting.gov.in", "wrong").unwrap().is_none());
        assert!(registry.authenticate_admin("nobody@voting.gov.in", "admin123").unwrap().is_none());
        let loaded = registry.get_admin(admin.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Chief Officer");
    }

    #[test]
    fn test_duplicate_admin_email() {
        let registry = registry();
        let new_admin = || {
            NewAdmin::builder()
                .email("officer@voting.gov.in")
                .name("Officer")
                .role(AdminRole::ElectionOfficer)
                .password("secret")
                .build()
        };
        registry.create_admin(new_admin()).unwrap();
        let err = registry.create_admin(new_admin()).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateEmail));
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[test]
    fn test_digest_matches() {
        let stored = password_digest("admin123");
        assert!(digest_matches(&stored, "admin123"));
        assert!(!digest_matches(&stored, "admin124"));
        assert!(!digest_matches(&stored, "Admin123"));
        assert!(!digest_matches(&stored, ""));
        assert!(!digest_matches("", "admin123"));
    }

    #[test]
    fn test_password_digest_is_sha256_hex() {
        assert_eq!(
            password_digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
