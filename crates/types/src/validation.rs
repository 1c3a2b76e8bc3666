//! Input validation for registration and admin management requests.
//!
//! Limits come from [`ValidationConfig`]. Each check names the offending field
//! so the HTTP layer can report it in one sentence.
//!
//! ## Formats
//!
//! - National id: exactly `national_id_digits` ASCII digits.
//! - Phone number: exactly `phone_digits` ASCII digits.
//! - Free text: non-empty after trimming, at most `max_text_bytes` bytes.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    config::ValidationConfig,
    types::{NewCandidate, NewElection, NewVoter},
};

/// Validation error with structured context.
///
/// Contains the specific constraint that was violated and the field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Description of the violated constraint.
    pub constraint: String,
}

impl ValidationError {
    fn new(field: &str, constraint: impl Into<String>) -> Self {
        Self { field: field.to_string(), constraint: constraint.into() }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.constraint)
    }
}

impl std::error::Error for ValidationError {}

fn validate_digits(field: &str, value: &str, digits: usize) -> Result<(), ValidationError> {
    if value.len() != digits || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::new(field, format!("must be exactly {digits} digits")));
    }
    Ok(())
}

/// Validates a national id number.
///
/// # Errors
///
/// Returns [`ValidationError`] unless the value is exactly
/// `config.national_id_digits` ASCII digits.
pub fn validate_national_id(value: &str, config: &ValidationConfig) -> Result<(), ValidationError> {
    validate_digits("nationalId", value, config.national_id_digits)
}

/// Validates a phone number.
///
/// # Errors
///
/// Returns [`ValidationError`] unless the value is exactly
/// `config.phone_digits` ASCII digits.
pub fn validate_phone_number(
    value: &str,
    config: &ValidationConfig,
) -> Result<(), ValidationError> {
    validate_digits("phoneNumber", value, config.phone_digits)
}

/// Validates a required free-text field.
///
/// # Errors
///
/// Returns [`ValidationError`] if the value is blank or longer than
/// `config.max_text_bytes`.
pub fn validate_text(
    value: &str,
    field: &str,
    config: &ValidationConfig,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    validate_text_len(value, field, config)
}

/// Validates the length of an optional free-text field. Empty is allowed.
///
/// # Errors
///
/// Returns [`ValidationError`] if the value is longer than `config.max_text_bytes`.
pub fn validate_text_len(
    value: &str,
    field: &str,
    config: &ValidationConfig,
) -> Result<(), ValidationError> {
    if value.len() > config.max_text_bytes {
        return Err(ValidationError::new(
            field,
            format!(
                "length {} bytes exceeds maximum {} bytes",
                value.len(),
                config.max_text_bytes
            ),
        ));
    }
    Ok(())
}

/// Validates that a voter born on `date_of_birth` is old enough on `today`.
///
/// # Errors
///
/// Returns [`ValidationError`] if the birth date lies after `today` or the
/// voter is younger than `config.min_voter_age` whole years.
pub fn validate_age(
    date_of_birth: NaiveDate,
    today: NaiveDate,
    config: &ValidationConfig,
) -> Result<(), ValidationError> {
    match today.years_since(date_of_birth) {
        Some(age) if age >= config.min_voter_age => Ok(()),
        Some(_) => Err(ValidationError::new(
            "dateOfBirth",
            format!("voter must be at least {} years old", config.min_voter_age),
        )),
        None => Err(ValidationError::new("dateOfBirth", "must not be in the future")),
    }
}

/// Validates a client-supplied identifier.
///
/// # Errors
///
/// Returns [`ValidationError`] if the identifier is zero.
pub fn validate_identifier(value: u64, field: &str) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::new(field, "must be a positive integer"));
    }
    Ok(())
}

/// Validates an email address loosely: exactly one `@` with both sides non-empty.
///
/// # Errors
///
/// Returns [`ValidationError`] if the address does not have that shape.
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    match value.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            Ok(())
        },
        _ => Err(ValidationError::new("email", "must be a valid email address")),
    }
}

/// Validates that an election closes after it opens.
///
/// # Errors
///
/// Returns [`ValidationError`] if `end` is not strictly after `start`.
pub fn validate_election_window(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if end <= start {
        return Err(ValidationError::new("endDate", "must be after startDate"));
    }
    Ok(())
}

/// Validates every field of a voter registration.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
pub fn validate_new_voter(
    voter: &NewVoter,
    today: NaiveDate,
    config: &ValidationConfig,
) -> Result<(), ValidationError> {
    validate_national_id(&voter.national_id, config)?;
    validate_text(&voter.name, "name", config)?;
    validate_age(voter.date_of_birth, today, config)?;
    validate_text(&voter.address, "address", config)?;
    validate_phone_number(&voter.phone_number, config)?;
    Ok(())
}

/// Validates every field of a new election.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
pub fn validate_new_election(
    election: &NewElection,
    config: &ValidationConfig,
) -> Result<(), ValidationError> {
    validate_text(&election.title, "title", config)?;
    validate_text_len(&election.description, "description", config)?;
    validate_text(&election.constituency, "constituency", config)?;
    validate_election_window(election.start_date, election.end_date)?;
    Ok(())
}

/// Validates every field of a new candidate.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
pub fn validate_new_candidate(
    candidate: &NewCandidate,
    config: &ValidationConfig,
) -> Result<(), ValidationError> {
    validate_text(&candidate.name, "name", config)?;
    validate_text(&candidate.party, "party", config)?;
    validate_text(&candidate.symbol, "symbol", config)?;
    validate_text_len(&candidate.constituency, "constituency", config)?;
    validate_text_len(&candidate.description, "description", config)?;
    if let Some(url) = &candidate.image_url {
        validate_text_len(url, "imageUrl", config)?;
    }
    Ok(())
}
