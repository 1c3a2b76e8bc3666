//! Error codes shared by every layer of the ballot ledger.
//!
//! Each layer defines its own snafu error enum (`StoreError`, `BallotError`,
//! `RegistryError`, `ApiError`). All of them map onto an [`ErrorCode`], which
//! carries a stable numeric identifier, a rejection/fault classification, and
//! the one-sentence message shown to users.

use core::fmt;

/// Machine-readable error codes.
///
/// | Range     | Domain    | Examples                                       |
/// |-----------|-----------|------------------------------------------------|
/// | 1000–1099 | Rejection | Already voted, inactive election, bad input    |
/// | 2000–2099 | Auth      | Missing session, bad credentials               |
/// | 3000–3099 | Fault     | Store failure, serialization, internal         |
///
/// Rejections are business-rule outcomes and are never retried. Faults are
/// infrastructure failures whose details stay in the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // --- Rejections (1000–1099) ---
    /// The voter already has a ballot, or does not exist.
    AlreadyVoted = 1000,
    /// The election is missing or its active flag is clear.
    ElectionNotActive = 1001,
    /// The candidate is missing or belongs to another election.
    InvalidCandidate = 1002,
    /// A voter with the same national id is already registered.
    AlreadyRegistered = 1003,
    /// Request input failed validation.
    InvalidArgument = 1004,
    /// The addressed resource does not exist.
    NotFound = 1005,
    /// An admin with the same email already exists.
    Conflict = 1006,

    // --- Auth (2000–2099) ---
    /// No valid session accompanies the request.
    Unauthenticated = 2000,
    /// Admin email or password did not match.
    InvalidCredentials = 2001,

    // --- Faults (3000–3099) ---
    /// The data store failed.
    Storage = 3000,
    /// A stored row could not be encoded or decoded.
    Serialization = 3001,
    /// Unexpected state.
    Internal = 3002,
}

impl ErrorCode {
    /// Returns the numeric code value.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Whether the code is a business-rule rejection rather than a fault.
    #[must_use]
    pub const fn is_rejection(self) -> bool {
        (self as u16) < 2000
    }

    /// Whether the code is an infrastructure fault.
    #[must_use]
    pub const fn is_fault(self) -> bool {
        (self as u16) >= 3000
    }

    /// Returns the one-sentence message shown to users.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::AlreadyVoted => "You have already cast your vote",
            Self::ElectionNotActive => "Election is not active",
            Self::InvalidCandidate => "Invalid candidate",
            Self::AlreadyRegistered => "Voter with this national ID already exists",
            Self::InvalidArgument => "Invalid request",
            Self::NotFound => "Resource not found",
            Self::Conflict => "Resource already exists",
            Self::Unauthenticated => "Authentication required",
            Self::InvalidCredentials => "Invalid email or password",
            Self::Storage | Self::Serialization | Self::Internal => "Internal server error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}
