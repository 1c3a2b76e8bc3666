//! HTTP error mapping.
//!
//! | Code range  | Status |
//! |-------------|--------|
//! | Rejection   | 400 (404 for `NotFound`) |
//! | Auth        | 401    |
//! | Fault       | 500    |
//!
//! Fault details are logged and never sent to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ballot_ledger_storage::{BallotError, RegistryError, StoreError};
use ballot_ledger_types::ErrorCode;
use serde::Serialize;
use snafu::Snafu;

/// Error returned by every handler.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ApiError {
    /// A cast-ballot attempt failed.
    #[snafu(display("Failed to {action}: {source}"))]
    Ballot {
        /// What the handler was doing.
        action: &'static str,
        /// Ledger error.
        source: BallotError,
    },

    /// A registry write failed.
    #[snafu(display("Failed to {action}: {source}"))]
    Registry {
        /// What the handler was doing.
        action: &'static str,
        /// Registry error.
        source: RegistryError,
    },

    /// A read failed.
    #[snafu(display("Failed to {action}: {source}"))]
    Store {
        /// What the handler was doing.
        action: &'static str,
        /// Store error.
        source: StoreError,
    },

    /// The blocking worker running a storage call panicked or was cancelled.
    #[snafu(display("Worker task failed: {source}"))]
    Worker {
        /// Join error.
        source: tokio::task::JoinError,
    },

    /// Malformed JSON, path, or field.
    #[snafu(display("{message}"))]
    BadRequest {
        /// Client-facing description.
        message: String,
    },

    /// The addressed entity does not exist.
    #[snafu(display("{what} not found"))]
    NotFound {
        /// Capitalized entity name.
        what: &'static str,
    },

    /// Missing, unknown, expired, or wrong-kind session.
    #[snafu(display("{message}"))]
    Unauthenticated {
        /// Client-facing description.
        message: &'static str,
    },

    /// Admin email or password did not match.
    #[snafu(display("Invalid email or password"))]
    InvalidCredentials,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl ApiError {
    /// Machine-readable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Ballot { source, .. } => source.code(),
            Self::Registry { source, .. } => source.code(),
            Self::Store { source, .. } => source.code(),
            Self::Worker { .. } => ErrorCode::Internal,
            Self::BadRequest { .. } => ErrorCode::InvalidArgument,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Unauthenticated { .. } => ErrorCode::Unauthenticated,
            Self::InvalidCredentials => ErrorCode::InvalidCredentials,
        }
    }

    /// HTTP status.
    pub fn status(&self) -> StatusCode {
        let code = self.code();
        if code == ErrorCode::NotFound {
            StatusCode::NOT_FOUND
        } else if code.is_rejection() {
            StatusCode::BAD_REQUEST
        } else if code.is_fault() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::UNAUTHORIZED
        }
    }

    /// The one sentence shown to the client.
    pub fn message(&self) -> String {
        let code = self.code();
        match self {
            _ if code.is_fault() => match self {
                Self::Ballot { action, .. }
                | Self::Registry { action, .. }
                | Self::Store { action, .. } => format!("Failed to {action}"),
                _ => code.user_message().to_string(),
            },
            Self::Registry { source: RegistryError::Invalid { source }, .. } => source.to_string(),
            Self::Registry { source: RegistryError::NotFound { entity, .. }, .. } => {
                format!("{} not found", capitalize(entity))
            },
            Self::BadRequest { message } => message.clone(),
            Self::Unauthenticated { message } => (*message).to_string(),
            Self::NotFound { what } => format!("{what} not found"),
            _ => code.user_message().to_string(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, code = %self.code(), "Request failed");
        } else {
            tracing::debug!(error = %self, code = %self.code(), "Request rejected");
        }
        let body = ErrorBody { success: false, error: self.message() };
        (status, Json(body)).into_response()
    }
}
