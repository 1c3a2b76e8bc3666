//! Request extractors.
//!
//! Every rejection is an [`ApiError`], so clients always receive the JSON
//! error envelope, never axum's plain-text rejections.

use std::convert::Infallible;

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header::AUTHORIZATION, request::Parts},
};
use ballot_ledger_types::{AdminId, VoterId, validation::validate_identifier};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::{session::Identity, state::AppState};

/// JSON body whose rejection is a 400 in the error envelope.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::BadRequest { message: rejection.body_text() }),
        }
    }
}

/// A positive integer identifier from the single path parameter.
#[derive(Debug, Clone, Copy)]
pub struct PathId(pub u64);

impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest { message: rejection.body_text() })?;
        let id = raw.parse::<u64>().unwrap_or(0);
        validate_identifier(id, "id")
            .map_err(|error| ApiError::BadRequest { message: error.to_string() })?;
        Ok(Self(id))
    }
}

/// The bearer token of the request, if the header is well formed.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Any live session.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    /// The presented token.
    pub token: String,
    /// Who it belongs to.
    pub identity: Identity,
}

impl CurrentSession {
    fn resolve(parts: &Parts, state: &AppState) -> Option<Self> {
        let token = bearer_token(parts)?;
        let identity = state.sessions.resolve(token)?;
        Some(Self { token: token.to_string(), identity })
    }
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Self::resolve(parts, state)
            .ok_or(ApiError::Unauthenticated { message: "Authentication required" })
    }
}

/// A live session, or none. Never rejects.
#[derive(Debug, Clone)]
pub struct OptionalSession(pub Option<CurrentSession>);

impl FromRequestParts<AppState> for OptionalSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(CurrentSession::resolve(parts, state)))
    }
}

/// A live voter session.
#[derive(Debug, Clone, Copy)]
pub struct VoterSession(pub VoterId);

impl FromRequestParts<AppState> for VoterSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match CurrentSession::resolve(parts, state).map(|s| s.identity) {
            Some(Identity::Voter(voter_id)) => Ok(Self(voter_id)),
            _ => Err(ApiError::Unauthenticated { message: "Authentication required" }),
        }
    }
}

/// A live administrator session.
#[derive(Debug, Clone, Copy)]
pub struct AdminSession(pub AdminId);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match CurrentSession::resolve(parts, state).map(|s| s.identity) {
            Some(Identity::Admin(admin_id)) => Ok(Self(admin_id)),
            _ => Err(ApiError::Unauthenticated { message: "Admin authentication required" }),
        }
    }
}
