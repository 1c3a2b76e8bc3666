//! Identity verification, admin login, logout, and session status.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use ballot_ledger_types::{AdminProfile, NewVoter, Voter};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use super::{
    ApiResult, Message, blocking,
    error::{ApiError, RegistrySnafu, StoreSnafu},
    extract::{CurrentSession, JsonBody, OptionalSession},
    ok,
};
use crate::{session::Identity, state::AppState};

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/verify-identity", post(verify_identity))
        .route("/admin-login", post(admin_login))
        .route("/logout", post(logout))
        .route("/status", get(status))
}

#[derive(Debug, Serialize)]
struct Registered {
    voter: Voter,
    token: String,
    message: &'static str,
}

/// Registers a voter and opens a voter session.
async fn verify_identity(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewVoter>,
) -> ApiResult<Registered> {
    let registry = state.registry.clone();
    let voter = blocking(move || {
        registry.register_voter(input).context(RegistrySnafu { action: "verify identity" })
    })
    .await?;

    let token = state.sessions.issue(Identity::Voter(voter.id));
    ok(Registered {
        voter,
        token,
        message: "Identity verification successful. You are now registered to vote.",
    })
}

#[derive(Debug, Deserialize)]
struct AdminLogin {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct LoggedIn {
    admin: AdminProfile,
    token: String,
    message: &'static str,
}

async fn admin_login(
    State(state): State<AppState>,
    JsonBody(login): JsonBody<AdminLogin>,
) -> ApiResult<LoggedIn> {
    let registry = state.registry.clone();
    let admin = blocking(move || {
        registry
            .authenticate_admin(&login.email, &login.password)
            .context(StoreSnafu { action: "log in" })
    })
    .await?
    .ok_or(ApiError::InvalidCredentials)?;

    let token = state.sessions.issue(Identity::Admin(admin.id));
    tracing::info!(admin_id = %admin.id, "Admin logged in");
    ok(LoggedIn { admin: AdminProfile::from(&admin), token, message: "Admin login successful" })
}

async fn logout(State(state): State<AppState>, session: CurrentSession) -> ApiResult<Message> {
    state.sessions.revoke(&session.token);
    ok(Message { message: "Logged out successfully" })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthStatus {
    authenticated: bool,
    user_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    voter: Option<Voter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    admin: Option<AdminProfile>,
}

impl AuthStatus {
    fn anonymous() -> Self {
        Self { authenticated: false, user_type: None, voter: None, admin: None }
    }
}

async fn status(
    State(state): State<AppState>,
    OptionalSession(session): OptionalSession,
) -> ApiResult<AuthStatus> {
    let Some(session) = session else {
        return ok(AuthStatus::anonymous());
    };

    let registry = state.registry.clone();
    let identity = session.identity;
    let status = blocking(move || {
        let action = "check authentication status";
        let status = match identity {
            Identity::Voter(id) => registry.get_voter(id).context(StoreSnafu { action })?.map(
                |voter| AuthStatus {
                    authenticated: true,
                    user_type: Some(identity.user_type()),
                    voter: Some(voter),
                    admin: None,
                },
            ),
            Identity::Admin(id) => registry.get_admin(id).context(StoreSnafu { action })?.map(
                |admin| AuthStatus {
                    authenticated: true,
                    user_type: Some(identity.user_type()),
                    voter: None,
                    admin: Some(AdminProfile::from(&admin)),
                },
            ),
        };
        Ok(status.unwrap_or_else(AuthStatus::anonymous))
    })
    .await?;
    ok(status)
}
