//! Administrator endpoints. Every route requires an admin session.

use axum::{
    Router,
    extract::State,
    routing::{get, patch},
};
use ballot_ledger_types::{
    Candidate, DashboardStats, Election, ElectionId, ElectionResults, NewCandidate, NewElection,
    Voter, VoterId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use super::{
    ApiResult, blocking,
    error::{RegistrySnafu, StoreSnafu},
    extract::{AdminSession, JsonBody, PathId},
    ok, voting,
};
use crate::state::AppState;

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/elections", get(list_elections).post(create_election))
        .route("/elections/{id}/status", patch(set_status))
        .route("/elections/{id}/candidates", get(list_candidates).post(add_candidate))
        .route("/elections/{id}/results", get(results))
        .route("/voters", get(voters))
}

async fn dashboard(
    State(state): State<AppState>,
    AdminSession(_): AdminSession,
) -> ApiResult<DashboardStats> {
    let stats = blocking(move || {
        state.stats.dashboard().context(StoreSnafu { action: "fetch dashboard data" })
    })
    .await?;
    ok(stats)
}

async fn list_elections(
    State(state): State<AppState>,
    AdminSession(_): AdminSession,
) -> ApiResult<Vec<Election>> {
    let elections = blocking(move || {
        state.registry.list_elections().context(StoreSnafu { action: "fetch elections" })
    })
    .await?;
    ok(elections)
}

#[derive(Debug, Serialize)]
struct ElectionSaved {
    election: Election,
    message: &'static str,
}

async fn create_election(
    State(state): State<AppState>,
    AdminSession(admin_id): AdminSession,
    JsonBody(input): JsonBody<NewElection>,
) -> ApiResult<ElectionSaved> {
    let election = blocking(move || {
        state.registry.create_election(input).context(RegistrySnafu { action: "create election" })
    })
    .await?;
    tracing::info!(%admin_id, election_id = %election.id, "Election created by admin");
    ok(ElectionSaved { election, message: "Election created successfully" })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusUpdate {
    is_active: bool,
}

/// Toggles the active flag that gates ballot acceptance.
async fn set_status(
    State(state): State<AppState>,
    AdminSession(admin_id): AdminSession,
    PathId(election_id): PathId,
    JsonBody(update): JsonBody<StatusUpdate>,
) -> ApiResult<ElectionSaved> {
    let election = blocking(move || {
        state
            .registry
            .set_election_active(ElectionId::new(election_id), update.is_active)
            .context(RegistrySnafu { action: "update election status" })
    })
    .await?;
    tracing::info!(
        %admin_id,
        election_id = %election.id,
        is_active = election.is_active,
        "Election status updated by admin"
    );
    let message = if election.is_active {
        "Election activated successfully"
    } else {
        "Election deactivated successfully"
    };
    ok(ElectionSaved { election, message })
}

async fn list_candidates(
    State(state): State<AppState>,
    AdminSession(_): AdminSession,
    PathId(election_id): PathId,
) -> ApiResult<Vec<Candidate>> {
    let candidates = blocking(move || {
        state
            .registry
            .list_candidates(ElectionId::new(election_id))
            .context(StoreSnafu { action: "fetch candidates" })
    })
    .await?;
    ok(candidates)
}

#[derive(Debug, Serialize)]
struct CandidateSaved {
    candidate: Candidate,
    message: &'static str,
}

async fn add_candidate(
    State(state): State<AppState>,
    AdminSession(admin_id): AdminSession,
    PathId(election_id): PathId,
    JsonBody(input): JsonBody<NewCandidate>,
) -> ApiResult<CandidateSaved> {
    let candidate = blocking(move || {
        state
            .registry
            .add_candidate(ElectionId::new(election_id), input)
            .context(RegistrySnafu { action: "add candidate" })
    })
    .await?;
    tracing::info!(%admin_id, candidate_id = %candidate.id, "Candidate added by admin");
    ok(CandidateSaved { candidate, message: "Candidate added successfully" })
}

async fn results(
    state: State<AppState>,
    AdminSession(_): AdminSession,
    election_id: PathId,
) -> ApiResult<ElectionResults> {
    voting::results(state, election_id).await
}

/// Registered voter as listed to administrators.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoterSummary {
    id: VoterId,
    name: String,
    national_id: String,
    is_verified: bool,
    has_voted: bool,
    created_at: DateTime<Utc>,
}

impl From<Voter> for VoterSummary {
    fn from(voter: Voter) -> Self {
        Self {
            id: voter.id,
            name: voter.name,
            national_id: voter.national_id,
            is_verified: voter.is_verified,
            has_voted: voter.has_voted,
            created_at: voter.created_at,
        }
    }
}

async fn voters(
    State(state): State<AppState>,
    AdminSession(_): AdminSession,
) -> ApiResult<Vec<VoterSummary>> {
    let voters = blocking(move || {
        state.registry.list_voters().context(StoreSnafu { action: "fetch voters" })
    })
    .await?;
    ok(voters.into_iter().map(VoterSummary::from).collect())
}
