//! Public voting endpoints.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use ballot_ledger_types::{
    Ballot, BallotReceipt, Candidate, CandidateId, Election, ElectionId, ElectionResults,
    validation::validate_identifier,
};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use super::{
    ApiResult, blocking,
    error::{ApiError, BallotSnafu, StoreSnafu},
    extract::{JsonBody, PathId, VoterSession},
    ok,
};
use crate::state::AppState;

pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/elections", get(active_elections))
        .route("/elections/{id}/candidates", get(candidates))
        .route("/elections/{id}/results", get(results))
        .route("/vote", post(cast_vote))
        .route("/my-votes", get(my_votes))
}

async fn active_elections(State(state): State<AppState>) -> ApiResult<Vec<Election>> {
    let elections = blocking(move || {
        state.registry.list_active_elections().context(StoreSnafu { action: "fetch elections" })
    })
    .await?;
    ok(elections)
}

async fn candidates(
    State(state): State<AppState>,
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

/// Ranked tally. Also mounted under the admin routes.
pub(crate) async fn results(
    State(state): State<AppState>,
    PathId(election_id): PathId,
) -> ApiResult<ElectionResults> {
    let results = blocking(move || {
        state
            .tally
            .get_results(ElectionId::new(election_id))
            .context(StoreSnafu { action: "fetch election results" })
    })
    .await?;
    ok(results)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VoteRequest {
    candidate_id: u64,
    election_id: u64,
}

#[derive(Debug, Serialize)]
struct VoteCast {
    vote: Ballot,
    message: &'static str,
}

/// Casts the session voter's single ballot.
async fn cast_vote(
    State(state): State<AppState>,
    VoterSession(voter_id): VoterSession,
    JsonBody(request): JsonBody<VoteRequest>,
) -> ApiResult<VoteCast> {
    for (value, field) in
        [(request.candidate_id, "candidateId"), (request.election_id, "electionId")]
    {
        validate_identifier(value, field)
            .map_err(|error| ApiError::BadRequest { message: error.to_string() })?;
    }
    let candidate_id = CandidateId::new(request.candidate_id);
    let election_id = ElectionId::new(request.election_id);

    let ballot = blocking(move || {
        state
            .ledger
            .cast_ballot(voter_id, candidate_id, election_id)
            .context(BallotSnafu { action: "cast vote" })
    })
    .await?;
    ok(VoteCast { vote: ballot, message: "Vote cast successfully" })
}

async fn my_votes(
    State(state): State<AppState>,
    VoterSession(voter_id): VoterSession,
) -> ApiResult<Vec<BallotReceipt>> {
    let history = blocking(move || {
        state.stats.voting_history(voter_id).context(StoreSnafu { action: "fetch voting history" })
    })
    .await?;
    ok(history)
}
