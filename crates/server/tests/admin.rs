//! Administrator endpoints over HTTP.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::disallowed_methods)]

mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use common::{TestApp, error_message};
use serde_json::{Value, json};

fn election_body(title: &str) -> Value {
    let start = Utc::now();
    json!({
        "title": title,
        "description": "By-election",
        "startDate": start,
        "endDate": start + Duration::hours(8),
        "constituency": "North",
    })
}

#[tokio::test]
async fn test_admin_routes_require_admin_session() {
    let app = TestApp::new();
    let voter = app.voter_token(1).await;
    for uri in ["/api/admin/dashboard", "/api/admin/elections", "/api/admin/voters"] {
        for token in [None, Some(voter.as_str())] {
            let (status, body) = app.get(uri, token).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(error_message(&body), "Admin authentication required");
        }
    }
}

#[tokio::test]
async fn test_election_lifecycle() {
    let app = TestApp::new();
    let admin = app.admin_token().await;

    let (status, body) =
        app.post("/api/admin/elections", Some(&admin), election_body("North By-election")).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["message"], json!("Election created successfully"));
    let election = &body["data"]["election"];
    assert_eq!(election["isActive"], json!(false));
    let id = election["id"].as_u64().unwrap();

    // inactive elections are hidden from voters
    let (_, body) = app.get("/api/voting/elections", None).await;
    assert_eq!(body["data"], json!([]));

    let (status, body) = app
        .post(
            &format!("/api/admin/elections/{id}/candidates"),
            Some(&admin),
            json!({"name": "Asha", "party": "Unity", "symbol": "Sun"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["message"], json!("Candidate added successfully"));
    assert_eq!(body["data"]["candidate"]["constituency"], json!("North"));
    assert_eq!(body["data"]["candidate"]["voteCount"], json!(0));

    let uri = format!("/api/admin/elections/{id}/status");
    let (status, body) =
        app.send(Method::PATCH, &uri, Some(&admin), Some(json!({"isActive": true}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["election"]["isActive"], json!(true));
    assert_eq!(body["data"]["message"], json!("Election activated successfully"));

    let (_, body) = app.get("/api/voting/elections", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) =
        app.send(Method::PATCH, &uri, Some(&admin), Some(json!({"isActive": false}))).await;
    assert_eq!(body["data"]["message"], json!("Election deactivated successfully"));

    let (status, body) = app.get("/api/admin/elections", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) =
        app.get(&format!("/api/admin/elections/{id}/candidates"), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], json!("Asha"));
}

#[tokio::test]
async fn test_invalid_election_window_is_400() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let mut body = election_body("Backwards");
    body["endDate"] = body["startDate"].clone();

    let (status, response) = app.post("/api/admin/elections", Some(&admin), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&response).starts_with("endDate"), "{response}");
}

#[tokio::test]
async fn test_mutations_on_missing_election_are_404() {
    let app = TestApp::new();
    let admin = app.admin_token().await;

    let (status, body) = app
        .send(
            Method::PATCH,
            "/api/admin/elections/42/status",
            Some(&admin),
            Some(json!({"isActive": true})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&body), "Election not found");

    let (status, body) = app
        .post(
            "/api/admin/elections/42/candidates",
            Some(&admin),
            json!({"name": "Asha", "party": "Unity", "symbol": "Sun"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&body), "Election not found");
}

#[tokio::test]
async fn test_dashboard_and_voters() {
    let app = TestApp::new();
    let (election, candidates) = app.election(true, &["Asha", "Bala"]);
    let voters: Vec<String> = {
        let mut tokens = Vec::new();
        for n in 1..=4 {
            tokens.push(app.voter_token(n).await);
        }
        tokens
    };
    for token in &voters[..3] {
        let body = json!({"candidateId": candidates[0].value(), "electionId": election.value()});
        let (status, _) = app.post("/api/voting/vote", Some(token), body).await;
        assert_eq!(status, StatusCode::OK);
    }

    let admin = app.admin_token().await;
    let (status, body) = app.get("/api/admin/dashboard", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["totalVoters"], json!(4));
    assert_eq!(data["totalVotes"], json!(3));
    assert_eq!(data["turnoutPercentage"], json!(75));
    assert_eq!(data["activeElections"], json!(1));
    assert_eq!(data["recentVotes"].as_array().unwrap().len(), 3);
    assert_eq!(data["recentVotes"][0]["candidateName"], json!("Asha"));
    assert_eq!(data["elections"][0]["id"], json!(election.value()));

    let (status, body) = app.get("/api/admin/voters", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body["data"].as_array().unwrap();
    assert_eq!(listed.len(), 4);
    // newest first
    assert_eq!(listed[0]["nationalId"], json!("000000000004"));
    assert_eq!(listed[0]["hasVoted"], json!(false));
    assert_eq!(listed[3]["hasVoted"], json!(true));
    assert!(listed[0].get("address").is_none());

    let (status, body) = app
        .get(&format!("/api/admin/elections/{}/results", election.value()), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalVotes"], json!(3));
    assert_eq!(body["data"]["results"][0]["percentage"], json!(100));
}
