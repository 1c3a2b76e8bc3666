//! Shared setup for HTTP API tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use ballot_ledger_server::{api, state::AppState};
use ballot_ledger_storage::StorageEngine;
use ballot_ledger_test_utils::fixtures;
use ballot_ledger_types::{CandidateId, ElectionId, config::RuntimeConfig};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

/// A router over a fresh in-memory store, with one administrator.
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let engine = StorageEngine::open_in_memory().expect("open in-memory engine");
        let state = AppState::new(engine, &RuntimeConfig::default());
        state.registry.create_admin(fixtures::admin()).expect("create admin");
        let router = api::router(state.clone());
        Self { state, router }
    }

    /// Sends a request and returns the status and parsed JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            },
            None => Body::empty(),
        };
        self.send_request(builder.body(body).unwrap()).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    /// Verifies identity for voter `n` and returns the bearer token.
    pub async fn voter_token(&self, n: u64) -> String {
        let voter = fixtures::voter(n);
        let (status, body) = self.post("/api/auth/verify-identity", None, json!(voter)).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    /// Logs in the fixture administrator and returns the bearer token.
    pub async fn admin_token(&self) -> String {
        let (status, body) = self
            .post(
                "/api/auth/admin-login",
                None,
                json!({"email": fixtures::ADMIN_EMAIL, "password": fixtures::ADMIN_PASSWORD}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    /// Creates an election with candidates directly through the registry.
    pub fn election(&self, active: bool, names: &[&str]) -> (ElectionId, Vec<CandidateId>) {
        let election =
            self.state.registry.create_election(fixtures::election("General", active)).unwrap();
        let candidates = names
            .iter()
            .map(|name| {
                self.state.registry.add_candidate(election.id, fixtures::candidate(name)).unwrap().id
            })
            .collect();
        (election.id, candidates)
    }
}

/// Asserts the error envelope and returns its message.
pub fn error_message(body: &Value) -> &str {
    assert_eq!(body["success"], json!(false), "{body}");
    assert!(body.get("data").is_none(), "{body}");
    body["error"].as_str().unwrap()
}
