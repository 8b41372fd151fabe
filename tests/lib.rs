//! Helpers for driving the match API router in-process.

use std::sync::Arc;
use std::time::Duration;

use api::config::{ApiConfig, LogFormat, MatchStore};
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use shared::repositories::memory_match_repository::InMemoryMatchRepository;
use shared::services::access_policy::JwtAccessPolicy;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

pub fn test_config() -> ApiConfig {
    ApiConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        store: MatchStore::Memory,
        request_timeout: Duration::from_secs(5),
        max_move_attempts: 3,
        local_bind_addr: None,
        log_format: LogFormat::Text,
    }
}

/// Router over a fresh in-memory store.
pub fn create_test_app() -> Router {
    let repository = Arc::new(InMemoryMatchRepository::new());
    api::create_app(api::build_state(&test_config(), repository))
}

pub fn token_for(player_id: &str, is_admin: bool) -> String {
    JwtAccessPolicy::new(TEST_JWT_SECRET.to_string())
        .issue_token(player_id, is_admin)
        .expect("Failed to issue test token")
        .token
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub struct TestRequest {
    method: Method,
    uri: String,
    token: Option<String>,
    body: Option<String>,
    headers: Vec<(&'static str, String)>,
}

impl TestRequest {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        TestRequest {
            method,
            uri: uri.into(),
            token: None,
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn as_player(mut self, player_id: &str) -> Self {
        self.token = Some(token_for(player_id, false));
        self
    }

    pub fn as_admin(mut self, admin_id: &str) -> Self {
        self.token = Some(token_for(admin_id, true));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body.to_string());
        self
    }

    /// Sends `body` verbatim under a JSON content type.
    pub fn raw_json(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub async fn send(self, app: &Router) -> TestResponse {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        if let Some(token) = &self.token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        for (name, value) in &self.headers {
            builder = builder.header(*name, value);
        }
        let request = match self.body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body)),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = app
            .clone()
            .oneshot(request)
            .await
            .expect("Router call failed");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse { status, body }
    }
}

/// Creates a blitz match between `player_a` and `player_b` and returns its id.
pub async fn create_match(app: &Router, player_a: &str, player_b: &str) -> String {
    let response = TestRequest::new(Method::POST, "/matches")
        .as_player(player_a)
        .json(serde_json::json!({
            "player_a_id": player_a,
            "player_b_id": player_b,
            "game_type": "blitz",
        }))
        .send(app)
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body["match"]["id"]
        .as_str()
        .expect("Created match has no id")
        .to_string()
}

pub async fn submit_move(app: &Router, match_id: &str, player_id: &str, notation: &str) -> TestResponse {
    TestRequest::new(Method::POST, format!("/matches/{}/moves", match_id))
        .as_player(player_id)
        .json(serde_json::json!({ "move": notation }))
        .send(app)
        .await
}
