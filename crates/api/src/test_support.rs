//! Router harness for handler tests.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, StatusCode, header},
};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tally_core::clock::FixedClock;
use tally_shared::{JwtConfig, JwtService};
use tower::ServiceExt;

use crate::{AppState, CookieSettings, create_router};

/// `2024-03-01T00:00:00Z`.
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_709_251_200, 0).unwrap()
}

/// A router over fresh in-memory storage and a frozen clock.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new(now: DateTime<Utc>) -> Self {
        let state = AppState {
            storage: tally_db::memory_storage(),
            jwt_service: Arc::new(JwtService::new(JwtConfig {
                secret: "test-secret-key-that-is-long-enough".to_string(),
                access_token_expires_secs: 900,
                refresh_token_expires_secs: 604_800,
            })),
            clock: Arc::new(FixedClock(now)),
            cookies: CookieSettings {
                domain: "localhost".to_string(),
                secure: false,
            },
            started_at: Instant::now(),
        };
        Self {
            router: create_router(state.clone()),
            state,
        }
    }

    pub async fn raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.raw(method, uri, token, body).await;
        let status = response.status();
        (status, body_json(response).await)
    }

    /// Registers `username` and returns its access token.
    pub async fn register(&self, username: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({ "username": username, "password": "correct horse" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body["accessToken"].as_str().unwrap().to_string()
    }

    /// Creates a budget and returns its ID.
    pub async fn create_budget(&self, token: &str, body: Value) -> String {
        let (status, body) = self
            .send(Method::POST, "/budget", Some(token), Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create budget failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}
