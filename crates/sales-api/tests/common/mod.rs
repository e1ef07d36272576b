//! Shared fixtures for the HTTP integration tests

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::Duration;
use sales_api::{AppState, create_router};
use sales_auth::{Authenticator, DEFAULT_TOKEN_TTL_SECS, JwtManager, PasswordHasher, Secret};
use sales_db::{Database, NewUser};
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &str = "integration-secret";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

/// Build an app over a fresh in-memory store seeded with
/// `admin`/`admin` (admin + handler), `handler`/`handler` (handler)
/// and `user`/`user` (no roles).
pub async fn spawn_app() -> TestApp {
    spawn_app_with_static(None).await
}

pub async fn spawn_app_with_static(static_dir: Option<&Path>) -> TestApp {
    let db = Database::in_memory().await.expect("in-memory database");
    let secret = Secret::new(SECRET);
    let hasher = PasswordHasher::new(secret.clone(), 4);
    let jwt = Arc::new(JwtManager::new(
        &secret,
        Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
    ));
    let authenticator = Arc::new(
        Authenticator::new(db.clone(), hasher.clone(), jwt.clone()).expect("authenticator"),
    );

    for (name, is_admin, is_handler) in [
        ("admin", true, true),
        ("handler", false, true),
        ("user", false, false),
    ] {
        db.insert_user(NewUser {
            username: name.to_string(),
            password_hash: hasher.hash(name).expect("hash"),
            is_admin,
            is_handler,
        })
        .await
        .expect("seed user");
    }

    let state = AppState::new(db, jwt, hasher, authenticator);
    TestApp {
        router: create_router(state.clone(), static_dir),
        state,
    }
}

impl TestApp {
    /// Send a request and decode the JSON envelope
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = self.router.clone().oneshot(request).await.expect("request");
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("parse JSON")
        };
        (status, json)
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, token, Some(body)).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", uri, token, None).await
    }

    /// Log in and return the bearer token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/login",
                None,
                serde_json::json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["payload"]["token"]
            .as_str()
            .expect("token in payload")
            .to_string()
    }
}
