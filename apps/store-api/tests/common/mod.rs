//! Shared fixtures for the API integration tests.
//!
//! Each test gets an isolated in-memory database and drives the real router
//! through `tower::ServiceExt::oneshot` - no sockets involved.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use store_api::auth::hash_password;
use store_api::routes::build_router;
use store_api::{ApiConfig, AppState};
use store_core::{BookDraft, Money, User};
use store_db::{Database, DbConfig};

pub struct TestApp {
    pub state: Arc<AppState>,
    pub router: Router,
}

/// Builds an app over a fresh in-memory database.
pub async fn spawn_app() -> TestApp {
    let config = ApiConfig {
        http_port: 0,
        database_path: ":memory:".to_string(),
        jwt_secret: "test-secret".to_string(),
        jwt_access_lifetime_secs: 3600,
    };

    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let state = Arc::new(AppState::new(config, db));
    let router = build_router(state.clone());

    TestApp { state, router }
}

impl TestApp {
    /// Creates a user that cannot log in (identity row only).
    pub async fn user(&self, username: &str, is_staff: bool) -> User {
        self.state
            .db
            .users()
            .insert(username, "", "", is_staff, None)
            .await
            .unwrap()
    }

    /// Creates a user with full name fields.
    pub async fn named_user(&self, username: &str, first: &str, last: &str) -> User {
        self.state
            .db
            .users()
            .insert(username, first, last, false, None)
            .await
            .unwrap()
    }

    /// Creates a user with a password so /auth/token works for it.
    pub async fn user_with_password(&self, username: &str, password: &str) -> User {
        let hash = hash_password(password).unwrap();
        self.state
            .db
            .users()
            .insert(username, "", "", false, Some(&hash))
            .await
            .unwrap()
    }

    /// Mints a valid access token for a user.
    pub fn token_for(&self, user: &User) -> String {
        self.state.jwt.generate_token(user).unwrap()
    }

    /// Seeds a book directly through the repository.
    pub async fn book(
        &self,
        name: &str,
        author: &str,
        price_cents: i64,
        discount_cents: i64,
        owner_id: Option<i64>,
    ) -> i64 {
        self.state
            .db
            .books()
            .insert(&BookDraft {
                name: name.to_string(),
                author_name: author.to_string(),
                price: Money::from_cents(price_cents),
                discount: Money::from_cents(discount_cents),
                owner_id,
            })
            .await
            .unwrap()
            .id
    }

    /// Sends a request and returns (status, parsed JSON body).
    ///
    /// Bodyless responses (204) come back as Value::Null.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, body)
    }
}

/// Builds a GET request.
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Builds a JSON request, optionally authenticated.
pub fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: &Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

/// Builds a bodyless request (DELETE), optionally authenticated.
pub fn bare_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    builder.body(Body::empty()).unwrap()
}
