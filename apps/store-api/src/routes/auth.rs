//! Authentication endpoint: exchange credentials for a JWT access token.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::verify_password;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Routes under `/auth`.
pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new().route("/token", post(issue_token))
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// POST /auth/token
///
/// Verifies the password against the stored argon2 hash and issues an access
/// token. Accounts without a stored hash (identity rows imported from
/// elsewhere) cannot log in.
async fn issue_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    info!(username = %request.username, "Token request");

    let credentials = state
        .db
        .users()
        .get_credentials(&request.username)
        .await?;

    let Some(credentials) = credentials else {
        warn!(username = %request.username, "Unknown username");
        return Err(ApiError::BadCredentials);
    };

    let Some(hash) = credentials.password_hash.as_deref() else {
        warn!(username = %request.username, "Account has no login credentials");
        return Err(ApiError::BadCredentials);
    };

    if !verify_password(&request.password, hash) {
        warn!(username = %request.username, "Password mismatch");
        return Err(ApiError::BadCredentials);
    }

    let access_token = state.jwt.generate_token(&credentials.user)?;

    info!(user_id = credentials.user.id, "Token issued");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt.access_lifetime_secs(),
    }))
}
