//! Error types for the REST API.
//!
//! Every failure a handler can produce funnels into [`ApiError`], which maps
//! onto an HTTP status plus a JSON body. Two body shapes exist:
//!
//! - `{"detail": "<message>"}` for auth/permission/not-found failures
//! - `{"<field>": ["<message>"]}` for validation failures, addressable per
//!   field so clients can attach messages to inputs

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::error;

use store_core::ValidationError;
use store_db::DbError;

/// REST API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No usable bearer token on a route that requires one.
    #[error("Authentication credentials were not provided.")]
    Unauthenticated,

    /// A token was presented but did not validate (bad signature, expired,
    /// or its user no longer exists).
    #[error("Invalid token.")]
    InvalidToken,

    /// Login failed.
    #[error("Invalid username or password.")]
    BadCredentials,

    /// The requester is authenticated but not allowed to do this.
    #[error("You do not have permission to perform this action.")]
    PermissionDenied,

    /// The addressed record does not exist.
    #[error("Not found.")]
    NotFound,

    /// Client-correctable input failure, reported per field.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Database failure surfaced to the client as a generic 500.
    #[error("Database error: {0}")]
    Database(DbError),

    /// Anything else that should never happen.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::NotFound,
            other => ApiError::Database(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body): (StatusCode, Value) = match &self {
            ApiError::Unauthenticated | ApiError::InvalidToken | ApiError::BadCredentials => {
                (StatusCode::UNAUTHORIZED, json!({ "detail": self.to_string() }))
            }

            ApiError::PermissionDenied => {
                (StatusCode::FORBIDDEN, json!({ "detail": self.to_string() }))
            }

            ApiError::NotFound => (StatusCode::NOT_FOUND, json!({ "detail": self.to_string() })),

            ApiError::Validation(err) => {
                let mut fields = serde_json::Map::new();
                fields.insert(err.field().to_string(), json!([err.to_string()]));
                (StatusCode::BAD_REQUEST, Value::Object(fields))
            }

            ApiError::Database(err) => {
                error!(error = %err, "Database failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "Internal server error." }),
                )
            }

            ApiError::Internal(msg) => {
                error!(error = %msg, "Internal failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "Internal server error." }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for handler functions.
pub type ApiResult<T> = Result<T, ApiError>;
