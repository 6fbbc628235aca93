//! HTTP route modules and the combined router.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

pub mod auth;
pub mod books;
pub mod relations;

/// Builds the combined router with all endpoints.
///
/// ```text
/// /health                      liveness + db ping
/// /auth/token                  credentials → JWT
/// /api/books                   listing (filter/search/ordering), create
/// /api/books/:id               detail, update, patch, delete
/// /api/books/:id/relation      the requester's like/bookmark/rate row
/// ```
pub fn build_router(state: Arc<AppState>) -> Router {
    // Permissive CORS; this API carries no cookies, auth is bearer-token only
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth::auth_routes())
        .nest("/api", books::book_routes().merge(relations::relation_routes()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let database = state.db.health_check().await;
    Json(json!({
        "status": if database { "ok" } else { "degraded" },
        "database": database,
    }))
}
