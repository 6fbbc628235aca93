//! Relation endpoint: a user marking up their own shelf.
//!
//! `PATCH /api/books/:id/relation` operates on the requester's relation row
//! for that book, creating it lazily on first touch. Only the provided
//! fields change, so the operation is idempotent.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::patch;
use axum::{Json, Router};
use serde::Serialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use store_core::{validation, RelationPatch, UserBookRelation};

/// Routes under `/api`.
pub fn relation_routes() -> Router<Arc<AppState>> {
    Router::new().route("/books/:id/relation", patch(patch_relation))
}

/// The serialized relation representation.
#[derive(Debug, Serialize)]
pub struct RelationResponse {
    pub book: i64,
    pub like: bool,
    pub in_bookmarks: bool,
    pub rate: Option<i64>,
}

impl From<UserBookRelation> for RelationResponse {
    fn from(relation: UserBookRelation) -> Self {
        RelationResponse {
            book: relation.book_id,
            like: relation.like,
            in_bookmarks: relation.in_bookmarks,
            rate: relation.rate,
        }
    }
}

/// PATCH /api/books/:id/relation
async fn patch_relation(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(book_id): Path<i64>,
    Json(patch): Json<RelationPatch>,
) -> ApiResult<Json<RelationResponse>> {
    if let Some(rate) = patch.rate {
        validation::validate_rate(rate)?;
    }

    // The relation row is keyed on the book; a missing book is a 404, not a
    // silent insert against a dangling id
    state
        .db
        .books()
        .get_by_id(book_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let relation = state
        .db
        .relations()
        .upsert(user.id, book_id, &patch)
        .await?;

    info!(user_id = user.id, book_id, "Relation updated");

    Ok(Json(relation.into()))
}
