//! Book endpoints: the annotated listing plus CRUD.
//!
//! Reads are open to everyone. Creation requires a token and binds the new
//! book's owner to the requester. Update and delete run through the
//! owner-or-staff policy; a denial changes nothing and reports the fixed
//! permission message.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use store_core::{
    can_modify_book, validation, AnnotatedBook, BookDraft, BookPatch, BookQuery, Money, Reader,
    ValidationError,
};

/// Routes under `/api`.
pub fn book_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route(
            "/books/:id",
            get(get_book)
                .put(put_book)
                .patch(patch_book)
                .delete(delete_book),
        )
}

// =============================================================================
// Serializers
// =============================================================================

/// The serialized book representation.
#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub id: i64,
    pub name: String,
    pub price: String,
    pub author_name: String,
    pub annotated_likes: i64,
    pub rating: Option<String>,
    pub price_with_discount: String,
    pub owner_name: String,
    pub readers: Vec<Reader>,
}

impl From<AnnotatedBook> for BookResponse {
    fn from(annotated: AnnotatedBook) -> Self {
        BookResponse {
            id: annotated.book.id,
            name: annotated.book.name,
            price: annotated.book.price.to_string(),
            author_name: annotated.book.author_name,
            annotated_likes: annotated.annotated_likes,
            // Mean of the raw 1-5 rates, fixed to two decimals on the wire
            rating: annotated.rating.map(|rating| format!("{rating:.2}")),
            price_with_discount: annotated.price_with_discount.to_string(),
            owner_name: annotated.owner_name,
            readers: annotated.readers,
        }
    }
}

/// Writable book fields, shared by create and full update.
#[derive(Debug, Deserialize)]
pub struct BookPayload {
    pub name: String,
    pub author_name: String,
    pub price: Money,
    #[serde(default)]
    pub discount: Option<Money>,
}

impl BookPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_book_name(&self.name)?;
        validation::validate_author_name(&self.author_name)?;
        Ok(())
    }
}

// =============================================================================
// Listing
// =============================================================================

/// Raw listing query parameters, before validation.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub price: Option<String>,
    pub author_name: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl ListParams {
    fn into_query(self) -> Result<BookQuery, ValidationError> {
        let price = self
            .price
            .map(|raw| {
                raw.parse::<Money>()
                    .map_err(|e| ValidationError::InvalidFormat {
                        field: "price".to_string(),
                        reason: e.to_string(),
                    })
            })
            .transpose()?;

        let search = self
            .search
            .map(|raw| validation::validate_search_query(&raw))
            .transpose()?
            .filter(|q| !q.is_empty());

        let ordering = match self.ordering {
            Some(raw) => validation::parse_ordering(&raw)?,
            None => Vec::new(),
        };

        Ok(BookQuery {
            price,
            author_name: self.author_name,
            search,
            ordering,
        })
    }
}

/// GET /api/books
async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<BookResponse>>> {
    let query = params.into_query()?;
    let books = state.db.books().list(&query).await?;

    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

// =============================================================================
// Detail CRUD
// =============================================================================

/// GET /api/books/:id
async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<BookResponse>> {
    let annotated = state
        .db
        .books()
        .get_annotated(id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(annotated.into()))
}

/// POST /api/books
///
/// Any authenticated user may create; the owner is always the requester.
async fn create_book(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<BookPayload>,
) -> ApiResult<(StatusCode, Json<BookResponse>)> {
    payload.validate()?;

    let draft = BookDraft {
        name: payload.name,
        author_name: payload.author_name,
        price: payload.price,
        discount: payload.discount.unwrap_or(Money::zero()),
        owner_id: Some(user.id),
    };

    let book = state.db.books().insert(&draft).await?;
    info!(book_id = book.id, owner_id = user.id, "Book created");

    let annotated = annotated_or_internal(&state, book.id).await?;
    Ok((StatusCode::CREATED, Json(annotated.into())))
}

/// PUT /api/books/:id
///
/// Full update: every writable field is replaced. A missing discount resets
/// to zero.
async fn put_book(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<BookPayload>,
) -> ApiResult<Json<BookResponse>> {
    payload.validate()?;

    let mut book = state
        .db
        .books()
        .get_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;

    if !can_modify_book(&user, &book) {
        return Err(ApiError::PermissionDenied);
    }

    book.name = payload.name;
    book.author_name = payload.author_name;
    book.price = payload.price;
    book.discount = payload.discount.unwrap_or(Money::zero());

    state.db.books().update(&book).await?;
    info!(book_id = id, user_id = user.id, "Book updated");

    let annotated = annotated_or_internal(&state, id).await?;
    Ok(Json(annotated.into()))
}

/// PATCH /api/books/:id
///
/// Partial update: absent fields keep their stored values.
async fn patch_book(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(patch): Json<BookPatch>,
) -> ApiResult<Json<BookResponse>> {
    if let Some(name) = &patch.name {
        validation::validate_book_name(name)?;
    }
    if let Some(author_name) = &patch.author_name {
        validation::validate_author_name(author_name)?;
    }

    let mut book = state
        .db
        .books()
        .get_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;

    if !can_modify_book(&user, &book) {
        return Err(ApiError::PermissionDenied);
    }

    if !patch.is_empty() {
        if let Some(name) = patch.name {
            book.name = name;
        }
        if let Some(author_name) = patch.author_name {
            book.author_name = author_name;
        }
        if let Some(price) = patch.price {
            book.price = price;
        }
        if let Some(discount) = patch.discount {
            book.discount = discount;
        }

        state.db.books().update(&book).await?;
        info!(book_id = id, user_id = user.id, "Book patched");
    }

    let annotated = annotated_or_internal(&state, id).await?;
    Ok(Json(annotated.into()))
}

/// DELETE /api/books/:id
async fn delete_book(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let book = state
        .db
        .books()
        .get_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;

    if !can_modify_book(&user, &book) {
        return Err(ApiError::PermissionDenied);
    }

    state.db.books().delete(id).await?;
    info!(book_id = id, user_id = user.id, "Book deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Re-reads a book through the aggregation view after a write.
///
/// The row was just written, so its absence means something else deleted it
/// mid-flight; surface that as an internal error rather than a 404.
async fn annotated_or_internal(state: &AppState, id: i64) -> ApiResult<AnnotatedBook> {
    state
        .db
        .books()
        .get_annotated(id)
        .await?
        .ok_or_else(|| ApiError::Internal(format!("book {id} vanished after write")))
}
