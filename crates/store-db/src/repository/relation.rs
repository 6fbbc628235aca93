//! # Relation Repository
//!
//! Database operations for per-(user, book) relation rows.
//!
//! ## Upsert Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PATCH { like: true }           first call         second call          │
//! │                                                                         │
//! │  row absent ──► INSERT with     like=true          (row now exists)     │
//! │                 column defaults in_bookmarks=false                      │
//! │                                 rate=NULL                               │
//! │  row present ─► UPDATE only     ──────────────►    identical state      │
//! │                 provided fields                                         │
//! │                                                                         │
//! │  One statement, keyed on UNIQUE(user_id, book_id). Absent fields are   │
//! │  never touched, so re-applying a patch is a no-op.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use store_core::{RelationPatch, UserBookRelation};

#[derive(Debug, sqlx::FromRow)]
struct RelationRow {
    id: i64,
    user_id: i64,
    book_id: i64,
    liked: bool,
    in_bookmarks: bool,
    rate: Option<i64>,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
    #[allow(dead_code)]
    updated_at: DateTime<Utc>,
}

impl From<RelationRow> for UserBookRelation {
    fn from(row: RelationRow) -> Self {
        UserBookRelation {
            id: row.id,
            user_id: row.user_id,
            book_id: row.book_id,
            like: row.liked,
            in_bookmarks: row.in_bookmarks,
            rate: row.rate,
        }
    }
}

/// Repository for user/book relation operations.
#[derive(Debug, Clone)]
pub struct RelationRepository {
    pool: SqlitePool,
}

impl RelationRepository {
    /// Creates a new RelationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RelationRepository { pool }
    }

    /// Creates or updates the relation row for (user, book), applying only
    /// the provided fields.
    ///
    /// A fresh row takes the column defaults (not liked, not bookmarked,
    /// unrated) for anything the patch leaves out. An existing row keeps its
    /// stored values for those fields. Concurrent upserts for the same pair
    /// are last-write-wins.
    pub async fn upsert(
        &self,
        user_id: i64,
        book_id: i64,
        patch: &RelationPatch,
    ) -> DbResult<UserBookRelation> {
        debug!(user_id, book_id, ?patch, "Upserting relation");

        let now = Utc::now();

        let row: RelationRow = sqlx::query_as(
            r#"
            INSERT INTO user_book_relations (
                user_id, book_id, liked, in_bookmarks, rate, created_at, updated_at
            ) VALUES (
                ?1, ?2, COALESCE(?3, 0), COALESCE(?4, 0), ?5, ?6, ?6
            )
            ON CONFLICT (user_id, book_id) DO UPDATE SET
                liked        = COALESCE(?3, liked),
                in_bookmarks = COALESCE(?4, in_bookmarks),
                rate         = COALESCE(?5, rate),
                updated_at   = ?6
            RETURNING id, user_id, book_id, liked, in_bookmarks, rate,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(patch.like)
        .bind(patch.in_bookmarks)
        .bind(patch.rate)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    /// Gets the relation row for (user, book), if one exists.
    pub async fn get(&self, user_id: i64, book_id: i64) -> DbResult<Option<UserBookRelation>> {
        let row: Option<RelationRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, book_id, liked, in_bookmarks, rate,
                   created_at, updated_at
            FROM user_book_relations
            WHERE user_id = ?1 AND book_id = ?2
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserBookRelation::from))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
