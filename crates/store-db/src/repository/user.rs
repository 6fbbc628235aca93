//! # User Repository
//!
//! Database operations for user identity rows. Authentication itself lives
//! in the API app; this repository only stores and looks up accounts.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use store_core::User;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    first_name: String,
    last_name: String,
    is_staff: bool,
    password_hash: Option<String>,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            is_staff: self.is_staff,
        }
    }
}

/// A user together with their stored password hash, for credential checks.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    /// None for identity rows that cannot log in.
    pub password_hash: Option<String>,
}

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new user.
    ///
    /// ## Returns
    /// * `Ok(User)` - the created user with its generated ID
    /// * `Err(DbError::UniqueViolation)` - username already taken
    pub async fn insert(
        &self,
        username: &str,
        first_name: &str,
        last_name: &str,
        is_staff: bool,
        password_hash: Option<&str>,
    ) -> DbResult<User> {
        debug!(username, "Inserting user");

        let now = Utc::now();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (username, first_name, last_name, is_staff,
                               password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(first_name)
        .bind(last_name)
        .bind(is_staff)
        .bind(password_hash)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(User {
            id,
            username: username.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            is_staff,
        })
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, username, first_name, last_name, is_staff,
                   password_hash, created_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    /// Gets a user by username.
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, username, first_name, last_name, is_staff,
                   password_hash, created_at
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    /// Gets a user together with their password hash, for the login flow.
    pub async fn get_credentials(&self, username: &str) -> DbResult<Option<UserCredentials>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, username, first_name, last_name, is_staff,
                   password_hash, created_at
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| {
            let password_hash = row.password_hash.clone();
            UserCredentials {
                user: row.into_user(),
                password_hash,
            }
        }))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
