//! # Book Store REST API
//!
//! Axum application exposing the book catalog over HTTP.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         store-api Surfaces                              │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  /api/books    │  │ /api/books/:id │  │ /api/books/:id/relation    ││
//! │  │                │  │                │  │                            ││
//! │  │ • list+filters │  │ • detail       │  │ • PATCH own like/bookmark/ ││
//! │  │ • search       │  │ • put/patch    │  │   rate row (lazy create)   ││
//! │  │ • ordering     │  │ • delete       │  │                            ││
//! │  │ • create       │  │   (owner/staff)│  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐                                │
//! │  │  /auth/token   │  │    /health     │                                │
//! │  │  JWT issue     │  │  db ping       │                                │
//! │  └────────────────┘  └────────────────┘                                │
//! │                                                                         │
//! │  Infrastructure: SQLite via store-db, argon2 passwords, bearer JWTs    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `HTTP_PORT` - HTTP server port (default: 8000)
//! - `DATABASE_PATH` - SQLite file path (default: ./store.db)
//! - `JWT_SECRET` - Secret for JWT signing
//! - `JWT_ACCESS_LIFETIME_SECS` - Access token lifetime (default: 3600)

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};

use auth::JwtManager;
use store_db::Database;

/// Shared application state.
pub struct AppState {
    pub db: Database,
    pub config: ApiConfig,
    pub jwt: JwtManager,
}

impl AppState {
    /// Builds the state, deriving the JWT manager from the config.
    pub fn new(config: ApiConfig, db: Database) -> Self {
        let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_access_lifetime_secs);
        AppState { db, config, jwt }
    }
}
