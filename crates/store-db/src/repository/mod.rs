//! # Repository Module
//!
//! Database repository implementations for the book store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP Handler                                                           │
//! │       │                                                                 │
//! │       │  db.books().list(&query)                                        │
//! │       ▼                                                                 │
//! │  BookRepository                                                        │
//! │  ├── list(&self, query)        ← annotated read model                  │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, draft)                                              │
//! │  └── update / delete                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  SQL is isolated here; handlers never see a query string.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`book::BookRepository`] - Book CRUD and the annotated listing
//! - [`relation::RelationRepository`] - Per-(user, book) relation upsert
//! - [`user::UserRepository`] - User identity rows

pub mod book;
pub mod relation;
pub mod user;
