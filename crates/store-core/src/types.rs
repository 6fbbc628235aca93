//! # Domain Types
//!
//! Core domain types used throughout the book store.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────┐   ┌─────────────────┐   │
//! │  │      Book       │   │  UserBookRelation   │   │      User       │   │
//! │  │  ─────────────  │   │  ─────────────────  │   │  ─────────────  │   │
//! │  │  id             │   │  (user_id, book_id) │   │  id             │   │
//! │  │  name           │   │  like               │   │  username       │   │
//! │  │  author_name    │   │  in_bookmarks       │   │  first_name     │   │
//! │  │  price          │   │  rate (1-5, opt.)   │   │  last_name      │   │
//! │  │  discount       │   └─────────────────────┘   │  is_staff       │   │
//! │  │  owner_id       │                             └─────────────────┘   │
//! │  └─────────────────┘                                                   │
//! │                                                                         │
//! │  AnnotatedBook = Book + read-time aggregates (never stored):           │
//! │    annotated_likes, rating, price_with_discount, owner_name, readers  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// User
// =============================================================================

/// A user of the store. Identity comes from outside; `is_staff` is the only
/// authorization signal the policy layer consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: i64,

    /// Login name, unique across users.
    pub username: String,

    /// Given name, empty string when unset.
    pub first_name: String,

    /// Family name, empty string when unset.
    pub last_name: String,

    /// Staff users may mutate any book.
    pub is_staff: bool,
}

// =============================================================================
// Book
// =============================================================================

/// A book in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier.
    pub id: i64,

    /// Title shown in listings.
    pub name: String,

    /// Author display name.
    pub author_name: String,

    /// List price (fixed-point, 2 decimals).
    pub price: Money,

    /// Discount subtracted from the price at read time. Not clamped to the
    /// price.
    pub discount: Money,

    /// The user who created the book; None for ownerless catalog entries.
    pub owner_id: Option<i64>,

    /// When the book was created.
    pub created_at: DateTime<Utc>,

    /// When the book was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to create a book. The owner is bound by the caller, never
/// taken from the request body.
#[derive(Debug, Clone)]
pub struct BookDraft {
    pub name: String,
    pub author_name: String,
    pub price: Money,
    pub discount: Money,
    pub owner_id: Option<i64>,
}

/// A partial update to a book. Absent fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookPatch {
    pub name: Option<String>,
    pub author_name: Option<String>,
    pub price: Option<Money>,
    pub discount: Option<Money>,
}

impl BookPatch {
    /// True when the patch carries nothing to apply.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.author_name.is_none()
            && self.price.is_none()
            && self.discount.is_none()
    }
}

// =============================================================================
// User/Book Relation
// =============================================================================

/// The per-(user, book) record capturing like/bookmark/rating state.
///
/// At most one row exists per pair; it is created lazily on the first
/// interaction and updated in place thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBookRelation {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,

    /// Whether the user likes the book.
    pub like: bool,

    /// Whether the book is in the user's bookmarks.
    pub in_bookmarks: bool,

    /// Rating 1..=5, None until the user rates.
    pub rate: Option<i64>,
}

/// A partial update to a relation. Absent fields keep their stored values,
/// so repeated application of the same patch is idempotent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelationPatch {
    pub like: Option<bool>,
    pub in_bookmarks: Option<bool>,
    pub rate: Option<i64>,
}

// =============================================================================
// Annotated Read Model
// =============================================================================

/// A reader entry in the serialized book representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reader {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// A book together with its read-time aggregates.
///
/// Produced by the aggregation query in one pass; nothing here is stored.
#[derive(Debug, Clone)]
pub struct AnnotatedBook {
    pub book: Book,

    /// Count of relations with like=true.
    pub annotated_likes: i64,

    /// Arithmetic mean of non-null rates; None when no one has rated.
    pub rating: Option<f64>,

    /// price − discount, exact to the cent.
    pub price_with_discount: Money,

    /// Owner's username, empty string for ownerless books.
    pub owner_name: String,

    /// Every user holding a relation row for this book.
    pub readers: Vec<Reader>,
}

// =============================================================================
// Listing Query Model
// =============================================================================

/// Fields the listing endpoint may order by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKey {
    Id,
    Name,
    AuthorName,
    Price,
}

impl OrderKey {
    /// The public field name, as it appears in the `ordering` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderKey::Id => "id",
            OrderKey::Name => "name",
            OrderKey::AuthorName => "author_name",
            OrderKey::Price => "price",
        }
    }
}

/// One ordering term: a whitelisted field plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderField {
    pub key: OrderKey,
    pub descending: bool,
}

/// Parameters accepted by the book listing.
#[derive(Debug, Clone, Default)]
pub struct BookQuery {
    /// Exact price filter.
    pub price: Option<Money>,

    /// Exact author filter.
    pub author_name: Option<String>,

    /// Substring search against name OR author_name.
    pub search: Option<String>,

    /// Ordering terms, applied left to right. Empty means id ascending.
    pub ordering: Vec<OrderField>,
}
