//! # Book Repository
//!
//! Database operations for books, including the annotated read model.
//!
//! ## The Annotated Read Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 How a Listed Book Is Assembled                          │
//! │                                                                         │
//! │  books row ──────────────┐                                             │
//! │                          │                                             │
//! │  user_book_relations ────┼──► one query ──► AnnotatedBook              │
//! │   ├── COUNT(liked)       │        │          ├── annotated_likes       │
//! │   └── AVG(rate)          │        │          ├── rating                │
//! │                          │        │          ├── price_with_discount   │
//! │  users (via relations) ──┘        │          ├── owner_name            │
//! │   └── json_group_array            │          └── readers               │
//! │                                   ▼                                     │
//! │  Nothing is stored: the aggregates are recomputed on every read.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use store_core::{AnnotatedBook, Book, BookDraft, BookQuery, Money, OrderKey, Reader};

/// Shared SELECT for the annotated read model.
///
/// Like counts and the rating average come from one grouped CTE; readers are
/// collected per book as a JSON array ordered by relation age, so the list
/// reflects who interacted first.
const ANNOTATED_BASE: &str = r#"
WITH relation_stats AS (
    SELECT
        book_id,
        COUNT(CASE WHEN liked = 1 THEN 1 END) AS annotated_likes,
        AVG(rate) AS rating
    FROM user_book_relations
    GROUP BY book_id
),
reader_info AS (
    SELECT
        book_id,
        json_group_array(
            json_object(
                'username', username,
                'first_name', first_name,
                'last_name', last_name
            )
        ) AS readers
    FROM (
        SELECT r.book_id, u.username, u.first_name, u.last_name
        FROM user_book_relations r
        JOIN users u ON u.id = r.user_id
        ORDER BY r.id
    )
    GROUP BY book_id
)
SELECT
    b.id,
    b.name,
    b.author_name,
    b.price_cents,
    b.discount_cents,
    b.owner_id,
    b.created_at,
    b.updated_at,
    COALESCE(rs.annotated_likes, 0) AS annotated_likes,
    rs.rating AS rating,
    COALESCE(o.username, '') AS owner_name,
    COALESCE(ri.readers, '[]') AS readers
FROM books b
LEFT JOIN relation_stats rs ON rs.book_id = b.id
LEFT JOIN reader_info ri ON ri.book_id = b.id
LEFT JOIN users o ON o.id = b.owner_id
"#;

/// One row of the annotated read model, straight from SQLite.
#[derive(Debug, sqlx::FromRow)]
struct AnnotatedBookRow {
    id: i64,
    name: String,
    author_name: String,
    price_cents: i64,
    discount_cents: i64,
    owner_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    annotated_likes: i64,
    rating: Option<f64>,
    owner_name: String,
    /// JSON array of reader objects, decoded after the fetch.
    readers: String,
}

impl AnnotatedBookRow {
    fn into_annotated(self) -> DbResult<AnnotatedBook> {
        let readers: Vec<Reader> = serde_json::from_str(&self.readers)
            .map_err(|e| DbError::Internal(format!("malformed readers aggregate: {e}")))?;

        let price = Money::from_cents(self.price_cents);
        let discount = Money::from_cents(self.discount_cents);

        Ok(AnnotatedBook {
            book: Book {
                id: self.id,
                name: self.name,
                author_name: self.author_name,
                price,
                discount,
                owner_id: self.owner_id,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            annotated_likes: self.annotated_likes,
            rating: self.rating,
            price_with_discount: price.with_discount(discount),
            owner_name: self.owner_name,
            readers,
        })
    }
}

/// A plain books row, used where the aggregates are not needed
/// (policy checks, updates).
#[derive(Debug, sqlx::FromRow)]
struct BookRow {
    id: i64,
    name: String,
    author_name: String,
    price_cents: i64,
    discount_cents: i64,
    owner_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            id: row.id,
            name: row.name,
            author_name: row.author_name,
            price: Money::from_cents(row.price_cents),
            discount: Money::from_cents(row.discount_cents),
            owner_id: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for book database operations.
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    /// Creates a new BookRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookRepository { pool }
    }

    /// Lists books with their read-time aggregates.
    ///
    /// ## Query Parameters
    /// - `price`: exact match on the list price
    /// - `author_name`: exact match
    /// - `search`: substring match against name OR author_name
    /// - `ordering`: whitelisted fields, ties always broken by id so the
    ///   output is deterministic
    pub async fn list(&self, query: &BookQuery) -> DbResult<Vec<AnnotatedBook>> {
        debug!(?query, "Listing books");

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(ANNOTATED_BASE);

        let mut sep = " WHERE ";
        if let Some(price) = query.price {
            qb.push(sep).push("b.price_cents = ").push_bind(price.cents());
            sep = " AND ";
        }
        if let Some(author_name) = &query.author_name {
            qb.push(sep).push("b.author_name = ").push_bind(author_name.clone());
            sep = " AND ";
        }
        if let Some(search) = &query.search {
            if !search.is_empty() {
                let pattern = format!("%{}%", escape_like(search));
                qb.push(sep)
                    .push("(b.name LIKE ")
                    .push_bind(pattern.clone())
                    .push(" ESCAPE '\\' OR b.author_name LIKE ")
                    .push_bind(pattern)
                    .push(" ESCAPE '\\')");
            }
        }

        qb.push(" ORDER BY ");
        for term in &query.ordering {
            qb.push(order_column(term.key))
                .push(if term.descending { " DESC" } else { " ASC" })
                .push(", ");
        }
        qb.push("b.id ASC");

        let rows: Vec<AnnotatedBookRow> =
            qb.build_query_as().fetch_all(&self.pool).await?;

        debug!(count = rows.len(), "Listing returned books");
        rows.into_iter().map(AnnotatedBookRow::into_annotated).collect()
    }

    /// Gets a single book with its read-time aggregates.
    pub async fn get_annotated(&self, id: i64) -> DbResult<Option<AnnotatedBook>> {
        let sql = format!("{ANNOTATED_BASE} WHERE b.id = ?1");

        let row: Option<AnnotatedBookRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(AnnotatedBookRow::into_annotated).transpose()
    }

    /// Gets a plain book row by ID (no aggregates).
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Book>> {
        let row: Option<BookRow> = sqlx::query_as(
            r#"
            SELECT id, name, author_name, price_cents, discount_cents,
                   owner_id, created_at, updated_at
            FROM books
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Book::from))
    }

    /// Inserts a new book and returns it with its generated ID.
    pub async fn insert(&self, draft: &BookDraft) -> DbResult<Book> {
        debug!(name = %draft.name, "Inserting book");

        let now = Utc::now();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO books (
                name, author_name, price_cents, discount_cents,
                owner_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.author_name)
        .bind(draft.price.cents())
        .bind(draft.discount.cents())
        .bind(draft.owner_id)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(Book {
            id,
            name: draft.name.clone(),
            author_name: draft.author_name.clone(),
            price: draft.price,
            discount: draft.discount,
            owner_id: draft.owner_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Updates an existing book's writable fields.
    ///
    /// The owner is bound at creation and never rewritten here.
    pub async fn update(&self, book: &Book) -> DbResult<()> {
        debug!(id = book.id, "Updating book");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE books SET
                name = ?2,
                author_name = ?3,
                price_cents = ?4,
                discount_cents = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(book.id)
        .bind(&book.name)
        .bind(&book.author_name)
        .bind(book.price.cents())
        .bind(book.discount.cents())
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Book", book.id));
        }

        Ok(())
    }

    /// Deletes a book. Relation rows cascade away with it.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting book");

        let result = sqlx::query("DELETE FROM books WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Book", id));
        }

        Ok(())
    }

    /// Counts books (for diagnostics and the seed tool).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Maps a whitelisted ordering key to its column expression.
fn order_column(key: OrderKey) -> &'static str {
    match key {
        OrderKey::Id => "b.id",
        OrderKey::Name => "b.name",
        OrderKey::AuthorName => "b.author_name",
        OrderKey::Price => "b.price_cents",
    }
}

/// Escapes LIKE wildcards so search terms match literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use store_core::{OrderField, RelationPatch};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_user(db: &Database, username: &str) -> i64 {
        db.users()
            .insert(username, "", "", false, None)
            .await
            .unwrap()
            .id
    }

    fn draft(name: &str, author: &str, price_cents: i64, owner_id: Option<i64>) -> BookDraft {
        BookDraft {
            name: name.to_string(),
            author_name: author.to_string(),
            price: Money::from_cents(price_cents),
            discount: Money::zero(),
            owner_id,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let book = db
            .books()
            .insert(&draft("Test book 1", "Author 1", 150_000, None))
            .await
            .unwrap();

        let fetched = db.books().get_by_id(book.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Test book 1");
        assert_eq!(fetched.price.cents(), 150_000);
        assert_eq!(fetched.owner_id, None);
    }

    #[tokio::test]
    async fn test_annotated_aggregates() {
        let db = test_db().await;
        let books = db.books();
        let relations = db.relations();

        let user1 = seed_user(&db, "test_username1").await;
        let user2 = seed_user(&db, "test_username2").await;
        let user3 = seed_user(&db, "test_username3").await;

        let book = books
            .insert(&draft("Test book 1", "Author 1", 150_000, Some(user1)))
            .await
            .unwrap();

        for (user, rate) in [(user1, 5), (user2, 5), (user3, 4)] {
            relations
                .upsert(
                    user,
                    book.id,
                    &RelationPatch {
                        like: Some(true),
                        rate: Some(rate),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
        }

        let annotated = books.get_annotated(book.id).await.unwrap().unwrap();
        assert_eq!(annotated.annotated_likes, 3);
        // 5, 5, 4 average to 4.666...; the serializer rounds to "4.67"
        let rating = annotated.rating.unwrap();
        assert!((rating - 14.0 / 3.0).abs() < 1e-9);
        assert_eq!(annotated.owner_name, "test_username1");
        assert_eq!(annotated.readers.len(), 3);
        assert_eq!(annotated.readers[0].username, "test_username1");
        assert_eq!(annotated.readers[2].username, "test_username3");
    }

    #[tokio::test]
    async fn test_annotated_defaults_without_relations() {
        let db = test_db().await;
        let book = db
            .books()
            .insert(&draft("Test book 1", "Author 1", 150_000, None))
            .await
            .unwrap();

        let annotated = db.books().get_annotated(book.id).await.unwrap().unwrap();
        assert_eq!(annotated.annotated_likes, 0);
        assert_eq!(annotated.rating, None);
        assert_eq!(annotated.owner_name, "");
        assert!(annotated.readers.is_empty());
    }

    #[tokio::test]
    async fn test_price_with_discount_is_exact() {
        let db = test_db().await;
        let book = db
            .books()
            .insert(&BookDraft {
                discount: Money::from_cents(10_000),
                ..draft("Test book 1", "Author 1", 150_000, None)
            })
            .await
            .unwrap();

        let annotated = db.books().get_annotated(book.id).await.unwrap().unwrap();
        assert_eq!(annotated.price_with_discount.to_string(), "1400.00");
    }

    #[tokio::test]
    async fn test_list_filters() {
        let db = test_db().await;
        let books = db.books();

        books.insert(&draft("Test book 1", "Author 1", 150_000, None)).await.unwrap();
        books.insert(&draft("Test book Author 1", "Author 2", 170_000, None)).await.unwrap();
        books.insert(&draft("Test book 3", "Author 3", 150_000, None)).await.unwrap();

        let by_price = books
            .list(&BookQuery {
                price: Some(Money::from_cents(150_000)),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_price.len(), 2);

        let by_author = books
            .list(&BookQuery {
                author_name: Some("Author 1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_author.len(), 1);
        assert_eq!(by_author[0].book.name, "Test book 1");
    }

    #[tokio::test]
    async fn test_list_search_hits_name_and_author() {
        let db = test_db().await;
        let books = db.books();

        books.insert(&draft("Test book 1", "Author 1", 150_000, None)).await.unwrap();
        books.insert(&draft("Test book Author 1", "Author 2", 170_000, None)).await.unwrap();
        books.insert(&draft("Test book 3", "Author 3", 150_000, None)).await.unwrap();

        let found = books
            .list(&BookQuery {
                search: Some("Author 1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let names: Vec<_> = found.iter().map(|b| b.book.name.as_str()).collect();
        assert_eq!(names, vec!["Test book 1", "Test book Author 1"]);
    }

    #[tokio::test]
    async fn test_list_search_escapes_wildcards() {
        let db = test_db().await;
        let books = db.books();

        books.insert(&draft("100% Rust", "Author 1", 150_000, None)).await.unwrap();
        books.insert(&draft("Plain book", "Author 2", 150_000, None)).await.unwrap();

        let found = books
            .list(&BookQuery {
                search: Some("100%".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].book.name, "100% Rust");
    }

    #[tokio::test]
    async fn test_list_ordering() {
        let db = test_db().await;
        let books = db.books();

        books.insert(&draft("Test book 1", "Author 1", 150_000, None)).await.unwrap();
        books.insert(&draft("Test book 2", "Author 2", 170_000, None)).await.unwrap();
        books.insert(&draft("Test book 3", "Author 3", 150_000, None)).await.unwrap();

        // Ascending by price; equal prices fall back to id order
        let by_price = books
            .list(&BookQuery {
                ordering: vec![OrderField { key: OrderKey::Price, descending: false }],
                ..Default::default()
            })
            .await
            .unwrap();
        let names: Vec<_> = by_price.iter().map(|b| b.book.name.as_str()).collect();
        assert_eq!(names, vec!["Test book 1", "Test book 3", "Test book 2"]);

        // Descending by author name
        let by_author_desc = books
            .list(&BookQuery {
                ordering: vec![OrderField { key: OrderKey::AuthorName, descending: true }],
                ..Default::default()
            })
            .await
            .unwrap();
        let names: Vec<_> = by_author_desc.iter().map(|b| b.book.author_name.as_str()).collect();
        assert_eq!(names, vec!["Author 3", "Author 2", "Author 1"]);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = test_db().await;
        let books = db.books();

        let mut book = books
            .insert(&draft("Test book 1", "Author 1", 150_000, None))
            .await
            .unwrap();

        book.price = Money::from_cents(99_900);
        books.update(&book).await.unwrap();
        let fetched = books.get_by_id(book.id).await.unwrap().unwrap();
        assert_eq!(fetched.price.cents(), 99_900);

        books.delete(book.id).await.unwrap();
        assert!(books.get_by_id(book.id).await.unwrap().is_none());

        // Deleting again reports NotFound
        assert!(matches!(
            books.delete(book.id).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
