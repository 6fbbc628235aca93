//! # Validation Module
//!
//! Input validation utilities for the book store.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  ├── Type checks, money format                                         │
//! │  └── Rejects malformed JSON outright                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Field-level rules (lengths, ranges, whitelists)                   │
//! │  └── Produces field-addressable errors for the API                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE / CHECK constraints                             │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{OrderField, OrderKey};
use crate::{MAX_NAME_LEN, MAX_SEARCH_LEN, RATE_MAX, RATE_MIN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a book title.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_book_name(name: &str) -> ValidationResult<()> {
    validate_name_field("name", name)
}

/// Validates an author display name. Same rules as the title.
pub fn validate_author_name(name: &str) -> ValidationResult<()> {
    validate_name_field("author_name", name)
}

fn validate_name_field(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a free-text search query.
///
/// ## Rules
/// - Can be empty (no filtering)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a book rating.
///
/// ## Rules
/// - Must be between 1 and 5 inclusive
///
/// ## Example
/// ```rust
/// use store_core::validation::validate_rate;
///
/// assert!(validate_rate(5).is_ok());
/// assert!(validate_rate(0).is_err());
/// assert!(validate_rate(6).is_err());
/// ```
pub fn validate_rate(rate: i64) -> ValidationResult<()> {
    if !(RATE_MIN..=RATE_MAX).contains(&rate) {
        return Err(ValidationError::OutOfRange {
            field: "rate".to_string(),
            min: RATE_MIN,
            max: RATE_MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Ordering Parser
// =============================================================================

/// Parses the `ordering` listing parameter.
///
/// The parameter is a comma-separated field list; a leading minus means
/// descending. Fields outside the whitelist are rejected rather than
/// silently ignored.
///
/// ## Example
/// ```rust
/// use store_core::validation::parse_ordering;
///
/// let terms = parse_ordering("price,-author_name").unwrap();
/// assert_eq!(terms.len(), 2);
/// assert!(!terms[0].descending);
/// assert!(terms[1].descending);
///
/// assert!(parse_ordering("owner_id").is_err());
/// ```
pub fn parse_ordering(ordering: &str) -> ValidationResult<Vec<OrderField>> {
    const ALLOWED: [OrderKey; 4] = [
        OrderKey::Id,
        OrderKey::Name,
        OrderKey::AuthorName,
        OrderKey::Price,
    ];

    let mut terms = Vec::new();

    for raw in ordering.split(',') {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        let (descending, field) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let key = ALLOWED
            .iter()
            .copied()
            .find(|k| k.as_str() == field)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "ordering".to_string(),
                allowed: ALLOWED.iter().map(|k| k.as_str().to_string()).collect(),
            })?;

        terms.push(OrderField { key, descending });
    }

    Ok(terms)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_book_name() {
        assert!(validate_book_name("Test book 1").is_ok());
        assert!(validate_book_name("").is_err());
        assert!(validate_book_name("   ").is_err());
        assert!(validate_book_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_author_name_reports_field() {
        let err = validate_author_name("").unwrap_err();
        assert_eq!(err.field(), "author_name");
    }

    #[test]
    fn test_validate_rate() {
        for rate in 1..=5 {
            assert!(validate_rate(rate).is_ok());
        }
        assert!(validate_rate(0).is_err());
        assert!(validate_rate(6).is_err());
        assert!(validate_rate(-1).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  Author 1 ").unwrap(), "Author 1");
        assert!(validate_search_query(&"q".repeat(200)).is_err());
    }

    #[test]
    fn test_parse_ordering() {
        let terms = parse_ordering("price").unwrap();
        assert_eq!(terms, vec![OrderField { key: OrderKey::Price, descending: false }]);

        let terms = parse_ordering("-author_name,id").unwrap();
        assert_eq!(terms[0].key, OrderKey::AuthorName);
        assert!(terms[0].descending);
        assert_eq!(terms[1].key, OrderKey::Id);
        assert!(!terms[1].descending);
    }

    #[test]
    fn test_parse_ordering_rejects_unknown_fields() {
        assert!(parse_ordering("owner_id").is_err());
        assert!(parse_ordering("price;drop table books").is_err());
    }

    #[test]
    fn test_parse_ordering_skips_empty_terms() {
        assert!(parse_ordering("").unwrap().is_empty());
        assert_eq!(parse_ordering("price,,").unwrap().len(), 1);
    }
}
