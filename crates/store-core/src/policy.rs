//! # Access Policy
//!
//! Who may mutate a book. Reads are unrestricted and never reach this
//! module; creation binds the new book's owner to the requester.

use crate::types::{Book, User};

/// Whether `user` may update or delete `book`.
///
/// Permitted iff the requester owns the book or is staff. Ownerless books
/// are only mutable by staff.
///
/// ## Example
/// ```rust
/// use store_core::policy::can_modify_book;
/// # use store_core::types::{Book, User};
/// # use store_core::money::Money;
/// # use chrono::Utc;
/// # let now = Utc::now();
/// # let book = Book { id: 1, name: "b".into(), author_name: "a".into(),
/// #     price: Money::zero(), discount: Money::zero(), owner_id: Some(7),
/// #     created_at: now, updated_at: now };
/// # let owner = User { id: 7, username: "o".into(), first_name: String::new(),
/// #     last_name: String::new(), is_staff: false };
/// # let other = User { id: 8, ..owner.clone() };
/// assert!(can_modify_book(&owner, &book));
/// assert!(!can_modify_book(&other, &book));
/// ```
pub fn can_modify_book(user: &User, book: &Book) -> bool {
    user.is_staff || book.owner_id == Some(user.id)
}
