//! # Seed Data Generator
//!
//! Populates the database with sample users, books, and relations for
//! development.
//!
//! ## Usage
//! ```bash
//! cargo run -p store-db --bin seed
//!
//! # Specify database path
//! cargo run -p store-db --bin seed -- --db ./data/store.db
//! ```

use std::env;

use store_core::{BookDraft, Money, RelationPatch};
use store_db::{Database, DbConfig};

/// Sample catalog: (name, author, price cents, discount cents)
const BOOKS: &[(&str, &str, i64, i64)] = &[
    ("The Crab and the Compiler", "R. Ferris", 150_000, 10_000),
    ("Borrow Checker Blues", "R. Ferris", 170_000, 0),
    ("Async in Anger", "M. Waters", 150_000, 0),
    ("A Field Guide to Lifetimes", "M. Waters", 99_900, 5_000),
    ("Zero-Cost Abstractions", "I. Petrova", 210_000, 0),
    ("The Pointer and the Pearl", "I. Petrova", 84_500, 0),
    ("Traits of Highly Effective Types", "L. Okafor", 125_000, 12_500),
    ("Send and Sync", "L. Okafor", 110_000, 0),
];

/// Sample users: (username, first, last, is_staff)
const USERS: &[(&str, &str, &str, bool)] = &[
    ("admin", "", "", true),
    ("alice", "Alice", "Archer", false),
    ("bob", "Bob", "Byrne", false),
    ("carol", "Carol", "Castle", false),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./store_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Book Store Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./store_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Book Store Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.books().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} books", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding users...");

    let mut user_ids = Vec::new();
    for (username, first, last, is_staff) in USERS {
        let user = db.users().insert(username, first, last, *is_staff, None).await?;
        user_ids.push(user.id);
    }
    println!("✓ {} users created", user_ids.len());

    println!("Seeding books...");

    let mut book_ids = Vec::new();
    for (index, (name, author, price, discount)) in BOOKS.iter().enumerate() {
        // Spread ownership across the non-staff users; every third book is
        // ownerless
        let owner_id = match index % 3 {
            0 => Some(user_ids[1 + index % 3]),
            1 => Some(user_ids[1 + (index + 1) % 3]),
            _ => None,
        };

        let book = db
            .books()
            .insert(&BookDraft {
                name: (*name).to_string(),
                author_name: (*author).to_string(),
                price: Money::from_cents(*price),
                discount: Money::from_cents(*discount),
                owner_id,
            })
            .await?;
        book_ids.push(book.id);
    }
    println!("✓ {} books created", book_ids.len());

    println!("Seeding relations...");

    let mut relations = 0;
    for (u, &user_id) in user_ids.iter().enumerate().skip(1) {
        for (b, &book_id) in book_ids.iter().enumerate() {
            // A deterministic scatter of likes/bookmarks/ratings
            if (u + b) % 2 == 0 {
                let patch = RelationPatch {
                    like: Some(b % 3 != 0),
                    in_bookmarks: Some(b % 4 == 0),
                    rate: Some(((u + b) % 5 + 1) as i64),
                };
                db.relations().upsert(user_id, book_id, &patch).await?;
                relations += 1;
            }
        }
    }
    println!("✓ {} relations created", relations);

    println!();
    println!("Done.");
    Ok(())
}
