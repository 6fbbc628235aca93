//! Integration tests for the relation endpoint: lazy creation, partial
//! updates, idempotency, and per-user isolation.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{json_request, spawn_app};

#[tokio::test]
async fn test_patch_creates_relation_lazily() {
    let app = spawn_app().await;
    let user = app.user("test_username1", false).await;
    let book = app.book("Test book 1", "Author 1", 150_000, 0, None).await;
    let token = app.token_for(&user);

    let (status, body) = app
        .send(json_request(
            Method::PATCH,
            &format!("/api/books/{book}/relation"),
            Some(&token),
            &json!({"like": true}),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"book": book, "like": true, "in_bookmarks": false, "rate": null}));
}

#[tokio::test]
async fn test_patch_preserves_unspecified_fields() {
    let app = spawn_app().await;
    let user = app.user("test_username1", false).await;
    let book = app.book("Test book 1", "Author 1", 150_000, 0, None).await;
    let token = app.token_for(&user);
    let uri = format!("/api/books/{book}/relation");

    app.send(json_request(Method::PATCH, &uri, Some(&token), &json!({"like": true, "rate": 5})))
        .await;

    // A bookmark-only patch must leave like and rate alone
    let (status, body) = app
        .send(json_request(Method::PATCH, &uri, Some(&token), &json!({"in_bookmarks": true})))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"book": book, "like": true, "in_bookmarks": true, "rate": 5}));
}

#[tokio::test]
async fn test_patch_is_idempotent() {
    let app = spawn_app().await;
    let user = app.user("test_username1", false).await;
    let book = app.book("Test book 1", "Author 1", 150_000, 0, None).await;
    let token = app.token_for(&user);
    let uri = format!("/api/books/{book}/relation");
    let patch = json!({"like": true, "rate": 4});

    let (_, first) = app
        .send(json_request(Method::PATCH, &uri, Some(&token), &patch))
        .await;
    let (_, second) = app
        .send(json_request(Method::PATCH, &uri, Some(&token), &patch))
        .await;

    assert_eq!(first, second);

    // Still exactly one row for the pair
    let relation = app
        .state
        .db
        .relations()
        .get(user.id, book)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(relation.rate, Some(4));
}

#[tokio::test]
async fn test_rate_out_of_range_is_a_field_error() {
    let app = spawn_app().await;
    let user = app.user("test_username1", false).await;
    let book = app.book("Test book 1", "Author 1", 150_000, 0, None).await;
    let token = app.token_for(&user);

    let (status, body) = app
        .send(json_request(
            Method::PATCH,
            &format!("/api/books/{book}/relation"),
            Some(&token),
            &json!({"rate": 6}),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["rate"], json!(["rate must be between 1 and 5"]));

    // Nothing was written
    assert!(app.state.db.relations().get(user.id, book).await.unwrap().is_none());
}

#[tokio::test]
async fn test_requires_auth() {
    let app = spawn_app().await;
    let book = app.book("Test book 1", "Author 1", 150_000, 0, None).await;

    let (status, body) = app
        .send(json_request(
            Method::PATCH,
            &format!("/api/books/{book}/relation"),
            None,
            &json!({"like": true}),
        ))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Authentication credentials were not provided.");
}

#[tokio::test]
async fn test_unknown_book_is_not_found() {
    let app = spawn_app().await;
    let user = app.user("test_username1", false).await;
    let token = app.token_for(&user);

    let (status, _) = app
        .send(json_request(
            Method::PATCH,
            "/api/books/9999/relation",
            Some(&token),
            &json!({"like": true}),
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_each_user_gets_their_own_row() {
    let app = spawn_app().await;
    let first = app.user("test_username1", false).await;
    let second = app.user("test_username2", false).await;
    let book = app.book("Test book 1", "Author 1", 150_000, 0, None).await;
    let uri = format!("/api/books/{book}/relation");

    let first_token = app.token_for(&first);
    let second_token = app.token_for(&second);

    app.send(json_request(Method::PATCH, &uri, Some(&first_token), &json!({"like": true})))
        .await;
    let (_, body) = app
        .send(json_request(Method::PATCH, &uri, Some(&second_token), &json!({"rate": 3})))
        .await;

    // The second user's fresh row, untouched by the first user's like
    assert_eq!(body, json!({"book": book, "like": false, "in_bookmarks": false, "rate": 3}));

    let stored = app.state.db.relations().get(first.id, book).await.unwrap().unwrap();
    assert!(stored.like);
    assert_eq!(stored.rate, None);
}
