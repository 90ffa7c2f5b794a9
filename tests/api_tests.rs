//! API integration tests.
//!
//! These run against a live server with a migrated database:
//! `cargo test -- --ignored`. An admin account must be provisioned
//! out-of-band (role ADMIN); its credentials come from
//! BOOKCLUB_TEST_ADMIN_EMAIL / BOOKCLUB_TEST_ADMIN_PASSWORD.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:3000/api/v1";

fn unique_email(prefix: &str) -> String {
    format!("{}+{}@example.com", prefix, uuid_like())
}

fn uuid_like() -> u128 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos()
}

/// Register a fresh user and return (email, token)
async fn register_and_login(client: &Client, prefix: &str) -> (String, String) {
    let email = unique_email(prefix);

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": "secret123"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let token = login(client, &email, "secret123").await;
    (email, token)
}

async fn login(client: &Client, email: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn admin_token(client: &Client) -> String {
    let email = std::env::var("BOOKCLUB_TEST_ADMIN_EMAIL")
        .unwrap_or_else(|_| "admin@bookclub.local".to_string());
    let password = std::env::var("BOOKCLUB_TEST_ADMIN_PASSWORD")
        .unwrap_or_else(|_| "admin-secret".to_string());
    login(client, &email, &password).await
}

async fn create_author(client: &Client, token: &str, name: &str) -> String {
    let response = client
        .post(format!("{}/authors", BASE_URL))
        .bearer_auth(token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send create author request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.unwrap();
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_book(client: &Client, token: &str, title: &str, author_ids: &[&str]) -> String {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(token)
        .json(&json!({ "title": title, "authorIds": author_ids }))
        .send()
        .await
        .expect("Failed to send create book request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.unwrap();
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_review(client: &Client, token: &str, book_id: &str, rating: i32) -> Value {
    let response = client
        .post(format!("{}/reviews", BASE_URL))
        .bearer_auth(token)
        .json(&json!({ "rating": rating, "comment": "fine", "bookId": book_id }))
        .send()
        .await
        .expect("Failed to send create review request");
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");

    // Readiness round-trips the database, so a passing check implies a live pool
    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_register_login_me_flow() {
    let client = Client::new();
    let (email, token) = register_and_login(&client, "flow").await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["email"], email.as_str());
    assert_eq!(body["data"]["role"], "USER");
    // The hashed secret must never appear in any payload
    assert!(body["data"].get("password").is_none());
}

#[tokio::test]
#[ignore]
async fn test_register_duplicate_email_conflicts() {
    let client = Client::new();
    let email = unique_email("dup");

    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let response = client
            .post(format!("{}/auth/register", BASE_URL))
            .json(&json!({
                "name": "Dup User",
                "email": email,
                "password": "secret123"
            }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
#[ignore]
async fn test_login_failures_are_indistinguishable() {
    let client = Client::new();
    let (email, _) = register_and_login(&client, "enum").await;

    let wrong_password = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "wrong-password" }))
        .send()
        .await
        .unwrap();
    let unknown_email = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": unique_email("ghost"), "password": "whatever1" }))
        .send()
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    // Same generic message in both cases: no account enumeration
    let a: Value = wrong_password.json().await.unwrap();
    let b: Value = unknown_email.json().await.unwrap();
    assert_eq!(a["message"], b["message"]);
}

#[tokio::test]
#[ignore]
async fn test_create_book_lists_all_missing_author_ids() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let real_author = create_author(&client, &admin, "Real Author").await;
    let missing_a = "00000000-0000-0000-0000-00000000000a";
    let missing_b = "00000000-0000-0000-0000-00000000000b";

    let title = format!("Ghost Book {}", uuid_like());
    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({
            "title": title,
            "authorIds": [real_author, missing_a, missing_b]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    let message = body["message"].as_str().unwrap();
    assert!(message.contains(missing_a));
    assert!(message.contains(missing_b));

    // No book row was persisted
    let list: Value = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let titles: Vec<&str> = list["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|b| b["title"].as_str())
        .collect();
    assert!(!titles.contains(&title.as_str()));
}

#[tokio::test]
#[ignore]
async fn test_author_delete_safety() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let author = create_author(&client, &admin, "Attached Author").await;
    let book = create_book(&client, &admin, "Attached Book", &[&author]).await;

    // Author with an associated book: delete rejected
    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Detach by deleting the book, then the author delete succeeds
    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // And the author is gone
    let response = client
        .get(format!("{}/authors/{}", BASE_URL, author))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_book_delete_cascades_reviews() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (_, user_a) = register_and_login(&client, "cascade-a").await;
    let (_, user_b) = register_and_login(&client, "cascade-b").await;

    let author = create_author(&client, &admin, "Cascade Author").await;
    let book = create_book(&client, &admin, "Cascade Book", &[&author]).await;

    let r1 = create_review(&client, &user_a, &book, 4).await;
    let r2 = create_review(&client, &user_b, &book, 2).await;
    let r1_id = r1["data"]["id"].as_str().unwrap();
    let r2_id = r2["data"]["id"].as_str().unwrap();

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    for review_id in [r1_id, r2_id] {
        let response = client
            .get(format!("{}/reviews/{}", BASE_URL, review_id))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
#[ignore]
async fn test_one_review_per_user_per_book() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (_, user) = register_and_login(&client, "uniq").await;

    let author = create_author(&client, &admin, "Uniq Author").await;
    let book_a = create_book(&client, &admin, "Uniq Book A", &[&author]).await;
    let book_b = create_book(&client, &admin, "Uniq Book B", &[&author]).await;

    create_review(&client, &user, &book_a, 5).await;

    // Second review for the same (user, book) pair conflicts
    let response = client
        .post(format!("{}/reviews", BASE_URL))
        .bearer_auth(&user)
        .json(&json!({ "rating": 1, "bookId": book_a }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // A different book is fine
    create_review(&client, &user, &book_b, 3).await;
}

#[tokio::test]
#[ignore]
async fn test_review_mutation_requires_owner_or_admin() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (_, owner) = register_and_login(&client, "owner").await;
    let (_, other) = register_and_login(&client, "other").await;

    let author = create_author(&client, &admin, "Authz Author").await;
    let book = create_book(&client, &admin, "Authz Book", &[&author]).await;

    let review = create_review(&client, &owner, &book, 3).await;
    let review_id = review["data"]["id"].as_str().unwrap();

    // Non-owner non-admin: forbidden
    let response = client
        .put(format!("{}/reviews/{}", BASE_URL, review_id))
        .bearer_auth(&other)
        .json(&json!({ "rating": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Owner: allowed
    let response = client
        .put(format!("{}/reviews/{}", BASE_URL, review_id))
        .bearer_auth(&owner)
        .json(&json!({ "rating": 5 }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["rating"], 5);

    // Admin may delete someone else's review
    let response = client
        .delete(format!("{}/reviews/{}", BASE_URL, review_id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore]
async fn test_review_listing_filters_and_totals() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (_, user_a) = register_and_login(&client, "list-a").await;
    let (_, user_b) = register_and_login(&client, "list-b").await;

    let author = create_author(&client, &admin, "List Author").await;
    let book = create_book(&client, &admin, "List Book", &[&author]).await;

    create_review(&client, &user_a, &book, 4).await;
    create_review(&client, &user_b, &book, 2).await;

    let body: Value = client
        .get(format!("{}/reviews?bookId={}&page=1&limit=1", BASE_URL, book))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "success");
    // One item on the page, but the total covers every matching row
    assert_eq!(body["results"], 1);
    assert_eq!(body["totalResults"], 2);

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    // Newest first: the second review comes back on page 1
    assert_eq!(data[0]["rating"], 2);
    // Embedded user is a safe user
    assert!(data[0]["user"].get("password").is_none());
}

#[tokio::test]
#[ignore]
async fn test_catalog_mutations_require_admin() {
    let client = Client::new();
    let (_, user) = register_and_login(&client, "nonadmin").await;

    let response = client
        .post(format!("{}/authors", BASE_URL))
        .bearer_auth(&user)
        .json(&json!({ "name": "Nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({ "title": "Nope", "authorIds": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_book_detail_embeds_safe_users() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (_, user) = register_and_login(&client, "detail").await;

    let author = create_author(&client, &admin, "Detail Author").await;
    let book = create_book(&client, &admin, "Detail Book", &[&author]).await;
    create_review(&client, &user, &book, 5).await;

    let body: Value = client
        .get(format!("{}/books/{}", BASE_URL, book))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "success");
    let reviews = body["data"]["reviews"].as_array().unwrap();
    assert!(!reviews.is_empty());
    for review in reviews {
        assert!(review["user"].get("password").is_none());
        assert!(review["user"]["email"].is_string());
    }
}

#[tokio::test]
#[ignore]
async fn test_book_listing_embeds_authors_and_reviews() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (_, user) = register_and_login(&client, "listing").await;

    let author = create_author(&client, &admin, "Listing Author").await;
    let book = create_book(&client, &admin, "Listing Book", &[&author]).await;
    create_review(&client, &user, &book, 4).await;

    let body: Value = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "success");
    let books = body["data"].as_array().unwrap();
    let listed = books
        .iter()
        .find(|b| b["id"] == book.as_str())
        .expect("created book missing from listing");

    // Each list entry carries the same relations as the detail view
    let authors = listed["authors"].as_array().unwrap();
    assert!(authors.iter().any(|a| a["id"] == author.as_str()));

    let reviews = listed["reviews"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["rating"], 4);
    assert!(reviews[0]["user"].get("password").is_none());
}
